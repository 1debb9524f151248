use std::collections::HashMap;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::builder::TreeBuilder;
use crate::domain::entities::NodeDef;
use crate::domain::error::{ConstructionError, DomainError, DomainResult};

/// Data payload for tree nodes.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Unique identifier
    pub id: String,
    /// Display label
    pub name: String,
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    pub(crate) data: NodeData,
    /// Index of parent node in the arena, None for root nodes
    pub(crate) parent: Option<Index>,
    /// Indices of child nodes in the arena, in definition order
    pub(crate) children: Vec<Index>,
    /// Number of leaves in the subtree rooted here (1 for a leaf)
    pub(crate) leaf_count: usize,
    /// Pre-order position over the whole forest
    pub(crate) rank: usize,
    /// 1 for roots, parent level + 1 below
    pub(crate) level: usize,
}

impl TreeNode {
    pub fn id(&self) -> &str {
        &self.data.id
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }
}

/// Immutable forest of nodes with precomputed parent pointers.
///
/// Built once from a flat definition list and never mutated afterwards.
/// Every node stores its parent index, so ancestor walks are O(depth)
/// and never search from a root.
#[derive(Debug)]
pub struct CheckTree {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
    /// Root indices in definition order
    roots: Vec<Index>,
    /// Id lookup
    ids: HashMap<String, Index>,
}

impl CheckTree {
    /// Build a tree from node definitions.
    pub fn build(defs: Vec<NodeDef>) -> Result<Self, ConstructionError> {
        TreeBuilder::new(defs).build()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
            roots: Vec::new(),
            ids: HashMap::with_capacity(capacity),
        }
    }

    /// Only called by the builder, in pre-order, so ranks follow tree order.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let id = data.id.clone();
        let level = parent
            .and_then(|p| self.arena.get(p))
            .map_or(1, |p| p.level + 1);
        let node = TreeNode {
            data,
            parent,
            children: Vec::new(),
            leaf_count: 0,
            rank: self.arena.len(),
            level,
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.roots.push(node_idx);
        }
        self.ids.insert(id, node_idx);

        node_idx
    }

    /// Fill in subtree leaf counts bottom-up. Builder only.
    pub(crate) fn compute_leaf_counts(&mut self) {
        let order: Vec<Index> = self.iter_postorder().map(|(idx, _)| idx).collect();
        for idx in order {
            let count = match self.arena.get(idx) {
                Some(node) if node.children.is_empty() => 1,
                Some(node) => node
                    .children
                    .iter()
                    .filter_map(|&c| self.arena.get(c))
                    .map(|c| c.leaf_count)
                    .sum(),
                None => continue,
            };
            if let Some(node) = self.arena.get_mut(idx) {
                node.leaf_count = count;
            }
        }
    }

    pub(crate) fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    /// Resolve an id to its arena index.
    pub(crate) fn index_of(&self, id: &str) -> DomainResult<Index> {
        self.ids
            .get(id)
            .copied()
            .ok_or_else(|| DomainError::NotFound(id.to_string()))
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> DomainResult<&TreeNode> {
        let idx = self.index_of(id)?;
        self.arena
            .get(idx)
            .ok_or_else(|| DomainError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn name(&self, id: &str) -> DomainResult<&str> {
        self.node(id).map(TreeNode::name)
    }

    pub fn is_leaf(&self, id: &str) -> DomainResult<bool> {
        self.node(id).map(TreeNode::is_leaf)
    }

    /// Root ids in definition order.
    pub fn roots(&self) -> impl Iterator<Item = &str> + '_ {
        self.roots
            .iter()
            .filter_map(|&idx| self.arena.get(idx))
            .map(TreeNode::id)
    }

    pub(crate) fn root_indices(&self) -> &[Index] {
        &self.roots
    }

    /// Ordered child ids, empty for leaves.
    #[instrument(level = "trace", skip(self))]
    pub fn children(&self, id: &str) -> DomainResult<Vec<&str>> {
        let node = self.node(id)?;
        Ok(node
            .children
            .iter()
            .filter_map(|&c| self.arena.get(c))
            .map(TreeNode::id)
            .collect())
    }

    /// Parent id, None for roots.
    #[instrument(level = "trace", skip(self))]
    pub fn parent(&self, id: &str) -> DomainResult<Option<&str>> {
        let node = self.node(id)?;
        Ok(node
            .parent
            .and_then(|p| self.arena.get(p))
            .map(TreeNode::id))
    }

    /// Pre-order walk over the subtree below `id`, excluding `id` itself.
    ///
    /// The returned iterator is lazy and `Clone`; calling this again starts
    /// a fresh walk.
    #[instrument(level = "trace", skip(self))]
    pub fn descendants(&self, id: &str) -> DomainResult<Descendants<'_>> {
        let idx = self.index_of(id)?;
        Ok(self.descendants_of(idx))
    }

    pub(crate) fn descendants_of(&self, idx: Index) -> Descendants<'_> {
        Descendants::new(self, idx)
    }

    /// Walk from the parent of `id` up to its root.
    #[instrument(level = "trace", skip(self))]
    pub fn ancestors(&self, id: &str) -> DomainResult<Ancestors<'_>> {
        let idx = self.index_of(id)?;
        Ok(self.ancestors_of(idx))
    }

    pub(crate) fn ancestors_of(&self, idx: Index) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.arena.get(idx).and_then(|n| n.parent),
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Number of levels in the deepest branch, 0 for an empty tree.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.arena
            .iter()
            .map(|(_, node)| node.level)
            .max()
            .unwrap_or(0)
    }

    /// All leaf ids in tree order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_ids(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(_, node)| node.id())
            .collect()
    }
}

/// Pre-order iterator over one subtree, excluding its root.
#[derive(Clone)]
pub struct Descendants<'a> {
    tree: &'a CheckTree,
    stack: Vec<Index>,
}

impl<'a> Descendants<'a> {
    fn new(tree: &'a CheckTree, idx: Index) -> Self {
        let stack = tree
            .get_node(idx)
            .map(|n| n.children.iter().rev().copied().collect())
            .unwrap_or_default();
        Self { tree, stack }
    }

    fn advance(&mut self) -> Option<(Index, &'a TreeNode)> {
        let current = self.stack.pop()?;
        let node = self.tree.get_node(current)?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(node.children.iter().rev().copied());
        Some((current, node))
    }

    /// Yield arena indices instead of ids.
    pub(crate) fn indices(mut self) -> impl Iterator<Item = Index> + 'a {
        std::iter::from_fn(move || self.advance().map(|(idx, _)| idx))
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance().map(|(_, node)| node.id())
    }
}

/// Parent-pointer walk toward the root.
#[derive(Clone)]
pub struct Ancestors<'a> {
    tree: &'a CheckTree,
    next: Option<Index>,
}

impl<'a> Ancestors<'a> {
    pub(crate) fn indices(self) -> impl Iterator<Item = Index> + 'a {
        let tree = self.tree;
        std::iter::successors(self.next, move |&idx| {
            tree.get_node(idx).and_then(|n| n.parent)
        })
    }
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.tree.get_node(self.next?)?;
        self.next = node.parent;
        Some(node.id())
    }
}

/// Pre-order iterator over the whole forest, roots in definition order.
pub struct TreeIterator<'a> {
    tree: &'a CheckTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a CheckTree) -> Self {
        let stack = tree.roots.iter().rev().copied().collect();
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a CheckTree,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a CheckTree) -> Self {
        let stack = tree.roots.iter().rev().map(|&idx| (idx, false)).collect();
        Self { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
