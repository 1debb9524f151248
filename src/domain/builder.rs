//! Tree builder: validates a flat definition list and lays it out in an arena.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use crate::domain::arena::{CheckTree, NodeData};
use crate::domain::entities::NodeDef;
use crate::domain::error::ConstructionError;

/// Result type for tree construction.
pub type TreeResult<T> = Result<T, ConstructionError>;

/// Constructs a [`CheckTree`] from node definitions.
///
/// Links may be declared from either side. The builder reconciles them
/// into one parent per node and one ordered child list per node, then
/// rejects anything that is not a forest.
pub struct TreeBuilder {
    defs: Vec<NodeDef>,
    positions: HashMap<String, usize>,
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    /// Set for nodes that appear in their parent's `children` list
    listed: Vec<bool>,
}

impl TreeBuilder {
    pub fn new(defs: Vec<NodeDef>) -> Self {
        let len = defs.len();
        Self {
            defs,
            positions: HashMap::with_capacity(len),
            parents: vec![None; len],
            children: vec![Vec::new(); len],
            listed: vec![false; len],
        }
    }

    #[instrument(level = "debug", skip(self), fields(nodes = self.defs.len()))]
    pub fn build(mut self) -> TreeResult<CheckTree> {
        self.index_ids()?;
        self.link_declared_parents()?;
        self.link_declared_children()?;
        self.append_unlisted_children();
        let tree = self.layout()?;
        debug!(
            "built tree: {} nodes, {} roots",
            tree.len(),
            tree.root_indices().len()
        );
        Ok(tree)
    }

    fn index_ids(&mut self) -> TreeResult<()> {
        for (pos, def) in self.defs.iter().enumerate() {
            if self.positions.insert(def.id.clone(), pos).is_some() {
                return Err(ConstructionError::DuplicateId(def.id.clone()));
            }
        }
        Ok(())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    fn link_declared_parents(&mut self) -> TreeResult<()> {
        for (pos, def) in self.defs.iter().enumerate() {
            let Some(parent) = def.parent.as_deref() else {
                continue;
            };
            if parent == def.id {
                return Err(ConstructionError::SelfParent(def.id.clone()));
            }
            let parent_pos =
                self.position(parent)
                    .ok_or_else(|| ConstructionError::DanglingParent {
                        id: def.id.clone(),
                        parent: parent.to_string(),
                    })?;
            self.parents[pos] = Some(parent_pos);
        }
        Ok(())
    }

    fn link_declared_children(&mut self) -> TreeResult<()> {
        for (pos, def) in self.defs.iter().enumerate() {
            let mut seen = HashSet::new();
            for child in &def.children {
                if !seen.insert(child.as_str()) {
                    return Err(ConstructionError::DuplicateChild {
                        id: def.id.clone(),
                        child: child.clone(),
                    });
                }
                let child_pos =
                    self.position(child)
                        .ok_or_else(|| ConstructionError::DanglingChild {
                            id: def.id.clone(),
                            child: child.clone(),
                        })?;
                if child_pos == pos {
                    return Err(ConstructionError::SelfParent(def.id.clone()));
                }
                match self.parents[child_pos] {
                    Some(existing) if existing != pos => {
                        return Err(ConstructionError::ConflictingParent {
                            id: child.clone(),
                            first: self.defs[existing].id.clone(),
                            second: def.id.clone(),
                        });
                    }
                    _ => self.parents[child_pos] = Some(pos),
                }
                self.children[pos].push(child_pos);
                self.listed[child_pos] = true;
            }
        }
        Ok(())
    }

    /// Children that only name their parent go after the listed ones, in input order.
    fn append_unlisted_children(&mut self) {
        for pos in 0..self.defs.len() {
            if let Some(parent_pos) = self.parents[pos] {
                if !self.listed[pos] {
                    self.children[parent_pos].push(pos);
                }
            }
        }
    }

    /// Insert nodes into the arena in pre-order, starting from each root.
    fn layout(self) -> TreeResult<CheckTree> {
        let mut tree = CheckTree::with_capacity(self.defs.len());
        let mut placed = vec![false; self.defs.len()];

        let roots = (0..self.defs.len()).filter(|&pos| self.parents[pos].is_none());
        for root in roots {
            let mut stack = vec![(root, None)];
            while let Some((pos, parent_idx)) = stack.pop() {
                if std::mem::replace(&mut placed[pos], true) {
                    return Err(ConstructionError::CycleDetected(self.defs[pos].id.clone()));
                }
                let def = &self.defs[pos];
                let data = NodeData {
                    id: def.id.clone(),
                    name: def.label().to_string(),
                };
                let idx = tree.insert_node(data, parent_idx);
                // Reverse so the first child is popped (and ranked) first
                for &child in self.children[pos].iter().rev() {
                    stack.push((child, Some(idx)));
                }
            }
        }

        // Every node has at most one parent, so anything unreachable from a
        // root sits on (or hangs below) a parent cycle.
        if let Some(unplaced) = placed.iter().position(|&p| !p) {
            return Err(ConstructionError::CycleDetected(
                self.defs[self.find_cycle_member(unplaced)].id.clone(),
            ));
        }

        tree.compute_leaf_counts();
        Ok(tree)
    }

    /// Follow parent links from `start` until a node repeats.
    fn find_cycle_member(&self, start: usize) -> usize {
        let mut visited = HashSet::new();
        let mut current = start;
        while visited.insert(current) {
            match self.parents[current] {
                Some(parent) => current = parent,
                None => break,
            }
        }
        current
    }
}
