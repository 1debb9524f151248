//! Propagation engine and state queries over a [`CheckTree`].
//!
//! The checked set is the only mutable state. It is private and changes
//! only through [`Selection::toggle`], [`Selection::check_many`] and
//! [`Selection::reset`], so the parent rule below always holds after a
//! call returns:
//!
//! - a leaf is in the set iff it is checked
//! - an internal node is in the set iff every child is in the set
//!
//! Alongside the set, every node carries a count of checked leaves in its
//! subtree. An internal node has all children in the set exactly when that
//! count equals its leaf total, which makes each upward step O(1) and lets
//! `Indeterminate` be derived without rescanning the subtree.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use generational_arena::Index;
use itertools::Itertools;
use tracing::{debug, instrument, trace};

use crate::domain::arena::{CheckTree, TreeNode};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::state::CheckState;

/// Selection state over an immutable tree.
#[derive(Debug, Clone)]
pub struct Selection {
    tree: Arc<CheckTree>,
    checked: HashSet<Index>,
    /// Checked leaves per subtree; absent means zero
    checked_leaves: HashMap<Index, usize>,
}

impl Selection {
    /// Start with nothing checked.
    pub fn new(tree: Arc<CheckTree>) -> Self {
        Self {
            tree,
            checked: HashSet::new(),
            checked_leaves: HashMap::new(),
        }
    }

    pub fn tree(&self) -> &CheckTree {
        &self.tree
    }

    /// Check or uncheck `id` together with its whole subtree, then
    /// recompute every ancestor up to the root.
    ///
    /// Costs O(subtree size + depth). Unknown ids fail before anything is
    /// touched.
    #[instrument(level = "debug", skip(self))]
    pub fn toggle(&mut self, id: &str, checked: bool) -> DomainResult<()> {
        let idx = self.tree.index_of(id)?;
        self.toggle_at(idx, checked);
        Ok(())
    }

    /// Check every id in `ids`. All ids are resolved first; if any is
    /// unknown nothing changes.
    #[instrument(level = "debug", skip(self, ids))]
    pub fn check_many<'a, I>(&mut self, ids: I) -> DomainResult<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let indices: Vec<Index> = ids
            .into_iter()
            .map(|id| self.tree.index_of(id))
            .collect::<DomainResult<_>>()?;
        for idx in indices {
            self.toggle_at(idx, true);
        }
        Ok(())
    }

    fn toggle_at(&mut self, idx: Index, checked: bool) {
        let tree = Arc::clone(&self.tree);
        let Some(node) = tree.get_node(idx) else {
            return;
        };

        // Only a uniform subtree may skip: an indeterminate node toggled off
        // still has checked leaves to clear.
        if self.state_at(idx) == CheckState::from_checked(checked) {
            trace!("toggle {} -> {}: already uniform", node.id(), checked);
            return;
        }

        let before = self.checked_leaves_at(idx);
        let after = if checked { node.leaf_count } else { 0 };

        // Downward pass
        self.assign(&tree, idx, checked);
        for desc in tree.descendants_of(idx).indices() {
            self.assign(&tree, desc, checked);
        }

        // Upward pass
        for ancestor in tree.ancestors_of(idx).indices() {
            let Some(anc) = tree.get_node(ancestor) else {
                continue;
            };
            let count = self.checked_leaves_at(ancestor) + after - before;
            self.set_checked_leaves(ancestor, count);
            self.set_member(ancestor, count == anc.leaf_count);
        }

        debug!(
            "toggled {} -> {}: {} checked leaves below (was {})",
            node.id(),
            checked,
            after,
            before
        );
    }

    /// Force a node's membership and counter to match a uniform subtree.
    fn assign(&mut self, tree: &CheckTree, idx: Index, checked: bool) {
        let leaves = match tree.get_node(idx) {
            Some(node) if checked => node.leaf_count,
            _ => 0,
        };
        self.set_checked_leaves(idx, leaves);
        self.set_member(idx, checked);
    }

    fn set_member(&mut self, idx: Index, member: bool) {
        if member {
            self.checked.insert(idx);
        } else {
            self.checked.remove(&idx);
        }
    }

    fn set_checked_leaves(&mut self, idx: Index, count: usize) {
        if count == 0 {
            self.checked_leaves.remove(&idx);
        } else {
            self.checked_leaves.insert(idx, count);
        }
    }

    pub(crate) fn checked_leaves_at(&self, idx: Index) -> usize {
        self.checked_leaves.get(&idx).copied().unwrap_or(0)
    }

    pub(crate) fn state_at(&self, idx: Index) -> CheckState {
        if self.checked.contains(&idx) {
            CheckState::Checked
        } else if self.checked_leaves_at(idx) > 0 {
            CheckState::Indeterminate
        } else {
            CheckState::Unchecked
        }
    }

    /// Derived tri-state of `id`.
    #[instrument(level = "trace", skip(self))]
    pub fn tristate(&self, id: &str) -> DomainResult<CheckState> {
        let idx = self.tree.index_of(id)?;
        Ok(self.state_at(idx))
    }

    /// Whether `id` is in the checked set (fully checked).
    pub fn is_checked(&self, id: &str) -> DomainResult<bool> {
        let idx = self.tree.index_of(id)?;
        Ok(self.checked.contains(&idx))
    }

    /// Checked and total leaves below `id` (a leaf counts itself).
    pub fn leaf_progress(&self, id: &str) -> DomainResult<(usize, usize)> {
        let idx = self.tree.index_of(id)?;
        let total = self
            .tree
            .get_node(idx)
            .map(|n| n.leaf_count)
            .ok_or_else(|| DomainError::NotFound(id.to_string()))?;
        Ok((self.checked_leaves_at(idx), total))
    }

    /// Checked leaf ids in tree order.
    #[instrument(level = "debug", skip(self))]
    pub fn checked_leaf_ids(&self) -> Vec<&str> {
        self.checked_in_order(|node| node.is_leaf())
    }

    /// Every checked id, leaves and internal nodes, in tree order.
    pub fn checked_ids(&self) -> Vec<&str> {
        self.checked_in_order(|_| true)
    }

    fn checked_in_order<F>(&self, keep: F) -> Vec<&str>
    where
        F: Fn(&TreeNode) -> bool,
    {
        self.checked
            .iter()
            .filter_map(|&idx| self.tree.get_node(idx))
            .filter(|node| keep(node))
            .sorted_by_key(|node| node.rank)
            .map(|node| node.id())
            .collect()
    }

    /// Number of ids in the checked set.
    pub fn len(&self) -> usize {
        self.checked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checked.is_empty()
    }

    /// Uncheck everything.
    #[instrument(level = "debug", skip(self))]
    pub fn reset(&mut self) {
        self.checked.clear();
        self.checked_leaves.clear();
    }
}
