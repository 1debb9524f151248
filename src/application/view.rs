/*
Rendering of a selection as terminal trees.

The core only exposes the derived tri-state. Turning it into markers,
colors and labels happens here, one termtree per root.
 */
use colored::Colorize;
use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::config::DisplayConfig;
use crate::domain::{CheckState, Selection, TreeNode};

pub trait TreeView {
    fn to_tree_views(&self, display: &DisplayConfig) -> Vec<Tree<String>>;
}

impl TreeView for Selection {
    /// Built bottom-up from the post-order walk: every node's subtrees are
    /// the most recently finished entries on `built`.
    #[instrument(level = "debug", skip(self, display))]
    fn to_tree_views(&self, display: &DisplayConfig) -> Vec<Tree<String>> {
        let mut built: Vec<Tree<String>> = Vec::new();
        for (idx, node) in self.tree().iter_postorder() {
            let first_child = built.len().saturating_sub(node.children.len());
            let leaves = built.split_off(first_child);
            built.push(Tree::new(label(self, display, idx, node)).with_leaves(leaves));
        }
        built
    }
}

/// Drop rendered trees one node at a time.
///
/// `Tree` drops its leaves recursively, which would exhaust the stack on a
/// deep hierarchy.
pub fn release_views(views: Vec<Tree<String>>) {
    let mut pending = views;
    while let Some(mut tree) = pending.pop() {
        pending.append(&mut tree.leaves);
    }
}

fn label(selection: &Selection, display: &DisplayConfig, idx: Index, node: &TreeNode) -> String {
    let state = selection.state_at(idx);
    let glyph = display.glyph(state);
    let glyph = if display.color {
        match state {
            CheckState::Checked => glyph.green().to_string(),
            CheckState::Indeterminate => glyph.yellow().to_string(),
            CheckState::Unchecked => glyph.dimmed().to_string(),
        }
    } else {
        glyph.to_string()
    };

    let mut label = format!("{} {}", glyph, node.name());
    if display.show_ids && node.id() != node.name() {
        label.push_str(&format!(" ({})", node.id()));
    }
    if display.show_counts && !node.is_leaf() {
        label.push_str(&format!(
            " {}/{}",
            selection.checked_leaves_at(idx),
            node.leaf_count()
        ));
    }
    label
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::{CheckTree, NodeDef};

    fn plain() -> DisplayConfig {
        DisplayConfig {
            color: false,
            ..Default::default()
        }
    }

    fn selection() -> Selection {
        let tree = CheckTree::build(vec![
            NodeDef::new("books").with_name("Books"),
            NodeDef::new("fiction").with_name("Fiction").with_parent("books"),
            NodeDef::new("nonfiction").with_parent("books"),
            NodeDef::new("toys").with_name("Toys"),
        ])
        .unwrap();
        Selection::new(Arc::new(tree))
    }

    #[test]
    fn given_forest_when_rendering_then_one_tree_per_root() {
        let mut sel = selection();
        sel.toggle("fiction", true).unwrap();

        let views = sel.to_tree_views(&plain());

        assert_eq!(views.len(), 2);
        let books = views[0].to_string();
        assert!(books.starts_with("[-] Books"), "got: {books}");
        assert!(books.contains("[x] Fiction"));
        assert!(books.contains("[ ] nonfiction"));
        assert_eq!(views[1].to_string().trim_end(), "[ ] Toys");
    }

    #[test]
    fn given_ids_and_counts_enabled_when_rendering_then_labels_carry_them() {
        let mut sel = selection();
        sel.toggle("fiction", true).unwrap();
        let display = DisplayConfig {
            show_ids: true,
            show_counts: true,
            ..plain()
        };

        let books = sel.to_tree_views(&display)[0].to_string();

        assert!(books.starts_with("[-] Books (books) 1/2"), "got: {books}");
        assert!(books.contains("[ ] nonfiction\n"), "got: {books}");
    }

    #[test]
    fn given_deep_chain_when_rendering_then_builds_without_recursion() {
        const LEVELS: usize = 50_000;
        let defs = (0..LEVELS)
            .map(|i| match i {
                0 => NodeDef::new("n0"),
                _ => NodeDef::new(format!("n{i}")).with_parent(format!("n{}", i - 1)),
            })
            .collect();
        let mut sel = Selection::new(Arc::new(CheckTree::build(defs).unwrap()));
        sel.toggle(&format!("n{}", LEVELS - 1), true).unwrap();

        let views = sel.to_tree_views(&plain());

        assert_eq!(views.len(), 1);
        assert_eq!(views[0].root, "[x] n0");
        let mut depth = 1;
        let mut current = &views[0];
        while let Some(child) = current.leaves.first() {
            assert_eq!(current.leaves.len(), 1);
            current = child;
            depth += 1;
        }
        assert_eq!(depth, LEVELS);
        assert_eq!(current.root, format!("[x] n{}", LEVELS - 1));
        release_views(views);
    }
}
