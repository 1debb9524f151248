//! Externally visible tri-state of a node.

use std::fmt;

/// Derived check state of a node.
///
/// `Indeterminate` is never stored: it only ever results from the
/// derivation over the checked leaf descendants of an internal node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckState {
    Unchecked,
    Indeterminate,
    Checked,
}

impl CheckState {
    /// The state a toggle to `checked` drives a whole subtree into.
    pub fn from_checked(checked: bool) -> Self {
        if checked {
            CheckState::Checked
        } else {
            CheckState::Unchecked
        }
    }

    pub fn is_checked(self) -> bool {
        self == CheckState::Checked
    }

    pub fn is_indeterminate(self) -> bool {
        self == CheckState::Indeterminate
    }
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CheckState::Unchecked => "unchecked",
            CheckState::Indeterminate => "indeterminate",
            CheckState::Checked => "checked",
        };
        write!(f, "{}", s)
    }
}
