//! Domain entities: core data structures

use serde::{Deserialize, Serialize};

/// Flat definition of a single node, as supplied by an external loader.
///
/// Links may be declared in either direction (`parent` on the child,
/// `children` on the parent) or both, as long as they agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDef {
    /// Unique identifier
    pub id: String,
    /// Display label, defaults to the id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Parent id, absent for roots
    #[serde(default, alias = "parentId", skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Ordered child ids
    #[serde(default, alias = "childIds", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
    /// Initially selected
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub checked: bool,
}

impl NodeDef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            parent: None,
            children: Vec::new(),
            checked: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Label to display: the name if given, the id otherwise.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// A complete tree definition document.
///
/// ```toml
/// [[nodes]]
/// id = "electronics"
/// name = "Electronics"
/// children = ["phones", "laptops"]
///
/// [[nodes]]
/// id = "phones"
/// parent = "electronics"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
}

impl Definition {
    /// Parse a TOML definition document.
    pub fn parse(content: &str) -> Result<Self, DefinitionParseError> {
        toml::from_str(content).map_err(|e| DefinitionParseError {
            message: e.to_string(),
        })
    }

    /// Ids of nodes marked `checked = true`, in input order.
    pub fn initially_checked(&self) -> impl Iterator<Item = &str> {
        self.nodes
            .iter()
            .filter(|n| n.checked)
            .map(|n| n.id.as_str())
    }
}

/// Error parsing a definition document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionParseError {
    pub message: String,
}
