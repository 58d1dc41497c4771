//! Browsable tree nodes
//!
//! The host exposes very different things through its browser (device
//! categories, preset folders, colour swatches, preset files). They are all
//! viewed here through one small tagged type with a uniform capability set:
//! a name, whether there is anything below it, and the ordered children.

use serde::{Deserialize, Serialize};

/// A node in the browse tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BrowseNode {
    /// Top-level grouping provided by the host (instruments, sounds, colors...)
    Category {
        name: String,
        #[serde(default)]
        children: Vec<BrowseNode>,
    },
    /// Intermediate folder, either from the host or synthesized by grouping
    Group {
        name: String,
        #[serde(default)]
        children: Vec<BrowseNode>,
    },
    /// Something the host can load (preset, device, sample)
    Leaf {
        name: String,
        /// Provenance of the item (pack or library name), used for grouping
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source: Option<String>,
        #[serde(default = "default_loadable")]
        loadable: bool,
        /// Host-side identifier passed back on load
        #[serde(default, skip_serializing_if = "Option::is_none")]
        uri: Option<String>,
    },
}

fn default_loadable() -> bool {
    true
}

impl BrowseNode {
    /// Create a category node
    pub fn category(name: impl Into<String>, children: Vec<BrowseNode>) -> Self {
        Self::Category {
            name: name.into(),
            children,
        }
    }

    /// Create a group node
    pub fn group(name: impl Into<String>, children: Vec<BrowseNode>) -> Self {
        Self::Group {
            name: name.into(),
            children,
        }
    }

    /// Create a loadable leaf without a source
    pub fn leaf(name: impl Into<String>) -> Self {
        Self::Leaf {
            name: name.into(),
            source: None,
            loadable: true,
            uri: None,
        }
    }

    /// Create a loadable leaf tagged with its source
    pub fn leaf_from(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self::Leaf {
            name: name.into(),
            source: Some(source.into()),
            loadable: true,
            uri: None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Category { name, .. } | Self::Group { name, .. } | Self::Leaf { name, .. } => {
                name
            }
        }
    }

    /// Check if this node has children
    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }

    /// Ordered children (empty for leaves)
    pub fn children(&self) -> &[BrowseNode] {
        match self {
            Self::Category { children, .. } | Self::Group { children, .. } => children,
            Self::Leaf { .. } => &[],
        }
    }

    /// Whether the host accepts this node in a load command
    pub fn is_loadable(&self) -> bool {
        match self {
            Self::Leaf { loadable, .. } => *loadable,
            _ => false,
        }
    }

    /// Source attribute of a leaf (None for folders)
    pub fn source(&self) -> Option<&str> {
        match self {
            Self::Leaf { source, .. } => source.as_deref(),
            _ => None,
        }
    }

    /// Host identifier of a leaf
    pub fn uri(&self) -> Option<&str> {
        match self {
            Self::Leaf { uri, .. } => uri.as_deref(),
            _ => None,
        }
    }

    /// True if any direct child has children of its own
    ///
    /// Categories shaped like this are browsed in tiers (sub-category rows
    /// above leaf rows) instead of as one flat list.
    pub fn is_tiered(&self) -> bool {
        self.children().iter().any(BrowseNode::has_children)
    }
}
