//! Tree nodes and the tree value itself.
//!
//! A [`Tree`] is an ordered sequence of root [`Node`]s. Folders own an ordered
//! sequence of children; files are leaves. Children are held behind [`Arc`]
//! so that an edit can rebuild the path from the mutated container up to the
//! root while every untouched subtree stays shared with the previous version.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Stable node identifier. Invariant across moves and independent of
/// position.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Whether a node is a folder or a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    File,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Folder => write!(f, "folder"),
            Self::File => write!(f, "file"),
        }
    }
}

/// Kind-specific part of a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeBody {
    File,
    Folder {
        expanded: bool,
        children: Vec<Arc<Node>>,
    },
}

/// A folder or file in the tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawNode", into = "RawNode")]
pub struct Node {
    id: NodeId,
    label: String,
    body: NodeBody,
}

impl Node {
    /// Create a file leaf.
    pub fn file(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            body: NodeBody::File,
        }
    }

    /// Create a folder with the given children.
    pub fn folder(
        id: impl Into<NodeId>,
        label: impl Into<String>,
        expanded: bool,
        children: Vec<Node>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            body: NodeBody::Folder {
                expanded,
                children: children.into_iter().map(Arc::new).collect(),
            },
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn body(&self) -> &NodeBody {
        &self.body
    }

    pub fn kind(&self) -> NodeKind {
        match self.body {
            NodeBody::File => NodeKind::File,
            NodeBody::Folder { .. } => NodeKind::Folder,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind() == NodeKind::Folder
    }

    /// The folder's `expanded` flag. Always `false` for files.
    pub fn is_expanded(&self) -> bool {
        matches!(self.body, NodeBody::Folder { expanded: true, .. })
    }

    /// The folder's children, or `None` for a file.
    pub fn children(&self) -> Option<&[Arc<Node>]> {
        match &self.body {
            NodeBody::Folder { children, .. } => Some(children),
            NodeBody::File => None,
        }
    }

    /// A copy of this folder with its children replaced. The copy shares
    /// every child `Arc` it is given. Returns `None` for a file.
    pub fn with_children(&self, children: Vec<Arc<Node>>) -> Option<Self> {
        match &self.body {
            NodeBody::Folder { expanded, .. } => Some(Self {
                id: self.id,
                label: self.label.clone(),
                body: NodeBody::Folder {
                    expanded: *expanded,
                    children,
                },
            }),
            NodeBody::File => None,
        }
    }

    /// A copy of this folder with `expanded` flipped. Children are shared.
    /// Returns `None` for a file.
    pub fn with_expanded_toggled(&self) -> Option<Self> {
        match &self.body {
            NodeBody::Folder { expanded, children } => Some(Self {
                id: self.id,
                label: self.label.clone(),
                body: NodeBody::Folder {
                    expanded: !expanded,
                    children: children.clone(),
                },
            }),
            NodeBody::File => None,
        }
    }

    /// Visit this node and all descendants depth-first, pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        if let Some(children) = self.children() {
            for child in children {
                child.walk(visit);
            }
        }
    }
}

/// An ordered sequence of root nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    roots: Vec<Arc<Node>>,
}

impl Tree {
    pub fn new(roots: Vec<Node>) -> Self {
        Self {
            roots: roots.into_iter().map(Arc::new).collect(),
        }
    }

    /// Build a tree from already-shared roots.
    pub fn from_shared(roots: Vec<Arc<Node>>) -> Self {
        Self { roots }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn roots(&self) -> &[Arc<Node>] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes at every depth.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }

    /// Visit every node depth-first, pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        for root in &self.roots {
            root.walk(visit);
        }
    }

    /// Parse the JSON interchange form.
    ///
    /// Syntax errors are `Serialization`; a structurally invalid node at any
    /// depth is `MalformedNode`.
    pub fn from_json(json: &str) -> Result<Self, TypeError> {
        let raw: Vec<RawNode> =
            serde_json::from_str(json).map_err(|e| TypeError::Serialization(e.to_string()))?;
        let roots = raw
            .into_iter()
            .map(|node| Node::try_from(node).map(Arc::new))
            .collect::<Result<_, _>>()?;
        Ok(Self { roots })
    }

    /// Render the JSON interchange form.
    pub fn to_json_pretty(&self) -> Result<String, TypeError> {
        serde_json::to_string_pretty(self).map_err(|e| TypeError::Serialization(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Interchange form
// ---------------------------------------------------------------------------

/// Wire shape of a node: `{ id, text, isFolder?, expanded?, items? }`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    id: u64,
    text: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    is_folder: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expanded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    items: Option<Vec<RawNode>>,
}

impl TryFrom<RawNode> for Node {
    type Error = TypeError;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let body = if raw.is_folder {
            NodeBody::Folder {
                expanded: raw.expanded.unwrap_or(false),
                children: raw
                    .items
                    .unwrap_or_default()
                    .into_iter()
                    .map(|child| Node::try_from(child).map(Arc::new))
                    .collect::<Result<_, _>>()?,
            }
        } else {
            if raw.items.is_some() {
                return Err(TypeError::MalformedNode {
                    id: raw.id,
                    reason: "file carries items".into(),
                });
            }
            NodeBody::File
        };
        Ok(Self {
            id: NodeId(raw.id),
            label: raw.text,
            body,
        })
    }
}

impl From<Node> for RawNode {
    fn from(node: Node) -> Self {
        match node.body {
            NodeBody::File => RawNode {
                id: node.id.0,
                text: node.label,
                is_folder: false,
                expanded: None,
                items: None,
            },
            NodeBody::Folder { expanded, children } => RawNode {
                id: node.id.0,
                text: node.label,
                is_folder: true,
                expanded: Some(expanded),
                items: Some(
                    children
                        .into_iter()
                        .map(|child| {
                            RawNode::from(
                                Arc::try_unwrap(child).unwrap_or_else(|shared| (*shared).clone()),
                            )
                        })
                        .collect(),
                ),
            },
        }
    }
}
