//! Structural change records emitted by edits and diffs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::node::{NodeId, NodeKind};

/// What happened to a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeKind {
    Added,
    Removed,
    Reparented,
    DisplayOrderChanged,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Removed => write!(f, "removed"),
            Self::Reparented => write!(f, "reparented"),
            Self::DisplayOrderChanged => write!(f, "display-order-changed"),
        }
    }
}

/// Payload of a change: a position or a parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeValue {
    /// Offset within a container.
    Offset(usize),
    /// Owning folder; `None` is the root sequence.
    Parent(Option<NodeId>),
}

impl fmt::Display for ChangeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offset(offset) => write!(f, "{offset}"),
            Self::Parent(Some(id)) => write!(f, "parent {id}"),
            Self::Parent(None) => write!(f, "root"),
        }
    }
}

/// One structural fact produced by a mutation or a diff.
///
/// Records are independent facts, not a replay log: consumers must not rely
/// on their order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    pub kind: NodeKind,
    pub change: ChangeKind,
    pub id: NodeId,
    pub value: ChangeValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<ChangeValue>,
}

impl ChangeRecord {
    pub fn added(kind: NodeKind, id: NodeId, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            change: ChangeKind::Added,
            id,
            value: ChangeValue::Parent(parent),
            original: None,
        }
    }

    /// `parent` is the folder the node was removed from.
    pub fn removed(kind: NodeKind, id: NodeId, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            change: ChangeKind::Removed,
            id,
            value: ChangeValue::Parent(parent),
            original: None,
        }
    }

    pub fn reparented(
        kind: NodeKind,
        id: NodeId,
        parent: Option<NodeId>,
        original: Option<Option<NodeId>>,
    ) -> Self {
        Self {
            kind,
            change: ChangeKind::Reparented,
            id,
            value: ChangeValue::Parent(parent),
            original: original.map(ChangeValue::Parent),
        }
    }

    pub fn display_order(kind: NodeKind, id: NodeId, offset: usize, original: Option<usize>) -> Self {
        Self {
            kind,
            change: ChangeKind::DisplayOrderChanged,
            id,
            value: ChangeValue::Offset(offset),
            original: original.map(ChangeValue::Offset),
        }
    }

    /// Replace the original value.
    pub fn with_original(mut self, original: ChangeValue) -> Self {
        self.original = Some(original);
        self
    }

    /// Combined tag, e.g. `"file-display-order-changed"`.
    pub fn tag(&self) -> String {
        format!("{}-{}", self.kind, self.change)
    }
}

impl fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.tag(), self.id, self.value)?;
        if let Some(original) = &self.original {
            write!(f, " (was {original})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_cover_kind_and_change() {
        let r = ChangeRecord::display_order(NodeKind::File, NodeId(1), 2, Some(0));
        assert_eq!(r.tag(), "file-display-order-changed");
        let r = ChangeRecord::reparented(NodeKind::Folder, NodeId(101), Some(NodeId(100)), None);
        assert_eq!(r.tag(), "folder-reparented");
        assert_eq!(
            ChangeRecord::added(NodeKind::File, NodeId(3), None).tag(),
            "file-added"
        );
        assert_eq!(
            ChangeRecord::removed(NodeKind::Folder, NodeId(3), None).tag(),
            "folder-removed"
        );
    }

    #[test]
    fn display_includes_original() {
        let r = ChangeRecord::display_order(NodeKind::File, NodeId(2), 0, Some(1));
        assert_eq!(r.to_string(), "file-display-order-changed 2: 0 (was 1)");
        let r = ChangeRecord::reparented(NodeKind::Folder, NodeId(101), Some(NodeId(100)), Some(None));
        assert_eq!(r.to_string(), "folder-reparented 101: parent 100 (was root)");
    }

    #[test]
    fn serde_shape() {
        let r = ChangeRecord::display_order(NodeKind::File, NodeId(2), 0, Some(1));
        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(value["kind"], "file");
        assert_eq!(value["change"], "display-order-changed");
        assert_eq!(value["id"], 2);
        assert_eq!(value["value"]["offset"], 0);
        assert_eq!(value["original"]["offset"], 1);

        let r = ChangeRecord::added(NodeKind::File, NodeId(9), None);
        let value = serde_json::to_value(&r).unwrap();
        assert!(value["value"]["parent"].is_null());
        assert!(value.get("original").is_none());

        let back: ChangeRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, r);
    }
}
