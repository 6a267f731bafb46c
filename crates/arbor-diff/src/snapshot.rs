//! Flattened view of a tree keyed by stable id.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;

use arbor_types::{Node, NodeId, NodeKind, Tree};
use serde::{Deserialize, Serialize};

use crate::error::{DiffError, DiffResult};

/// Where a node sits in a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub kind: NodeKind,
    /// Offset within the immediate container.
    pub offset: usize,
    /// Owning folder; `None` for root nodes.
    pub parent: Option<NodeId>,
}

/// Mapping of stable id to position for every node of a tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    entries: BTreeMap<NodeId, SnapshotEntry>,
}

impl Snapshot {
    /// Flatten `tree` recursively. Fails if a stable id occurs twice.
    pub fn from_tree(tree: &Tree) -> DiffResult<Self> {
        let mut entries = BTreeMap::new();
        flatten(tree.roots(), None, &mut entries)?;
        Ok(Self { entries })
    }

    pub fn get(&self, id: &NodeId) -> Option<&SnapshotEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &SnapshotEntry)> {
        self.entries.iter()
    }
}

fn flatten(
    items: &[Arc<Node>],
    parent: Option<NodeId>,
    entries: &mut BTreeMap<NodeId, SnapshotEntry>,
) -> DiffResult<()> {
    for (offset, node) in items.iter().enumerate() {
        match entries.entry(node.id()) {
            Entry::Occupied(_) => return Err(DiffError::DuplicateId(node.id())),
            Entry::Vacant(slot) => {
                slot.insert(SnapshotEntry {
                    kind: node.kind(),
                    offset,
                    parent,
                });
            }
        }
        if let Some(children) = node.children() {
            flatten(children, Some(node.id()), entries)?;
        }
    }
    Ok(())
}
