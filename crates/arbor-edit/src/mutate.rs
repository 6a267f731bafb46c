//! Pure tree mutations: remove, insert, move within a container, and
//! toggling a folder's `expanded` flag.
//!
//! Every function takes the tree by reference and returns a new tree; the
//! input is never modified. Only the edited container and its ancestors are
//! copied (see [`crate::cow`]).
//!
//! Display-order values in the emitted records are ordinals among siblings
//! of the same kind: folders and files are ordered independently.

use std::collections::HashMap;
use std::sync::Arc;

use arbor_types::{ChangeRecord, HierarchicalIndex, Node, NodeId, NodeKind, Tree};

use crate::cow;
use crate::error::{EditError, EditResult};

/// A new tree version plus the structural facts describing how it differs
/// from the input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditOutcome {
    pub tree: Tree,
    pub changes: Vec<ChangeRecord>,
}

/// Result of [`remove`]: the new tree, the detached node, and the order
/// changes among its former same-kind siblings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Removal {
    pub tree: Tree,
    pub removed: Arc<Node>,
    pub changes: Vec<ChangeRecord>,
}

/// Display-order records for the `kind` members of a container that went
/// from `before` to `after`.
///
/// With `only_changed`, members whose ordinal is unchanged are skipped. The
/// `original` of a record is set only when the member existed before and
/// its ordinal moved.
pub(crate) fn order_records(
    kind: NodeKind,
    before: &[Arc<Node>],
    after: &[Arc<Node>],
    only_changed: bool,
) -> Vec<ChangeRecord> {
    let prior: HashMap<NodeId, usize> = before
        .iter()
        .filter(|n| n.kind() == kind)
        .enumerate()
        .map(|(ordinal, n)| (n.id(), ordinal))
        .collect();

    after
        .iter()
        .filter(|n| n.kind() == kind)
        .enumerate()
        .filter_map(|(ordinal, node)| {
            let was = prior.get(&node.id()).copied();
            if only_changed && was == Some(ordinal) {
                return None;
            }
            Some(ChangeRecord::display_order(
                kind,
                node.id(),
                ordinal,
                was.filter(|&w| w != ordinal),
            ))
        })
        .collect()
}

/// Remove the node at `index`.
///
/// Emits one display-order record per remaining sibling of the removed
/// node's kind.
pub fn remove(tree: &Tree, index: &HierarchicalIndex) -> EditResult<Removal> {
    let offset = index.last();
    let (tree, (removed, changes)) = cow::rebuild(tree, index.container_path(), index, |container| {
        let removed = container
            .items
            .get(offset)
            .cloned()
            .ok_or_else(|| EditError::IndexOutOfRange {
                index: index.clone(),
                len: container.len(),
            })?;
        let mut items = container.items.to_vec();
        items.remove(offset);
        let changes = order_records(removed.kind(), container.items, &items, false);
        Ok((items, (removed, changes)))
    })?;

    Ok(Removal {
        tree,
        removed,
        changes,
    })
}

/// Compensate a target index computed before an earlier removal.
///
/// Walks both indices outermost first: stops at the first depth where the
/// removal's offset is larger, skips depths where they are equal, and
/// otherwise lowers the target offset by the removal's offset (by 1 when
/// that offset is zero).
pub fn adjust_for_removal(
    target: &HierarchicalIndex,
    removed_at: &HierarchicalIndex,
) -> HierarchicalIndex {
    let mut segments = target.segments().to_vec();
    for (segment, &removed) in segments.iter_mut().zip(removed_at.segments()) {
        if removed > *segment {
            break;
        }
        if removed == *segment {
            continue;
        }
        *segment -= if removed == 0 { 1 } else { removed };
    }
    HierarchicalIndex::new(segments).unwrap_or_else(|| target.clone())
}

enum Placement {
    At(usize),
    Append,
    Prepend,
}

/// Insert `item` relative to `target_item`, which was found at
/// `target_index`.
///
/// For a folder `item`, `source_before_removal` (the item's index before it
/// was detached) is used to correct `target_index` with
/// [`adjust_for_removal`]. Placement then depends on the kind pairing:
///
/// | item   | target | placement |
/// |--------|--------|-----------|
/// | folder | folder | at the target offset |
/// | file   | file   | at the target offset |
/// | folder | file   | appended to the file's container |
/// | file   | folder | prepended to the folder's own children |
///
/// Emits a reparent record for `item` followed by display-order records for
/// every member of `item`'s kind in the resulting container.
pub fn insert(
    tree: &Tree,
    item: Arc<Node>,
    target_item: &Node,
    target_index: &HierarchicalIndex,
    source_before_removal: Option<&HierarchicalIndex>,
) -> EditResult<EditOutcome> {
    let index = match source_before_removal {
        Some(source) if item.is_folder() => adjust_for_removal(target_index, source),
        _ => target_index.clone(),
    };

    let (path, placement) = match (item.kind(), target_item.kind()) {
        (dragged, target) if dragged == target => {
            (index.container_path(), Placement::At(index.last()))
        }
        (NodeKind::Folder, NodeKind::File) => (index.container_path(), Placement::Append),
        (NodeKind::File, NodeKind::Folder) => (index.segments(), Placement::Prepend),
        (dragged, target) => {
            return Err(EditError::invalid_drop(
                &index,
                target_index,
                format!("cannot drop {dragged} onto {target}"),
            ))
        }
    };

    let (tree, changes) = cow::rebuild(tree, path, &index, |container| {
        let at = match placement {
            Placement::At(offset) if offset > container.len() => {
                return Err(EditError::IndexOutOfRange {
                    index: index.clone(),
                    len: container.len(),
                })
            }
            Placement::At(offset) => offset,
            Placement::Append => container.len(),
            Placement::Prepend => 0,
        };
        let mut items = container.items.to_vec();
        items.insert(at, Arc::clone(&item));

        let mut changes = vec![ChangeRecord::reparented(
            item.kind(),
            item.id(),
            container.owner_id(),
            None,
        )];
        changes.extend(order_records(item.kind(), container.items, &items, false));
        Ok((items, changes))
    })?;

    Ok(EditOutcome { tree, changes })
}

/// Move the node at `source` so that it ends up at offset `target.last()` of
/// the same container, in a single splice.
///
/// Both indices must address the same container. Emits display-order
/// records only for same-kind siblings whose ordinal changed.
pub fn move_within_same_container(
    tree: &Tree,
    source: &HierarchicalIndex,
    target: &HierarchicalIndex,
) -> EditResult<EditOutcome> {
    if !source.is_sibling_of(target) {
        return Err(EditError::invalid_drop(
            source,
            target,
            "source and target are in different containers",
        ));
    }

    let (from, to) = (source.last(), target.last());
    let (updated, changes) = cow::rebuild(tree, source.container_path(), source, |container| {
        let len = container.len();
        for (index, offset) in [(source, from), (target, to)] {
            if offset >= len {
                return Err(EditError::IndexOutOfRange {
                    index: index.clone(),
                    len,
                });
            }
        }
        if from == to {
            return Ok((container.items.to_vec(), None));
        }

        let mut items = container.items.to_vec();
        let node = items.remove(from);
        let kind = node.kind();
        items.insert(to, node);
        let changes = order_records(kind, container.items, &items, true);
        Ok((items, Some(changes)))
    })?;

    match changes {
        Some(changes) => Ok(EditOutcome {
            tree: updated,
            changes,
        }),
        // Nothing moved: hand back the input version untouched.
        None => Ok(EditOutcome {
            tree: tree.clone(),
            changes: Vec::new(),
        }),
    }
}

/// Flip the `expanded` flag of the folder at `index`.
///
/// Only the folder and its ancestors are copied; the folder's children are
/// shared with the input. No change records are produced.
pub fn toggle_expanded(tree: &Tree, index: &HierarchicalIndex) -> EditResult<Tree> {
    let offset = index.last();
    let (tree, ()) = cow::rebuild(tree, index.container_path(), index, |container| {
        let node = container
            .items
            .get(offset)
            .ok_or_else(|| EditError::IndexOutOfRange {
                index: index.clone(),
                len: container.len(),
            })?;
        let toggled = node
            .with_expanded_toggled()
            .ok_or_else(|| EditError::NotAFolder(index.clone()))?;
        let mut items = container.items.to_vec();
        items[offset] = Arc::new(toggled);
        Ok((items, ()))
    })?;
    Ok(tree)
}
