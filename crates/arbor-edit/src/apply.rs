//! Drop orchestration: turn a completed drag gesture into a tree edit.

use std::collections::HashMap;
use std::sync::Arc;

use arbor_types::{ChangeKind, ChangeRecord, ChangeValue, HierarchicalIndex, NodeId, NodeKind, Tree};

use crate::error::{EditError, EditResult};
use crate::mutate::{insert, move_within_same_container, remove, EditOutcome};
use crate::policy::{check_drop, DropOperation};
use crate::resolve::{locate, resolve_node, resolve_parent_id, resolve_siblings};

/// Apply a drop of the node at `drag` relative to the node at `target`.
///
/// A same-kind `Before`/`After` drop inside one container is a single
/// splice. Anything else detaches the dragged node, finds the destination
/// again by stable id in the reduced tree, and inserts relative to it.
///
/// Fails with [`EditError::InvalidDrop`] when [`check_drop`] rejects the
/// gesture or when `Child` targets a file.
pub fn apply_drop(
    tree: &Tree,
    drag: &HierarchicalIndex,
    operation: DropOperation,
    target: &HierarchicalIndex,
) -> EditResult<EditOutcome> {
    check_drop(tree, drag, target)?;

    let dragged = Arc::clone(resolve_node(drag, tree)?);
    let destination = Arc::clone(resolve_node(target, tree)?);

    if operation == DropOperation::Child && !destination.is_folder() {
        return Err(EditError::invalid_drop(drag, target, "cannot drop into a file"));
    }

    if operation != DropOperation::Child
        && dragged.kind() == destination.kind()
        && drag.is_sibling_of(target)
    {
        let from = drag.last();
        let mut to = target.last();
        if operation == DropOperation::After {
            to += 1;
        }
        if from < to {
            to -= 1;
        }
        return move_within_same_container(tree, drag, &drag.with_last(to));
    }

    let former_parent = resolve_parent_id(drag, tree)?;
    let former_ordinal = resolve_siblings(drag, tree)?
        .iter()
        .filter(|n| n.kind() == dragged.kind())
        .position(|n| n.id() == dragged.id());
    let removal = remove(tree, drag)?;

    let relocated = locate(&removal.tree, destination.id()).ok_or_else(|| {
        EditError::invalid_drop(drag, target, "destination vanished with the dragged node")
    })?;
    let insert_at = match operation {
        DropOperation::Before => relocated,
        DropOperation::After => relocated.with_last(relocated.last() + 1),
        DropOperation::Child => relocated.child(0),
    };

    let inserted = insert(&removal.tree, removal.removed, &destination, &insert_at, None)?;
    let stayed_in_container = inserted.changes.iter().any(|record| {
        record.change == ChangeKind::Reparented
            && record.id == dragged.id()
            && record.value == ChangeValue::Parent(former_parent)
    });

    let changes = removal
        .changes
        .into_iter()
        .chain(inserted.changes.into_iter().map(|record| {
            if record.change == ChangeKind::Reparented && record.id == dragged.id() {
                record.with_original(ChangeValue::Parent(former_parent))
            } else {
                record
            }
        }))
        .collect();

    let mut changes = coalesce(changes);
    if let (true, Some(prior)) = (stayed_in_container, former_ordinal) {
        // The removal records never mention the dragged node itself.
        for record in changes.iter_mut().filter(|r| {
            r.id == dragged.id() && r.change == ChangeKind::DisplayOrderChanged
        }) {
            if record.original.is_none() && record.value != ChangeValue::Offset(prior) {
                record.original = Some(ChangeValue::Offset(prior));
            }
        }
    }

    Ok(EditOutcome {
        tree: inserted.tree,
        changes,
    })
}

/// Merge display-order records that describe the same node more than once
/// (removal followed by insertion into the same container).
///
/// The first record supplies the position before the drop and the last one
/// the position after it; the merged record keeps the first record's slot.
fn coalesce(changes: Vec<ChangeRecord>) -> Vec<ChangeRecord> {
    let mut slots: HashMap<(NodeId, NodeKind), usize> = HashMap::new();
    let mut merged: Vec<ChangeRecord> = Vec::with_capacity(changes.len());

    for record in changes {
        let ChangeValue::Offset(offset) = record.value else {
            merged.push(record);
            continue;
        };
        if record.change != ChangeKind::DisplayOrderChanged {
            merged.push(record);
            continue;
        }
        match slots.get(&(record.id, record.kind)) {
            Some(&slot) => {
                let first = &merged[slot];
                let before = first.original.unwrap_or(first.value);
                merged[slot] = ChangeRecord {
                    value: ChangeValue::Offset(offset),
                    original: (before != ChangeValue::Offset(offset)).then_some(before),
                    ..record
                };
            }
            None => {
                slots.insert((record.id, record.kind), merged.len());
                merged.push(record);
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::resolve_children;
    use crate::test_support::{idx, ids, sample_tree, two_folders};
    use arbor_types::Node;

    fn order(id: u64, offset: usize, original: Option<usize>) -> ChangeRecord {
        ChangeRecord::display_order(NodeKind::File, NodeId(id), offset, original)
    }

    #[test]
    fn file_after_last_sibling() {
        let tree = two_folders();
        let outcome = apply_drop(&tree, &idx("0_0"), DropOperation::After, &idx("0_2")).unwrap();
        assert_eq!(ids(resolve_children(&idx("0"), &outcome.tree).unwrap().items), vec![2, 3, 1]);
        assert_eq!(
            outcome.changes,
            vec![order(2, 0, Some(1)), order(3, 1, Some(2)), order(1, 2, Some(0))]
        );
    }

    #[test]
    fn file_before_earlier_sibling() {
        let tree = two_folders();
        let outcome = apply_drop(&tree, &idx("0_2"), DropOperation::Before, &idx("0_0")).unwrap();
        assert_eq!(ids(resolve_children(&idx("0"), &outcome.tree).unwrap().items), vec![3, 1, 2]);
    }

    #[test]
    fn file_before_next_sibling_is_a_no_op() {
        let tree = two_folders();
        let outcome = apply_drop(&tree, &idx("0_0"), DropOperation::Before, &idx("0_1")).unwrap();
        assert_eq!(outcome.tree, tree);
        assert!(outcome.changes.is_empty());
    }

    #[test]
    fn file_into_other_folder() {
        let tree = two_folders();
        let outcome = apply_drop(&tree, &idx("0_1"), DropOperation::Before, &idx("1_1")).unwrap();
        assert_eq!(ids(resolve_children(&idx("0"), &outcome.tree).unwrap().items), vec![1, 3]);
        assert_eq!(ids(resolve_children(&idx("1"), &outcome.tree).unwrap().items), vec![4, 2, 5]);
        assert!(outcome.changes.contains(&ChangeRecord::reparented(
            NodeKind::File,
            NodeId(2),
            Some(NodeId(20)),
            Some(Some(NodeId(10))),
        )));
        assert!(outcome.changes.contains(&order(3, 1, Some(2))));
        assert!(outcome.changes.contains(&order(5, 2, Some(1))));
    }

    #[test]
    fn folder_as_child_of_folder() {
        let tree = two_folders();
        let outcome = apply_drop(&tree, &idx("1"), DropOperation::Child, &idx("0")).unwrap();
        assert_eq!(ids(outcome.tree.roots()), vec![10]);
        let f1 = resolve_children(&idx("0"), &outcome.tree).unwrap();
        assert_eq!(ids(f1.items), vec![20, 1, 2, 3]);
        assert!(outcome.changes.contains(&ChangeRecord::reparented(
            NodeKind::Folder,
            NodeId(20),
            Some(NodeId(10)),
            Some(None),
        )));
    }

    #[test]
    fn destination_shifted_by_removal_is_found_by_id() {
        // Drag root folder 0 after the folder at "2_0"; removal moves it to "1_0".
        let tree = Tree::new(vec![
            Node::folder(10, "A", true, vec![]),
            Node::folder(20, "B", true, vec![]),
            Node::folder(30, "C", true, vec![Node::folder(31, "C1", true, vec![])]),
        ]);
        let outcome = apply_drop(&tree, &idx("0"), DropOperation::After, &idx("2_0")).unwrap();
        assert_eq!(ids(outcome.tree.roots()), vec![20, 30]);
        assert_eq!(
            ids(resolve_children(&idx("1"), &outcome.tree).unwrap().items),
            vec![31, 10]
        );
    }

    #[test]
    fn folder_onto_file_is_appended() {
        let tree = sample_tree();
        let outcome = apply_drop(&tree, &idx("0"), DropOperation::Before, &idx("1_0")).unwrap();
        assert_eq!(
            ids(resolve_children(&idx("0"), &outcome.tree).unwrap().items),
            vec![4, 5, 102, 100]
        );
    }

    #[test]
    fn folder_onto_file_in_same_container_coalesces_orders() {
        // Root: folder A, folder B, file x. Drag A onto x: removed then
        // appended within the root sequence.
        let tree = Tree::new(vec![
            Node::folder(10, "A", true, vec![]),
            Node::folder(20, "B", true, vec![]),
            Node::file(1, "x"),
        ]);
        let outcome = apply_drop(&tree, &idx("0"), DropOperation::After, &idx("2")).unwrap();
        assert_eq!(ids(outcome.tree.roots()), vec![20, 1, 10]);

        let b: Vec<_> = outcome.changes.iter().filter(|r| r.id == NodeId(20)).collect();
        assert_eq!(b.len(), 1);
        assert_eq!(
            *b[0],
            ChangeRecord::display_order(NodeKind::Folder, NodeId(20), 0, Some(1))
        );
        let a: Vec<_> = outcome
            .changes
            .iter()
            .filter(|r| r.id == NodeId(10) && r.change == ChangeKind::DisplayOrderChanged)
            .collect();
        assert_eq!(
            a,
            vec![&ChangeRecord::display_order(NodeKind::Folder, NodeId(10), 1, Some(0))]
        );
    }

    #[test]
    fn child_of_file_is_rejected() {
        let tree = sample_tree();
        let err = apply_drop(&tree, &idx("1_2"), DropOperation::Child, &idx("0_0")).unwrap_err();
        assert!(matches!(err, EditError::InvalidDrop { .. }));
    }

    #[test]
    fn ineligible_drops_leave_no_tree() {
        let tree = sample_tree();
        for (drag, op, target) in [
            ("1", DropOperation::Child, "1_2"),
            ("0_0", DropOperation::Child, "1_2"),
            ("0_1", DropOperation::After, "0_1"),
        ] {
            assert!(matches!(
                apply_drop(&tree, &idx(drag), op, &idx(target)),
                Err(EditError::InvalidDrop { .. })
            ));
        }
    }

    #[test]
    fn input_tree_is_untouched() {
        let tree = sample_tree();
        let snapshot = tree.clone();
        let _ = apply_drop(&tree, &idx("1_2"), DropOperation::Child, &idx("0")).unwrap();
        assert_eq!(tree, snapshot);
    }
}
