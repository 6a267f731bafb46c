//! Tree-level diff: compare two snapshots by stable id.
//!
//! Nodes are matched by [`NodeId`], never by position, so a move shows up as
//! a reparent and/or an order change rather than a removal plus an addition.

use arbor_types::{ChangeKind, ChangeRecord, NodeId, Tree};

use crate::error::DiffResult;
use crate::snapshot::Snapshot;

/// The result of comparing two trees.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeDiff {
    /// Independent structural facts; their order carries no meaning.
    pub changes: Vec<ChangeRecord>,
}

impl TreeDiff {
    /// Create an empty tree diff.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if there are no changes.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changes.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Number of added nodes.
    pub fn additions(&self) -> usize {
        self.count(ChangeKind::Added)
    }

    /// Number of removed nodes.
    pub fn removals(&self) -> usize {
        self.count(ChangeKind::Removed)
    }

    /// Number of nodes that moved to another container.
    pub fn reparents(&self) -> usize {
        self.count(ChangeKind::Reparented)
    }

    /// Number of nodes whose offset within their container changed.
    pub fn reorders(&self) -> usize {
        self.count(ChangeKind::DisplayOrderChanged)
    }

    /// The change of `kind` recorded for `id`, if any.
    pub fn find(&self, id: NodeId, kind: ChangeKind) -> Option<&ChangeRecord> {
        self.changes.iter().find(|c| c.id == id && c.change == kind)
    }

    fn count(&self, kind: ChangeKind) -> usize {
        self.changes.iter().filter(|c| c.change == kind).count()
    }
}

/// Compare two trees.
///
/// Fails only if either tree contains a duplicate stable id.
pub fn diff_trees(before: &Tree, after: &Tree) -> DiffResult<TreeDiff> {
    let old = Snapshot::from_tree(before)?;
    let new = Snapshot::from_tree(after)?;
    Ok(diff_snapshots(&old, &new))
}

/// Compare two snapshots.
///
/// - id in both, parent changed: `Reparented` (new parent, original parent)
/// - id in both, offset changed: `DisplayOrderChanged` (new offset, original offset)
/// - id only in `after`: `Added` (its parent)
/// - id only in `before`: `Removed` (its former parent)
pub fn diff_snapshots(before: &Snapshot, after: &Snapshot) -> TreeDiff {
    let mut changes = Vec::new();

    // Find removed and moved nodes.
    for (id, old) in before.iter() {
        match after.get(id) {
            Some(new) => {
                if old.parent != new.parent {
                    changes.push(ChangeRecord::reparented(
                        new.kind,
                        *id,
                        new.parent,
                        Some(old.parent),
                    ));
                }
                if old.offset != new.offset {
                    changes.push(ChangeRecord::display_order(
                        new.kind,
                        *id,
                        new.offset,
                        Some(old.offset),
                    ));
                }
            }
            None => changes.push(ChangeRecord::removed(old.kind, *id, old.parent)),
        }
    }

    // Find added nodes.
    for (id, new) in after.iter() {
        if !before.contains(id) {
            changes.push(ChangeRecord::added(new.kind, *id, new.parent));
        }
    }

    TreeDiff { changes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_types::{ChangeValue, Node, NodeKind};
    use proptest::prelude::*;

    fn f1_f2(f1: Vec<Node>, f2: Vec<Node>) -> Tree {
        Tree::new(vec![
            Node::folder(10, "F1", true, f1),
            Node::folder(20, "F2", true, f2),
        ])
    }

    fn abc() -> Vec<Node> {
        vec![Node::file(1, "a"), Node::file(2, "b"), Node::file(3, "c")]
    }

    fn de() -> Vec<Node> {
        vec![Node::file(4, "d"), Node::file(5, "e")]
    }

    #[test]
    fn identical_trees_no_changes() {
        let tree = f1_f2(abc(), de());
        let diff = diff_trees(&tree, &tree).unwrap();
        assert!(diff.is_empty());
    }

    #[test]
    fn empty_to_populated_all_additions() {
        let tree = f1_f2(abc(), de());
        let diff = diff_trees(&Tree::empty(), &tree).unwrap();
        assert_eq!(diff.len(), 7);
        assert_eq!(diff.additions(), 7);
        assert_eq!(
            diff.find(NodeId(4), ChangeKind::Added),
            Some(&ChangeRecord::added(NodeKind::File, NodeId(4), Some(NodeId(20))))
        );
    }

    #[test]
    fn populated_to_empty_all_removals() {
        let tree = f1_f2(abc(), de());
        let diff = diff_trees(&tree, &Tree::empty()).unwrap();
        assert_eq!(diff.removals(), 7);
        assert_eq!(
            diff.find(NodeId(10), ChangeKind::Removed),
            Some(&ChangeRecord::removed(NodeKind::Folder, NodeId(10), None))
        );
    }

    #[test]
    fn reorder_within_folder() {
        let before = f1_f2(abc(), de());
        let after = f1_f2(
            vec![Node::file(2, "b"), Node::file(3, "c"), Node::file(1, "a")],
            de(),
        );
        let diff = diff_trees(&before, &after).unwrap();
        assert_eq!(diff.len(), 3);
        assert_eq!(diff.reorders(), 3);
        assert_eq!(
            diff.find(NodeId(1), ChangeKind::DisplayOrderChanged),
            Some(&ChangeRecord::display_order(NodeKind::File, NodeId(1), 2, Some(0)))
        );
    }

    #[test]
    fn folder_moved_into_sibling_folder() {
        let before = f1_f2(abc(), de());
        let after = Tree::new(vec![Node::folder(
            10,
            "F1",
            true,
            vec![
                Node::folder(20, "F2", true, de()),
                Node::file(1, "a"),
                Node::file(2, "b"),
                Node::file(3, "c"),
            ],
        )]);
        let diff = diff_trees(&before, &after).unwrap();

        let reparent = diff.find(NodeId(20), ChangeKind::Reparented).unwrap();
        assert_eq!(reparent.value, ChangeValue::Parent(Some(NodeId(10))));
        assert_eq!(reparent.original, Some(ChangeValue::Parent(None)));
        assert_eq!(diff.reparents(), 1);
        // F2 went from root offset 1 to offset 0 of F1; its children kept
        // their parent and offsets.
        assert!(diff.find(NodeId(20), ChangeKind::DisplayOrderChanged).is_some());
        assert!(diff.find(NodeId(4), ChangeKind::Reparented).is_none());
        assert!(diff.find(NodeId(4), ChangeKind::DisplayOrderChanged).is_none());
        assert_eq!(diff.additions() + diff.removals(), 0);
    }

    #[test]
    fn reparent_without_offset_change() {
        let before = f1_f2(abc(), de());
        let after = f1_f2(
            vec![Node::file(4, "d"), Node::file(2, "b"), Node::file(3, "c")],
            vec![Node::file(1, "a"), Node::file(5, "e")],
        );
        let diff = diff_trees(&before, &after).unwrap();
        assert_eq!(diff.reparents(), 2);
        assert_eq!(diff.reorders(), 0);
    }

    #[test]
    fn mixed_changes() {
        let before = f1_f2(abc(), de());
        let after = f1_f2(
            vec![Node::file(1, "a"), Node::file(3, "c")],
            vec![Node::file(4, "d"), Node::file(5, "e"), Node::file(6, "f")],
        );
        let diff = diff_trees(&before, &after).unwrap();
        assert_eq!(diff.len(), 3);
        assert!(diff.find(NodeId(2), ChangeKind::Removed).is_some());
        assert!(diff.find(NodeId(6), ChangeKind::Added).is_some());
        assert_eq!(
            diff.find(NodeId(3), ChangeKind::DisplayOrderChanged),
            Some(&ChangeRecord::display_order(NodeKind::File, NodeId(3), 1, Some(2)))
        );
    }

    #[test]
    fn duplicate_ids_fail() {
        let tree = Tree::new(vec![Node::file(1, "a"), Node::file(1, "b")]);
        assert!(diff_trees(&tree, &Tree::empty()).is_err());
    }

    fn arb_tree() -> impl Strategy<Value = Tree> {
        let leaf = (0u64..1_000_000).prop_map(|id| Node::file(id, "f"));
        let node = leaf.prop_recursive(3, 24, 4, |inner| {
            (0u64..1_000_000, any::<bool>(), prop::collection::vec(inner, 0..4))
                .prop_map(|(id, expanded, children)| Node::folder(id, "d", expanded, children))
        });
        prop::collection::vec(node, 0..4).prop_map(renumber)
    }

    /// Reassign ids depth-first so every node is unique.
    fn renumber(roots: Vec<Node>) -> Tree {
        fn go(node: &Node, next: &mut u64) -> Node {
            *next += 1;
            let id = *next;
            match node.children() {
                Some(children) => Node::folder(
                    id,
                    node.label(),
                    node.is_expanded(),
                    children.iter().map(|c| go(c, next)).collect(),
                ),
                None => Node::file(id, node.label()),
            }
        }
        let mut next = 0;
        Tree::new(roots.iter().map(|n| go(n, &mut next)).collect())
    }

    proptest! {
        #[test]
        fn self_diff_is_empty(tree in arb_tree()) {
            prop_assert!(diff_trees(&tree, &tree).unwrap().is_empty());
        }

        #[test]
        fn diff_against_empty_counts_every_node(tree in arb_tree()) {
            let count = tree.node_count();
            let diff = diff_trees(&Tree::empty(), &tree).unwrap();
            prop_assert_eq!(diff.additions(), count);
            let diff = diff_trees(&tree, &Tree::empty()).unwrap();
            prop_assert_eq!(diff.removals(), count);
        }
    }
}
