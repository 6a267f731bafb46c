//! Shared fixtures for unit tests.

use std::sync::Arc;

use arbor_types::{HierarchicalIndex, Node, Tree};

pub(crate) fn idx(s: &str) -> HierarchicalIndex {
    HierarchicalIndex::parse(s).unwrap()
}

/// ```text
/// 0     Furniture (100)
/// 0_0     Tables & Chairs (1)
/// 0_1     Sofas (2)
/// 0_2     Occasional Furniture (3)
/// 1     Decor (101)
/// 1_0     Bed Linen (4)
/// 1_1     Curtains & Blinds (5)
/// 1_2     Carpets (102)
/// 1_2_0     High Pile (6)
/// 1_2_1     Low Pile (7)
/// ```
pub(crate) fn sample_tree() -> Tree {
    Tree::new(vec![
        Node::folder(
            100,
            "Furniture",
            true,
            vec![
                Node::file(1, "Tables & Chairs"),
                Node::file(2, "Sofas"),
                Node::file(3, "Occasional Furniture"),
            ],
        ),
        Node::folder(
            101,
            "Decor",
            true,
            vec![
                Node::file(4, "Bed Linen"),
                Node::file(5, "Curtains & Blinds"),
                Node::folder(
                    102,
                    "Carpets",
                    true,
                    vec![Node::file(6, "High Pile"), Node::file(7, "Low Pile")],
                ),
            ],
        ),
    ])
}

/// Two root folders: F1 (10) holding files a, b, c (1, 2, 3) and F2 (20)
/// holding files d, e (4, 5).
pub(crate) fn two_folders() -> Tree {
    Tree::new(vec![
        Node::folder(
            10,
            "F1",
            true,
            vec![Node::file(1, "a"), Node::file(2, "b"), Node::file(3, "c")],
        ),
        Node::folder(20, "F2", true, vec![Node::file(4, "d"), Node::file(5, "e")]),
    ])
}

/// Stable ids of a container, in order.
pub(crate) fn ids(items: &[Arc<Node>]) -> Vec<u64> {
    items.iter().map(|n| n.id().0).collect()
}
