//! Drop eligibility and drag affordance classification.
//!
//! These are the checks a host runs while a drag is in flight: whether the
//! current destination accepts the dragged node, and which clue to show.

use std::fmt;
use std::str::FromStr;

use arbor_types::{HierarchicalIndex, Tree};

use crate::error::{EditError, EditResult};
use crate::resolve::{resolve_node, resolve_siblings};

/// Placement of a dragged node relative to its destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DropOperation {
    Before,
    After,
    Child,
}

impl fmt::Display for DropOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Before => write!(f, "before"),
            Self::After => write!(f, "after"),
            Self::Child => write!(f, "child"),
        }
    }
}

impl FromStr for DropOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            "child" => Ok(Self::Child),
            other => Err(format!("unknown drop operation: {other}")),
        }
    }
}

/// Drag clue shown for a candidate drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Affordance {
    InsertAtStart,
    InsertAtEnd,
    InsertMiddle,
    EnterContainer,
    Reject,
}

impl Affordance {
    /// Icon class understood by the host's drag-clue renderer.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::InsertAtStart => "k-i-insert-up",
            Self::InsertAtEnd => "k-i-insert-down",
            Self::InsertMiddle => "k-i-insert-middle",
            Self::EnterContainer => "k-i-plus",
            Self::Reject => "k-i-cancel",
        }
    }

    pub fn is_permitted(&self) -> bool {
        *self != Self::Reject
    }
}

impl fmt::Display for Affordance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsertAtStart => write!(f, "insert-at-start"),
            Self::InsertAtEnd => write!(f, "insert-at-end"),
            Self::InsertMiddle => write!(f, "insert-middle"),
            Self::EnterContainer => write!(f, "enter-container"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

/// Check that the node at `drag` may be dropped on the node at `target`.
///
/// Rejects dropping a node onto itself or anywhere inside its own subtree,
/// and cross-kind drops unless the dragged node is a folder. Indices that do
/// not resolve are reported with the resolver's error.
pub fn check_drop(tree: &Tree, drag: &HierarchicalIndex, target: &HierarchicalIndex) -> EditResult<()> {
    if target == drag {
        return Err(EditError::invalid_drop(drag, target, "target is the dragged node"));
    }
    if target.is_within(drag) {
        return Err(EditError::invalid_drop(
            drag,
            target,
            "target is inside the dragged node's subtree",
        ));
    }

    let dragged = resolve_node(drag, tree)?;
    let destination = resolve_node(target, tree)?;
    if dragged.kind() != destination.kind() && !dragged.is_folder() {
        return Err(EditError::invalid_drop(
            drag,
            target,
            format!("cannot drop {} onto {}", dragged.kind(), destination.kind()),
        ));
    }
    Ok(())
}

/// `true` if [`check_drop`] passes.
pub fn can_drop(tree: &Tree, drag: &HierarchicalIndex, target: &HierarchicalIndex) -> bool {
    check_drop(tree, drag, target).is_ok()
}

/// Classify a candidate drop for the drag clue.
///
/// `Child` enters a destination folder and is rejected on a file. For
/// `Before`/`After`, the destination's position among its same-kind
/// siblings decides: before the first is `InsertAtStart`, after the last is
/// `InsertAtEnd`, anything else `InsertMiddle`. A folder dragged onto a file
/// is always appended to that file's container, hence `InsertAtEnd`.
pub fn classify_affordance(
    tree: &Tree,
    drag: &HierarchicalIndex,
    target: &HierarchicalIndex,
    operation: DropOperation,
) -> Affordance {
    if !can_drop(tree, drag, target) {
        return Affordance::Reject;
    }
    let (Ok(dragged), Ok(destination), Ok(siblings)) = (
        resolve_node(drag, tree),
        resolve_node(target, tree),
        resolve_siblings(target, tree),
    ) else {
        return Affordance::Reject;
    };

    if operation == DropOperation::Child {
        return if destination.is_folder() {
            Affordance::EnterContainer
        } else {
            Affordance::Reject
        };
    }
    if dragged.kind() != destination.kind() {
        return Affordance::InsertAtEnd;
    }

    let kind = destination.kind();
    let same_kind: Vec<_> = siblings.iter().filter(|n| n.kind() == kind).collect();
    let ordinal = same_kind
        .iter()
        .position(|n| n.id() == destination.id())
        .unwrap_or_default();

    match operation {
        DropOperation::Before if ordinal == 0 => Affordance::InsertAtStart,
        DropOperation::After if ordinal + 1 == same_kind.len() => Affordance::InsertAtEnd,
        _ => Affordance::InsertMiddle,
    }
}
