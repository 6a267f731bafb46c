//! Path resolution and copy-on-write edits for Arbor trees.
//!
//! Nodes are addressed by [`HierarchicalIndex`](arbor_types::HierarchicalIndex)
//! rather than by reference. Every edit is a pure function from one tree
//! version to the next: the edited container and its ancestors are copied,
//! all other subtrees are shared, and the structural effect is reported as
//! [`ChangeRecord`](arbor_types::ChangeRecord)s.
//!
//! # Key Types
//!
//! - [`Container`] -- A resolved sibling sequence and its owning folder
//! - [`EditOutcome`] / [`Removal`] -- New tree version plus change records
//! - [`DropOperation`] -- before / after / child placement
//! - [`Affordance`] -- Drag clue classification for a candidate drop

pub mod apply;
mod cow;
pub mod error;
pub mod mutate;
pub mod policy;
pub mod resolve;

#[cfg(test)]
mod test_support;

pub use apply::apply_drop;
pub use error::{EditError, EditResult};
pub use mutate::{
    adjust_for_removal, insert, move_within_same_container, remove, toggle_expanded, EditOutcome,
    Removal,
};
pub use policy::{can_drop, check_drop, classify_affordance, Affordance, DropOperation};
pub use resolve::{
    locate, resolve_children, resolve_node, resolve_parent_container, resolve_parent_id,
    resolve_siblings, Container,
};
