//! Foundation types for Arbor.
//!
//! Arbor edits nested folder/file collections addressed by hierarchical
//! index paths instead of object references, and reconciles tree versions
//! into structural change records. Every other Arbor crate depends on
//! `arbor-types`.
//!
//! # Key Types
//!
//! - [`Tree`] / [`Node`] -- Immutable tree value with `Arc`-shared subtrees
//! - [`NodeId`] -- Stable, position-independent node identity
//! - [`HierarchicalIndex`] -- Path of child offsets, with its string codec
//! - [`PathStep`] -- Navigation plan step (items path / folder path)
//! - [`ChangeRecord`] -- One structural fact from an edit or a diff

pub mod change;
pub mod error;
pub mod index;
pub mod node;

pub use change::{ChangeKind, ChangeRecord, ChangeValue};
pub use error::TypeError;
pub use index::{HierarchicalIndex, PathStep, DEFAULT_DELIMITER};
pub use node::{Node, NodeBody, NodeId, NodeKind, Tree};
