//! Diff engine for Arbor.
//!
//! Compares two tree versions by stable node identity and reports the
//! difference as [`ChangeRecord`](arbor_types::ChangeRecord)s suitable for
//! persistence: added, removed, reparented, and display-order-changed.
//!
//! # Key Types
//!
//! - [`Snapshot`] / [`SnapshotEntry`] -- Tree flattened to id → (kind, offset, parent)
//! - [`TreeDiff`] -- The set of change records between two snapshots

pub mod error;
pub mod snapshot;
pub mod tree_diff;

pub use error::{DiffError, DiffResult};
pub use snapshot::{Snapshot, SnapshotEntry};
pub use tree_diff::{diff_snapshots, diff_trees, TreeDiff};
