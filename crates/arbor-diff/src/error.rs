//! Error types for the diff crate.

use arbor_types::NodeId;

/// Errors that can occur while taking a snapshot.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DiffError {
    /// Two nodes in the same tree share a stable id.
    #[error("duplicate stable id {0} in snapshot")]
    DuplicateId(NodeId),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
