//! Error types for the edit crate.

use arbor_types::HierarchicalIndex;

/// Errors that can occur while resolving or editing a tree.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EditError {
    /// An intermediate node on the path is missing or is not a folder.
    #[error("path not found: {index} (no folder at depth {depth})")]
    PathNotFound {
        index: HierarchicalIndex,
        depth: usize,
    },

    /// The final offset lies beyond the end of its container.
    #[error("index out of range: {index} (container holds {len})")]
    IndexOutOfRange {
        index: HierarchicalIndex,
        len: usize,
    },

    /// The drop is not permitted (kind pairing, self-descendant target, or
    /// source and target in different containers for an in-place move).
    #[error("invalid drop of {source_index} onto {target}: {reason}")]
    InvalidDrop {
        source_index: HierarchicalIndex,
        target: HierarchicalIndex,
        reason: String,
    },

    /// A folder-only operation addressed a file.
    #[error("not a folder: {0}")]
    NotAFolder(HierarchicalIndex),
}

impl EditError {
    pub(crate) fn invalid_drop(
        source: &HierarchicalIndex,
        target: &HierarchicalIndex,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidDrop {
            source_index: source.clone(),
            target: target.clone(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias for edit results.
pub type EditResult<T> = Result<T, EditError>;
