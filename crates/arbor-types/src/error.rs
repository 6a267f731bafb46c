use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hierarchical index {input:?}: {reason}")]
    InvalidIndex { input: String, reason: String },

    #[error("malformed node {id}: {reason}")]
    MalformedNode { id: u64, reason: String },

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl TypeError {
    pub(crate) fn invalid_index(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidIndex {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
