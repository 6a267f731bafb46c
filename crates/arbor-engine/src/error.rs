use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid drop operation: {0}")]
    InvalidOperation(String),

    /// Configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("type error: {0}")]
    Type(#[from] arbor_types::TypeError),

    #[error("edit error: {0}")]
    Edit(#[from] arbor_edit::EditError),

    #[error("diff error: {0}")]
    Diff(#[from] arbor_diff::DiffError),
}

pub type EngineResult<T> = Result<T, EngineError>;
