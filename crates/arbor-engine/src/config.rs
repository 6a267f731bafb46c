use serde::{Deserialize, Serialize};

use arbor_types::DEFAULT_DELIMITER;

use crate::error::{EngineError, EngineResult};

/// Configuration for an [`Engine`](crate::Engine).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Separator between offsets in hierarchical index strings.
    pub delimiter: char,
    /// Reject trees with duplicate stable ids when a session is opened.
    pub check_unique_ids: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            check_unique_ids: true,
        }
    }
}

impl EngineConfig {
    /// Reject settings under which formatted indices would not parse back.
    pub fn validate(&self) -> EngineResult<()> {
        if self.delimiter.is_ascii_digit() {
            return Err(EngineError::Config(format!(
                "delimiter {:?} is a digit",
                self.delimiter
            )));
        }
        Ok(())
    }
}
