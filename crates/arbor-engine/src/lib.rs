//! High-level API for Arbor.
//!
//! Provides configured, string-addressed entry points for the drag-and-drop
//! host and the persistence layer. This is the main entry point for
//! applications embedding Arbor.

pub mod config;
pub mod engine;
pub mod error;
pub mod session;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{EngineError, EngineResult};
pub use session::Session;

// Re-export key types
pub use arbor_diff::{Snapshot, TreeDiff};
pub use arbor_edit::{Affordance, DropOperation, EditError, EditOutcome};
pub use arbor_types::{
    ChangeKind, ChangeRecord, ChangeValue, HierarchicalIndex, Node, NodeId, NodeKind, Tree,
};
