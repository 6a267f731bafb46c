//! A host's single current-tree reference plus the change journal awaiting
//! persistence.

use tracing::{debug, info};

use arbor_diff::{Snapshot, TreeDiff};
use arbor_edit::{Affordance, DropOperation};
use arbor_types::{ChangeRecord, Tree};

use crate::engine::Engine;
use crate::error::EngineResult;

/// Holds the current tree version for one interaction session.
///
/// Each successful edit replaces the current tree in one step; a failed edit
/// leaves it untouched. Change records from every drop accumulate in a
/// pending journal until [`take_changes`](Session::take_changes) drains it.
#[derive(Debug)]
pub struct Session {
    engine: Engine,
    tree: Tree,
    pending: Vec<ChangeRecord>,
}

impl Session {
    /// Open a session over `tree`. With `check_unique_ids` set, a tree with
    /// duplicate stable ids is rejected.
    pub fn new(engine: Engine, tree: Tree) -> EngineResult<Self> {
        if engine.config().check_unique_ids {
            let snapshot = Snapshot::from_tree(&tree)?;
            info!(nodes = snapshot.len(), "opened session");
        }
        Ok(Self {
            engine,
            tree,
            pending: Vec::new(),
        })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// The current tree version.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn into_tree(self) -> Tree {
        self.tree
    }

    /// Changes recorded since the last [`take_changes`](Session::take_changes).
    pub fn pending_changes(&self) -> &[ChangeRecord] {
        &self.pending
    }

    /// Drain the pending journal.
    pub fn take_changes(&mut self) -> Vec<ChangeRecord> {
        std::mem::take(&mut self.pending)
    }

    /// Apply a drop to the current tree and return the records it produced.
    pub fn drop_item(
        &mut self,
        drag: &str,
        operation: DropOperation,
        target: &str,
    ) -> EngineResult<Vec<ChangeRecord>> {
        let outcome = self.engine.apply_drop(&self.tree, drag, operation, target)?;
        self.tree = outcome.tree;
        self.pending.extend(outcome.changes.iter().cloned());
        debug!(pending = self.pending.len(), "journal updated");
        Ok(outcome.changes)
    }

    pub fn toggle_expanded(&mut self, index: &str) -> EngineResult<()> {
        self.tree = self.engine.toggle_expanded(&self.tree, index)?;
        Ok(())
    }

    pub fn classify(
        &self,
        drag: &str,
        target: &str,
        operation: DropOperation,
    ) -> EngineResult<Affordance> {
        self.engine
            .classify_affordance(&self.tree, drag, target, operation)
    }

    /// Diff from `baseline` to the current tree.
    pub fn diff_against(&self, baseline: &Tree) -> EngineResult<TreeDiff> {
        self.engine.diff(baseline, &self.tree)
    }
}
