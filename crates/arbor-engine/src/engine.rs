use tracing::{debug, warn};

use arbor_diff::TreeDiff;
use arbor_edit::{Affordance, DropOperation, EditError, EditOutcome};
use arbor_types::{HierarchicalIndex, Tree};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};

/// String-addressed entry points bound to one [`EngineConfig`].
///
/// The engine holds no tree: every call takes the current version and
/// returns the next one.
#[derive(Clone, Debug, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Bind an engine to `config`, which must pass [`EngineConfig::validate`].
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ---- Addressing ----

    pub fn parse_index(&self, path: &str) -> EngineResult<HierarchicalIndex> {
        Ok(HierarchicalIndex::parse_with(path, self.config.delimiter)?)
    }

    pub fn format_index(&self, index: &HierarchicalIndex) -> String {
        index.format_with(self.config.delimiter)
    }

    pub fn parse_operation(&self, operation: &str) -> EngineResult<DropOperation> {
        operation.parse().map_err(EngineError::InvalidOperation)
    }

    // ---- Host-facing operations ----

    /// Apply a completed drag gesture.
    pub fn apply_drop(
        &self,
        tree: &Tree,
        drag: &str,
        operation: DropOperation,
        target: &str,
    ) -> EngineResult<EditOutcome> {
        let drag_index = self.parse_index(drag)?;
        let target_index = self.parse_index(target)?;

        match arbor_edit::apply_drop(tree, &drag_index, operation, &target_index) {
            Ok(outcome) => {
                debug!(
                    drag = %drag,
                    target = %target,
                    op = %operation,
                    changes = outcome.changes.len(),
                    "applied drop"
                );
                Ok(outcome)
            }
            Err(e @ EditError::InvalidDrop { .. }) => {
                // Callers are expected to check eligibility first.
                warn!(drag = %drag, target = %target, op = %operation, error = %e, "drop rejected");
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Compare two tree versions by stable id.
    pub fn diff(&self, before: &Tree, after: &Tree) -> EngineResult<TreeDiff> {
        let diff = arbor_diff::diff_trees(before, after)?;
        debug!(
            added = diff.additions(),
            removed = diff.removals(),
            reparented = diff.reparents(),
            reordered = diff.reorders(),
            "computed tree diff"
        );
        Ok(diff)
    }

    /// Drag clue for a candidate drop.
    pub fn classify_affordance(
        &self,
        tree: &Tree,
        drag: &str,
        target: &str,
        operation: DropOperation,
    ) -> EngineResult<Affordance> {
        let drag = self.parse_index(drag)?;
        let target = self.parse_index(target)?;
        Ok(arbor_edit::classify_affordance(tree, &drag, &target, operation))
    }

    pub fn can_drop(&self, tree: &Tree, drag: &str, target: &str) -> EngineResult<bool> {
        let drag = self.parse_index(drag)?;
        let target = self.parse_index(target)?;
        Ok(arbor_edit::can_drop(tree, &drag, &target))
    }

    pub fn toggle_expanded(&self, tree: &Tree, index: &str) -> EngineResult<Tree> {
        let parsed = self.parse_index(index)?;
        let updated = arbor_edit::toggle_expanded(tree, &parsed)?;
        debug!(index = %index, "toggled folder");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_types::{ChangeRecord, Node, NodeId, NodeKind, TypeError};

    fn tree() -> Tree {
        Tree::new(vec![
            Node::folder(
                10,
                "F1",
                true,
                vec![Node::file(1, "a"), Node::file(2, "b"), Node::file(3, "c")],
            ),
            Node::folder(20, "F2", true, vec![Node::file(4, "d"), Node::file(5, "e")]),
        ])
    }

    #[test]
    fn move_file_after_last_sibling() {
        let engine = Engine::default();
        let outcome = engine
            .apply_drop(&tree(), "0_0", DropOperation::After, "0_2")
            .unwrap();
        let order = |id, offset, original| {
            ChangeRecord::display_order(NodeKind::File, NodeId(id), offset, Some(original))
        };
        assert_eq!(outcome.changes, vec![order(2, 0, 1), order(3, 1, 2), order(1, 2, 0)]);
    }

    #[test]
    fn configured_delimiter() {
        let engine = Engine::new(EngineConfig {
            delimiter: '/',
            ..Default::default()
        })
        .unwrap();
        assert_eq!(engine.parse_index("0/2").unwrap().segments(), &[0, 2]);
        assert_eq!(engine.format_index(&engine.parse_index("1/0").unwrap()), "1/0");
        assert!(engine.parse_index("0_2").is_err());
    }

    #[test]
    fn digit_delimiter_rejected_at_construction() {
        let config = EngineConfig {
            delimiter: '1',
            ..Default::default()
        };
        assert!(matches!(Engine::new(config), Err(EngineError::Config(_))));
    }

    #[test]
    fn malformed_index_is_invalid_index() {
        let engine = Engine::default();
        let err = engine
            .apply_drop(&tree(), "0_items_2", DropOperation::Before, "0_0")
            .unwrap_err();
        assert!(matches!(err, EngineError::Type(TypeError::InvalidIndex { .. })));
    }

    #[test]
    fn rejected_drop_surfaces_invalid_drop() {
        let engine = Engine::default();
        let err = engine
            .apply_drop(&tree(), "0", DropOperation::Child, "0_1")
            .unwrap_err();
        assert!(matches!(err, EngineError::Edit(EditError::InvalidDrop { .. })));
    }

    #[test]
    fn classify_and_can_drop() {
        let engine = Engine::default();
        let t = tree();
        assert!(engine.can_drop(&t, "1", "0").unwrap());
        assert!(!engine.can_drop(&t, "0_0", "0").unwrap());
        assert_eq!(
            engine.classify_affordance(&t, "1", "0", DropOperation::Child).unwrap(),
            Affordance::EnterContainer
        );
    }

    #[test]
    fn parse_operation() {
        let engine = Engine::default();
        assert_eq!(engine.parse_operation("child").unwrap(), DropOperation::Child);
        assert!(matches!(
            engine.parse_operation("into"),
            Err(EngineError::InvalidOperation(_))
        ));
    }

    #[test]
    fn diff_after_drop_reports_reparent() {
        let engine = Engine::default();
        let before = tree();
        let outcome = engine
            .apply_drop(&before, "1", DropOperation::Child, "0")
            .unwrap();
        let diff = engine.diff(&before, &outcome.tree).unwrap();
        let record = diff
            .find(NodeId(20), arbor_types::ChangeKind::Reparented)
            .unwrap();
        assert_eq!(record.value, arbor_types::ChangeValue::Parent(Some(NodeId(10))));
        assert_eq!(record.original, Some(arbor_types::ChangeValue::Parent(None)));
    }
}
