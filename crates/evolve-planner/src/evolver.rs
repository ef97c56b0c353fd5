//! Plan replay
//!
//! Applies a saved plan's entries for one file, in order, to that file's
//! tree. Each entry's path is resolved against the tree as rewritten by the
//! entries before it.

use evolve_syntax::SyntaxNode;

use crate::error::ReplayError;
use crate::plan::Plan;
use crate::source::SourceFile;

/// Replays plans against source trees
#[derive(Debug, Clone, Copy, Default)]
pub struct Evolver;

impl Evolver {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Apply the plan's entries for `source` and return the evolved file
    ///
    /// # Errors
    ///
    /// [`ReplayError::PathNotFound`] when an entry's path does not resolve
    /// and [`ReplayError::NotAccepted`] when the node there is not one the
    /// entry's evolution applies to. Replay stops at the first failure.
    pub fn apply(&self, source: &SourceFile, plan: &Plan) -> Result<SourceFile, ReplayError> {
        let mut root = source.root.clone();
        let mut applied = 0usize;

        for entry in plan.entries_for(&source.path) {
            let not_found = || ReplayError::PathNotFound {
                location: entry.location().to_string(),
            };
            let node = root.node_at(entry.path()).ok_or_else(not_found)?;
            if !entry.evolution().accepts(node) {
                return Err(ReplayError::NotAccepted {
                    location: entry.location().to_string(),
                    kind: entry.evolution().kind(),
                });
            }
            let evolved: SyntaxNode = entry.evolution().apply(node);
            root = root.replacing_at(entry.path(), evolved).ok_or_else(not_found)?;
            applied += 1;
        }

        tracing::debug!(file = %source.path, applied, "replayed plan");
        Ok(SourceFile::new(source.path.clone(), root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::PlannedEvolution;
    use evolve_catalog::{ChangeDefaultArgument, EvolutionKind, ShuffleMembers};
    use evolve_syntax::{NodeKind, SyntaxPath};
    use evolve_test_utils::{file, function, param, structure, typed_var};
    use pretty_assertions::assert_eq;

    fn source() -> SourceFile {
        SourceFile::new(
            "s.swift",
            file(vec![
                structure("S")
                    .member(typed_var("a", "Int"))
                    .member(typed_var("b", "String"))
                    .build(),
                function("f", vec![param("x", "Int")]),
            ]),
        )
    }

    fn entry(path: Vec<usize>, evolution: impl Into<evolve_catalog::Evolution>) -> PlannedEvolution {
        PlannedEvolution::new("s.swift", SyntaxPath::from(path), None, evolution.into())
    }

    #[test]
    fn applies_entries_in_order() {
        let plan: Plan = [
            entry(vec![0, 1], ShuffleMembers::new(vec![1, 0])),
            entry(vec![1], ChangeDefaultArgument::new(0, "0")),
        ]
        .into_iter()
        .collect();

        let evolved = Evolver::new().apply(&source(), &plan).unwrap();
        let block = evolved.root.node_at(&SyntaxPath::from(vec![0, 1])).unwrap();
        let names: Vec<_> = block
            .children()
            .iter()
            .map(|m| m.bindings().next().and_then(SyntaxNode::name).unwrap_or_default().to_string())
            .collect();
        assert_eq!(names, vec!["b", "a"]);

        let function = evolved.root.node_at(&SyntaxPath::from(vec![1])).unwrap();
        let parameter = function.parameters().next().unwrap();
        assert_eq!(parameter.default_value().and_then(SyntaxNode::text), Some("0"));
    }

    #[test]
    fn entries_for_other_files_are_ignored() {
        let plan: Plan = [PlannedEvolution::new(
            "other.swift",
            SyntaxPath::from(vec![7]),
            None,
            ShuffleMembers::new(vec![0]).into(),
        )]
        .into_iter()
        .collect();
        let evolved = Evolver::new().apply(&source(), &plan).unwrap();
        assert_eq!(evolved, source());
    }

    #[test]
    fn missing_path_fails() {
        let plan: Plan = [entry(vec![5], ChangeDefaultArgument::new(0, "0"))].into_iter().collect();
        let err = Evolver::new().apply(&source(), &plan).unwrap_err();
        assert_eq!(
            err,
            ReplayError::PathNotFound {
                location: "s.swift@5".into()
            }
        );
    }

    #[test]
    fn wrong_node_kind_is_not_accepted() {
        let plan: Plan = [entry(vec![1], ShuffleMembers::new(vec![0]))].into_iter().collect();
        let err = Evolver::new().apply(&source(), &plan).unwrap_err();
        assert_eq!(
            err,
            ReplayError::NotAccepted {
                location: "s.swift@1".into(),
                kind: EvolutionKind::ShuffleMembers,
            }
        );
        assert_eq!(source().root.child(1).map(SyntaxNode::kind), Some(NodeKind::FunctionDecl));
    }
}
