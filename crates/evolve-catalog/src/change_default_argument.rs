//! Default argument rewriting
//!
//! Changes the expression producing one parameter's default value. Default
//! arguments are emitted into callers, so the old expression keeps working
//! for existing binaries while new builds see the new one.

use evolve_decl::{Decl, DeclContext};
use evolve_syntax::{make, NodeKind, SyntaxNode};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::default_value::{wrapped_default, DefaultValue};
use crate::error::EvolutionError;
use crate::evolution::Transformation;
use crate::kind::EvolutionKind;

/// New default expression for the parameter at `index`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeDefaultArgument {
    pub index: usize,
    pub value: String,
}

impl ChangeDefaultArgument {
    #[must_use]
    pub fn new(index: usize, value: impl Into<String>) -> Self {
        Self {
            index,
            value: value.into(),
        }
    }
}

/// Declaration the node's own declaration sits in
fn container_of<'a>(node: &SyntaxNode, ctx: &DeclContext<'a>) -> Option<Decl<'a>> {
    match ctx.innermost() {
        Some(innermost) if std::ptr::eq(innermost.syntax(), node) => ctx.enclosing(),
        other => other,
    }
}

impl Transformation for ChangeDefaultArgument {
    const KIND: EvolutionKind = EvolutionKind::ChangeDefaultArgument;

    fn test<'a, R: Rng + ?Sized>(
        node: &'a SyntaxNode,
        ctx: &DeclContext<'a>,
        rng: &mut R,
    ) -> Result<Option<Self>, EvolutionError> {
        if !node.kind().has_parameters() {
            return Err(EvolutionError::Unsupported);
        }
        // Protocol requirements cannot declare default arguments.
        if matches!(container_of(node, ctx), Some(Decl::Protocol(_))) {
            return Err(EvolutionError::Unsupported);
        }

        let mut eligible = Vec::new();
        for (index, parameter) in node.parameters().enumerate() {
            let value = match (parameter.default_value(), parameter.type_child()) {
                (Some(existing), _) => wrapped_default(existing.text().unwrap_or_default()),
                (None, Some(ty)) => DefaultValue::for_shape(ctx.type_shape(ty)?)
                    .map(|value| value.source().to_string()),
                (None, None) => None,
            };
            if let Some(value) = value {
                eligible.push(Self::new(index, value));
            }
        }

        if eligible.is_empty() {
            return Err(EvolutionError::Unsupported);
        }
        trace!(eligible = eligible.len(), "parameters with changeable defaults");
        let chosen = rng.random_range(0..eligible.len());
        Ok(Some(eligible.swap_remove(chosen)))
    }

    fn accepts(&self, node: &SyntaxNode) -> bool {
        self.rewrite(node).is_some()
    }

    /// Rewrites only the chosen parameter's default clause
    fn apply(&self, node: &SyntaxNode) -> SyntaxNode {
        self.rewrite(node).unwrap_or_else(|| {
            panic!("no parameter {} on {:?} node", self.index, node.kind())
        })
    }
}

impl ChangeDefaultArgument {
    fn rewrite(&self, node: &SyntaxNode) -> Option<SyntaxNode> {
        if !node.kind().has_parameters() {
            return None;
        }
        let clause_index = node
            .children()
            .iter()
            .position(|c| c.kind() == NodeKind::ParameterClause)?;
        let clause = &node.children()[clause_index];
        let (param_index, parameter) = clause
            .children()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.kind() == NodeKind::Parameter)
            .nth(self.index)?;

        let default = make::default_argument(make::expr(self.value.clone()));
        let rewritten = match parameter
            .children()
            .iter()
            .position(|c| c.kind() == NodeKind::DefaultArgument)
        {
            Some(existing) => parameter.replacing_child(existing, default)?,
            None => parameter.appending_children([default]),
        };

        let clause = clause.replacing_child(param_index, rewritten)?;
        node.replacing_child(clause_index, clause)
    }
}
