//! Member reordering
//!
//! Permutes the members of a member block. In a resilient declaration any
//! member may move; in a frozen one the members that pin the layout (stored
//! properties, type-level ones included, and enum cases) keep their relative
//! order and are placed after every movable member.

use evolve_decl::{Decl, DeclContext};
use evolve_syntax::{NodeKind, SyntaxNode};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::EvolutionError;
use crate::evolution::{Evolution, Transformation};
use crate::kind::EvolutionKind;
use crate::memberwise_initializer::SynthesizeMemberwiseInitializer;

/// Minimum number of movable members for a shuffle to exist
pub const MIN_ELIGIBLE_MEMBERS: usize = 2;

/// New member order, as indices into the original member list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShuffleMembers {
    pub mapping: Vec<usize>,
}

impl ShuffleMembers {
    #[must_use]
    pub fn new(mapping: Vec<usize>) -> Self {
        Self { mapping }
    }
}

/// Whether a member's position is part of the enclosing layout
fn pins_layout(member: &SyntaxNode) -> bool {
    member.kind() == NodeKind::EnumCaseDecl
        || Decl::from_syntax(member).is_some_and(|decl| decl.is_stored() == Some(true))
}

/// Struct that relies on an implicit memberwise initializer
fn implicit_memberwise_owner(ctx: &DeclContext<'_>) -> bool {
    matches!(ctx.innermost(), Some(Decl::Struct(strukt)) if !strukt.has_explicit_initializer())
}

impl Transformation for ShuffleMembers {
    const KIND: EvolutionKind = EvolutionKind::ShuffleMembers;

    fn test<'a, R: Rng + ?Sized>(
        node: &'a SyntaxNode,
        ctx: &DeclContext<'a>,
        rng: &mut R,
    ) -> Result<Option<Self>, EvolutionError> {
        if node.kind() != NodeKind::MemberBlock {
            return Err(EvolutionError::Unsupported);
        }

        // Reordering stored properties reorders an implicit memberwise
        // initializer, so one must be synthesizable first.
        if implicit_memberwise_owner(ctx) {
            match SynthesizeMemberwiseInitializer::test(node, ctx, rng) {
                Ok(Some(_)) => {}
                Ok(None) | Err(EvolutionError::Unsupported) => return Ok(None),
                Err(err) => return Err(err),
            }
        }

        let resilient = ctx.is_resilient();
        let (mut eligible, pinned): (Vec<usize>, Vec<usize>) = (0..node.children().len())
            .partition(|&i| resilient || !pins_layout(&node.children()[i]));

        if eligible.len() < MIN_ELIGIBLE_MEMBERS {
            trace!(eligible = eligible.len(), "too few movable members");
            return Ok(None);
        }

        eligible.shuffle(rng);
        eligible.extend(pinned);
        Ok(Some(Self::new(eligible)))
    }

    fn prerequisites<'a, R: Rng + ?Sized>(
        &self,
        node: &'a SyntaxNode,
        ctx: &DeclContext<'a>,
        rng: &mut R,
    ) -> Result<Vec<Evolution>, EvolutionError> {
        if !implicit_memberwise_owner(ctx) {
            return Ok(Vec::new());
        }
        match SynthesizeMemberwiseInitializer::test(node, ctx, rng) {
            Ok(found) => Ok(found.map(Evolution::from).into_iter().collect()),
            Err(EvolutionError::Unsupported) => Ok(Vec::new()),
            Err(err) => Err(err),
        }
    }

    fn accepts(&self, node: &SyntaxNode) -> bool {
        let len = node.children().len();
        let mut seen = vec![false; len];
        node.kind() == NodeKind::MemberBlock
            && self
                .mapping
                .iter()
                .all(|&i| i < len && !std::mem::replace(&mut seen[i], true))
    }

    /// Members in mapping order, then any members the mapping does not
    /// mention in their original order
    fn apply(&self, node: &SyntaxNode) -> SyntaxNode {
        assert!(self.accepts(node), "member mapping does not fit {:?} node", node.kind());

        let members = node.children();
        let mut placed = vec![false; members.len()];
        let mut reordered = Vec::with_capacity(members.len());
        for &i in &self.mapping {
            placed[i] = true;
            reordered.push(members[i].clone());
        }
        reordered.extend(
            members
                .iter()
                .enumerate()
                .filter(|(i, _)| !placed[*i])
                .map(|(_, member)| member.clone()),
        );
        node.with_children(reordered)
    }
}
