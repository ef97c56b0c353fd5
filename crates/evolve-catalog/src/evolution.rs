//! Evolution trait and payloads
//!
//! Provides the [`Transformation`] trait implemented by every catalog entry
//! and [`Evolution`], the serializable sum of their payloads.

use evolve_decl::DeclContext;
use evolve_syntax::SyntaxNode;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::change_default_argument::ChangeDefaultArgument;
use crate::error::EvolutionError;
use crate::kind::EvolutionKind;
use crate::memberwise_initializer::SynthesizeMemberwiseInitializer;
use crate::shuffle_members::ShuffleMembers;

/// A source transformation that preserves binary compatibility
///
/// # Contract
/// - `test` returns `Err(EvolutionError::Unsupported)` when the node's
///   shape is one this kind never applies to, `Ok(None)` when the shape
///   matches but no legal instance exists, and `Ok(Some(_))` for a viable
///   candidate. It may consume `rng`, always in the same order for the
///   same input.
/// - `apply` is pure and only defined for nodes `accepts` returns true for.
///   Calling it on anything else is a programming error and panics.
pub trait Transformation: Sized + Into<Evolution> {
    /// Catalog key
    const KIND: EvolutionKind;

    /// Test whether this kind applies to `node` in `ctx`
    ///
    /// # Errors
    ///
    /// [`EvolutionError::Unsupported`] on a hard mismatch; any other error
    /// aborts planning.
    fn test<'a, R: Rng + ?Sized>(
        node: &'a SyntaxNode,
        ctx: &DeclContext<'a>,
        rng: &mut R,
    ) -> Result<Option<Self>, EvolutionError>;

    /// Evolutions that must be applied to the same node first
    ///
    /// # Errors
    ///
    /// Propagates errors from testing the prerequisites.
    fn prerequisites<'a, R: Rng + ?Sized>(
        &self,
        _node: &'a SyntaxNode,
        _ctx: &DeclContext<'a>,
        _rng: &mut R,
    ) -> Result<Vec<Evolution>, EvolutionError> {
        Ok(Vec::new())
    }

    /// Whether `apply` is defined for `node`
    fn accepts(&self, node: &SyntaxNode) -> bool;

    /// Transformed node
    ///
    /// # Panics
    ///
    /// If `accepts(node)` is false.
    fn apply(&self, node: &SyntaxNode) -> SyntaxNode;
}

/// A planned transformation with its payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Evolution {
    ShuffleMembers(ShuffleMembers),
    SynthesizeMemberwiseInitializer(SynthesizeMemberwiseInitializer),
    ChangeDefaultArgument(ChangeDefaultArgument),
}

macro_rules! dispatch {
    ($evolution:expr, $payload:ident => $body:expr) => {
        match $evolution {
            Evolution::ShuffleMembers($payload) => $body,
            Evolution::SynthesizeMemberwiseInitializer($payload) => $body,
            Evolution::ChangeDefaultArgument($payload) => $body,
        }
    };
}

impl Evolution {
    /// Catalog key of this evolution
    #[must_use]
    pub fn kind(&self) -> EvolutionKind {
        match self {
            Self::ShuffleMembers(_) => ShuffleMembers::KIND,
            Self::SynthesizeMemberwiseInitializer(_) => SynthesizeMemberwiseInitializer::KIND,
            Self::ChangeDefaultArgument(_) => ChangeDefaultArgument::KIND,
        }
    }

    /// Direct prerequisites, to be applied to the same node first
    ///
    /// # Errors
    ///
    /// Propagates errors from testing the prerequisites.
    pub fn prerequisites<'a, R: Rng + ?Sized>(
        &self,
        node: &'a SyntaxNode,
        ctx: &DeclContext<'a>,
        rng: &mut R,
    ) -> Result<Vec<Evolution>, EvolutionError> {
        dispatch!(self, e => e.prerequisites(node, ctx, rng))
    }

    /// Whether [`Self::apply`] is defined for `node`
    #[must_use]
    pub fn accepts(&self, node: &SyntaxNode) -> bool {
        dispatch!(self, e => e.accepts(node))
    }

    /// Transformed node
    ///
    /// # Panics
    ///
    /// If [`Self::accepts`] is false for `node`.
    #[must_use]
    pub fn apply(&self, node: &SyntaxNode) -> SyntaxNode {
        dispatch!(self, e => e.apply(node))
    }
}

impl From<ShuffleMembers> for Evolution {
    fn from(payload: ShuffleMembers) -> Self {
        Self::ShuffleMembers(payload)
    }
}

impl From<SynthesizeMemberwiseInitializer> for Evolution {
    fn from(payload: SynthesizeMemberwiseInitializer) -> Self {
        Self::SynthesizeMemberwiseInitializer(payload)
    }
}

impl From<ChangeDefaultArgument> for Evolution {
    fn from(payload: ChangeDefaultArgument) -> Self {
        Self::ChangeDefaultArgument(payload)
    }
}
