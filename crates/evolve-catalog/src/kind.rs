//! Catalog of evolution kinds
//!
//! [`EvolutionKind`] enumerates the catalog in a fixed order. The order is
//! part of the determinism contract: the planner tests kinds in this order,
//! so candidates and random draws happen in this order too.

use std::fmt;
use std::str::FromStr;

use evolve_decl::DeclContext;
use evolve_syntax::SyntaxNode;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::change_default_argument::ChangeDefaultArgument;
use crate::error::EvolutionError;
use crate::evolution::{Evolution, Transformation};
use crate::memberwise_initializer::SynthesizeMemberwiseInitializer;
use crate::shuffle_members::ShuffleMembers;

/// Evolution kind, the key for rules and the tag of serialized payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EvolutionKind {
    ShuffleMembers,
    SynthesizeMemberwiseInitializer,
    ChangeDefaultArgument,
}

impl EvolutionKind {
    /// Every kind, in catalog order
    pub const ALL: [Self; 3] = [
        Self::ShuffleMembers,
        Self::SynthesizeMemberwiseInitializer,
        Self::ChangeDefaultArgument,
    ];

    /// Kind name as written in rules files
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ShuffleMembers => "ShuffleMembers",
            Self::SynthesizeMemberwiseInitializer => "SynthesizeMemberwiseInitializer",
            Self::ChangeDefaultArgument => "ChangeDefaultArgument",
        }
    }

    /// Test this kind against `node` in `ctx`
    ///
    /// # Errors
    ///
    /// [`EvolutionError::Unsupported`] on a hard mismatch; any other error
    /// aborts planning of the file.
    pub fn test<'a, R: Rng + ?Sized>(
        self,
        node: &'a SyntaxNode,
        ctx: &DeclContext<'a>,
        rng: &mut R,
    ) -> Result<Option<Evolution>, EvolutionError> {
        match self {
            Self::ShuffleMembers => test_as::<ShuffleMembers, R>(node, ctx, rng),
            Self::SynthesizeMemberwiseInitializer => {
                test_as::<SynthesizeMemberwiseInitializer, R>(node, ctx, rng)
            }
            Self::ChangeDefaultArgument => test_as::<ChangeDefaultArgument, R>(node, ctx, rng),
        }
    }

    /// Kinds this kind may list as prerequisites
    #[must_use]
    pub const fn prerequisite_kinds(self) -> &'static [EvolutionKind] {
        match self {
            Self::ShuffleMembers => &[Self::SynthesizeMemberwiseInitializer],
            Self::SynthesizeMemberwiseInitializer | Self::ChangeDefaultArgument => &[],
        }
    }
}

fn test_as<'a, T: Transformation, R: Rng + ?Sized>(
    node: &'a SyntaxNode,
    ctx: &DeclContext<'a>,
    rng: &mut R,
) -> Result<Option<Evolution>, EvolutionError> {
    Ok(T::test(node, ctx, rng)?.map(Into::into))
}

impl fmt::Display for EvolutionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown evolution kind name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown evolution kind `{0}`")]
pub struct UnknownKind(pub String);

impl FromStr for EvolutionKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in EvolutionKind::ALL {
            assert_eq!(kind.name().parse::<EvolutionKind>(), Ok(kind));
            assert_eq!(
                serde_json::to_string(&kind).unwrap(),
                format!("\"{}\"", kind.name())
            );
        }
        assert_eq!(
            "Shuffle".parse::<EvolutionKind>(),
            Err(UnknownKind("Shuffle".to_string()))
        );
    }

    #[test]
    fn only_shuffle_has_prerequisites() {
        assert_eq!(
            EvolutionKind::ShuffleMembers.prerequisite_kinds(),
            &[EvolutionKind::SynthesizeMemberwiseInitializer]
        );
        assert!(EvolutionKind::ChangeDefaultArgument.prerequisite_kinds().is_empty());
    }
}
