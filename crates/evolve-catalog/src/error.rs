//! Evolution errors

use evolve_decl::ResolveError;
use thiserror::Error;

/// Failure testing or resolving an evolution
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EvolutionError {
    /// The node's shape is one this kind never applies to
    #[error("evolution does not apply to this node")]
    Unsupported,

    /// Type resolution failed
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

