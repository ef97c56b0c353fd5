//! Resolution errors

use thiserror::Error;

/// Type resolution failure
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// Alias chain longer than the configured bound, or cyclic
    #[error("alias chain through `{name}` exceeds depth {depth}")]
    AliasDepthExceeded { name: String, depth: usize },
}
