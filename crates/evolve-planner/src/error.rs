//! Error types for the planner
//!
//! Covers:
//! - Rules loading and validation
//! - Per-file planning failures (I/O, decoding, resolution)
//! - Plan replay failures

use std::path::PathBuf;

use evolve_catalog::{EvolutionError, EvolutionKind, UnknownKind};
use evolve_syntax::NodeKind;

/// Malformed rules input; always reported before planning starts
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    /// Rules file could not be read
    #[error("cannot read rules {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON rules with the wrong shape
    #[error("invalid JSON rules: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML rules with the wrong shape
    #[error("invalid YAML rules: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Key that names no evolution kind
    #[error(transparent)]
    UnknownKind(#[from] UnknownKind),

    /// Kind listed more than once
    #[error("evolution kind {0} is listed more than once")]
    DuplicateKind(EvolutionKind),

    /// Rules file extension selects no format
    #[error("unsupported rules format: {0}")]
    UnsupportedFormat(PathBuf),
}

/// Failure planning one file; other files are unaffected
#[derive(Debug, thiserror::Error)]
pub enum PlanningError {
    /// Source file could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source file is not a serialized tree
    #[error("cannot decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Tree root is not a source file
    #[error("{file}: root is {kind:?}, expected SourceFile")]
    InvalidRoot { file: String, kind: NodeKind },

    /// Testing or resolving an evolution failed
    #[error("{file}: {source}")]
    Evolution {
        file: String,
        #[source]
        source: EvolutionError,
    },
}

impl PlanningError {
    /// File the failure belongs to
    #[must_use]
    pub fn file(&self) -> String {
        match self {
            Self::Io { path, .. } | Self::Decode { path, .. } => path.display().to_string(),
            Self::InvalidRoot { file, .. } | Self::Evolution { file, .. } => file.clone(),
        }
    }
}

/// Failure replaying a saved plan
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    /// Entry path does not resolve in the tree
    #[error("{location}: no node at the planned path")]
    PathNotFound { location: String },

    /// Node at the entry path is not one the evolution applies to
    #[error("{location}: {kind} does not apply to the node at the planned path")]
    NotAccepted { location: String, kind: EvolutionKind },
}
