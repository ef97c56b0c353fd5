//! Planner input

use std::path::Path;

use evolve_syntax::SyntaxNode;
use serde::{Deserialize, Serialize};

use crate::error::PlanningError;

/// A parsed source file: its reference name and tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,
    pub root: SyntaxNode,
}

impl SourceFile {
    #[must_use]
    pub fn new(path: impl Into<String>, root: SyntaxNode) -> Self {
        Self {
            path: path.into(),
            root,
        }
    }

    /// Read a parser-emitted JSON document
    ///
    /// # Errors
    ///
    /// [`PlanningError::Io`] or [`PlanningError::Decode`].
    pub fn load(path: &Path) -> Result<Self, PlanningError> {
        let input = std::fs::read_to_string(path).map_err(|source| PlanningError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&input).map_err(|source| PlanningError::Decode {
            path: path.to_path_buf(),
            source,
        })
    }
}
