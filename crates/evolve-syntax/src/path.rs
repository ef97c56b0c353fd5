//! Structural paths for addressing nodes within a tree
//!
//! Provides [`SyntaxPath`], the identity of a node: the child indices walked
//! from the root to reach it.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Path from the root of a syntax tree
///
/// Identity of a node within an immutable tree. Two nodes at the same path in
/// trees produced from the same source are the same node.
///
/// # Examples
/// - `[]` → the root itself (displayed as `.`)
/// - `[0, 3, 1]` → second child of the fourth child of the first child
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyntaxPath(SmallVec<[usize; 8]>);

impl SyntaxPath {
    /// Empty path (root)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(SmallVec::new())
    }

    /// Child indices from the root
    #[inline]
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Depth of the addressed node
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if path is empty (root)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over indices
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.0.iter()
    }

    /// Append a child index, returning new path
    #[inline]
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut new = self.clone();
        new.0.push(index);
        new
    }
}

impl Display for SyntaxPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str(".");
        }
        let mut first = true;
        for index in &self.0 {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{index}")?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for SyntaxPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == "." {
            return Ok(Self::root());
        }

        let indices = s
            .split('.')
            .map(|seg| {
                if seg.is_empty() {
                    Err(PathError::EmptySegment)
                } else {
                    seg.parse::<usize>()
                        .map_err(|_| PathError::InvalidSegment(seg.to_string()))
                }
            })
            .collect::<Result<_, _>>()?;

        Ok(Self(indices))
    }
}

impl From<Vec<usize>> for SyntaxPath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices.into())
    }
}

impl From<&[usize]> for SyntaxPath {
    fn from(indices: &[usize]) -> Self {
        Self(indices.into())
    }
}

/// Errors related to syntax paths
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// Empty segment in path
    #[error("path contains empty segment")]
    EmptySegment,

    /// Segment is not a child index
    #[error("invalid segment: {0} (must be a non-negative integer)")]
    InvalidSegment(String),
}
