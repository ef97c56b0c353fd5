//! Plans
//!
//! A [`Plan`] is the ordered list of evolutions chosen for one or more
//! files. Order is application order: prerequisites precede the evolutions
//! that need them, and serialization preserves it exactly.

use evolve_catalog::Evolution;
use evolve_syntax::{ContentHash, HashError, Position, SyntaxPath};
use serde::{Deserialize, Serialize};

/// One planned evolution and its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedEvolution {
    location: String,
    file: String,
    path: SyntaxPath,
    evolution: Evolution,
}

impl PlannedEvolution {
    /// Create an entry, labelling it from the node position when known
    #[must_use]
    pub fn new(
        file: impl Into<String>,
        path: SyntaxPath,
        position: Option<Position>,
        evolution: Evolution,
    ) -> Self {
        let file = file.into();
        Self {
            location: location_label(&file, &path, position),
            file,
            path,
            evolution,
        }
    }

    /// Human-readable location
    #[inline]
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Source file reference
    #[inline]
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Structural path of the target node
    #[inline]
    #[must_use]
    pub fn path(&self) -> &SyntaxPath {
        &self.path
    }

    /// Planned evolution
    #[inline]
    #[must_use]
    pub fn evolution(&self) -> &Evolution {
        &self.evolution
    }
}

/// `file:line:column` when the position is known, `file@path` otherwise
#[must_use]
pub fn location_label(file: &str, path: &SyntaxPath, position: Option<Position>) -> String {
    match position {
        Some(Position { line, column }) => format!("{file}:{line}:{column}"),
        None => format!("{file}@{path}"),
    }
}

/// Ordered evolutions in application order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Plan(Vec<PlannedEvolution>);

impl Plan {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn push(&mut self, entry: PlannedEvolution) {
        self.0.push(entry);
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in application order
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[PlannedEvolution] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlannedEvolution> {
        self.0.iter()
    }

    /// Entries for one file, in application order
    pub fn entries_for<'p>(&'p self, file: &'p str) -> impl Iterator<Item = &'p PlannedEvolution> + 'p {
        self.0.iter().filter(move |entry| entry.file == file)
    }

    /// Pretty-printed JSON array
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a plan saved with [`Self::to_json`]
    ///
    /// # Errors
    ///
    /// Fails on input that is not a serialized plan.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// Digest of the serialized plan
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn digest(&self) -> Result<ContentHash, HashError> {
        ContentHash::compute_serializable(self)
    }
}

impl FromIterator<PlannedEvolution> for Plan {
    fn from_iter<I: IntoIterator<Item = PlannedEvolution>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<PlannedEvolution> for Plan {
    fn extend<I: IntoIterator<Item = PlannedEvolution>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Plan {
    type Item = PlannedEvolution;
    type IntoIter = std::vec::IntoIter<PlannedEvolution>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'p> IntoIterator for &'p Plan {
    type Item = &'p PlannedEvolution;
    type IntoIter = std::slice::Iter<'p, PlannedEvolution>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
