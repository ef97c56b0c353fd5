//! Evolution rules
//!
//! Per-kind exclusions keyed by qualified declaration name. The input shape
//! maps a kind name to `null`, `[]` or a list of qualified names:
//!
//! ```yaml
//! ShuffleMembers: ~                       # excluded everywhere
//! ChangeDefaultArgument: ["(file).Api.send"]
//! ```
//!
//! `null` and `[]` both exclude the kind everywhere. An absent kind is
//! unrestricted. A kind listed twice is an error.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use evolve_catalog::EvolutionKind;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::RulesError;

/// Exclusion entry for one kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exclusion {
    /// Excluded for every declaration
    All,
    /// Excluded exactly for these qualified names
    Names(BTreeSet<String>),
}

/// Mapping from evolution kind to its exclusion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvolutionRules {
    exclusions: BTreeMap<EvolutionKind, Exclusion>,
}

/// Raw input shape shared by JSON and YAML, entries in document order
///
/// Entries are kept as written so repeated keys reach validation instead of
/// overwriting each other.
struct RawRules(Vec<(String, Option<Vec<String>>)>);

impl<'de> Deserialize<'de> for RawRules {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawRules;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from evolution kind to null or a list of names")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawRules, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry()? {
                    entries.push(entry);
                }
                Ok(RawRules(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

impl EvolutionRules {
    /// Unrestricted rules
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude `kind` everywhere
    #[must_use]
    pub fn excluding_all(mut self, kind: EvolutionKind) -> Self {
        self.exclusions.insert(kind, Exclusion::All);
        self
    }

    /// Exclude `kind` for the given qualified names
    ///
    /// An empty name list excludes the kind everywhere.
    #[must_use]
    pub fn excluding<I, S>(mut self, kind: EvolutionKind, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        let exclusion = if names.is_empty() {
            Exclusion::All
        } else {
            Exclusion::Names(names)
        };
        self.exclusions.insert(kind, exclusion);
        self
    }

    /// True when nothing is excluded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exclusions.is_empty()
    }

    /// Exclusion for `kind`, if any
    #[must_use]
    pub fn exclusion(&self, kind: EvolutionKind) -> Option<&Exclusion> {
        self.exclusions.get(&kind)
    }

    /// Whether `kind` may be planned for `qualified_name`
    #[must_use]
    pub fn permit(&self, kind: EvolutionKind, qualified_name: &str) -> bool {
        match self.exclusions.get(&kind) {
            None => true,
            Some(Exclusion::All) => false,
            Some(Exclusion::Names(names)) => !names.contains(qualified_name),
        }
    }

    /// Whether `kind` and every kind it may require are permitted
    #[must_use]
    pub fn permit_with_prerequisites(&self, kind: EvolutionKind, qualified_name: &str) -> bool {
        self.permit(kind, qualified_name)
            && kind
                .prerequisite_kinds()
                .iter()
                .all(|&required| self.permit_with_prerequisites(required, qualified_name))
    }

    /// Parse JSON rules
    ///
    /// # Errors
    ///
    /// [`RulesError::Json`] on a malformed document, [`RulesError::UnknownKind`]
    /// on a key naming no kind, [`RulesError::DuplicateKind`] on a repeated key.
    pub fn from_json_str(input: &str) -> Result<Self, RulesError> {
        Self::from_raw(serde_json::from_str(input)?)
    }

    /// Parse YAML rules
    ///
    /// # Errors
    ///
    /// [`RulesError::Yaml`] on a malformed document, [`RulesError::UnknownKind`]
    /// on a key naming no kind, [`RulesError::DuplicateKind`] on a repeated key.
    pub fn from_yaml_str(input: &str) -> Result<Self, RulesError> {
        Self::from_raw(serde_yaml::from_str(input)?)
    }

    /// Load rules from a `.json`, `.yaml` or `.yml` file
    ///
    /// # Errors
    ///
    /// [`RulesError::Io`] if the file cannot be read,
    /// [`RulesError::UnsupportedFormat`] for other extensions, and the
    /// parse errors of the selected format.
    pub fn load(path: &Path) -> Result<Self, RulesError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> Result<Self, RulesError> = match extension.as_deref() {
            Some("json") => Self::from_json_str,
            Some("yaml" | "yml") => Self::from_yaml_str,
            _ => return Err(RulesError::UnsupportedFormat(path.to_path_buf())),
        };
        let input = std::fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let rules = parse(&input)?;
        tracing::debug!(path = %path.display(), kinds = rules.exclusions.len(), "loaded evolution rules");
        Ok(rules)
    }

    fn from_raw(raw: RawRules) -> Result<Self, RulesError> {
        raw.0
            .into_iter()
            .try_fold(Self::new(), |rules, (name, names)| -> Result<Self, RulesError> {
                let kind: EvolutionKind = name.parse()?;
                if rules.exclusions.contains_key(&kind) {
                    return Err(RulesError::DuplicateKind(kind));
                }
                Ok(rules.excluding(kind, names.unwrap_or_default()))
            })
    }
}
