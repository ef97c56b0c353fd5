//! Planner configuration

use evolve_decl::DEFAULT_MAX_ALIAS_DEPTH;

use crate::rules::EvolutionRules;

/// Planner configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Master seed; per-file streams are derived from it
    pub seed: u64,
    /// Bound on alias chains followed during type resolution
    pub max_alias_depth: usize,
    /// Per-kind exclusions
    pub rules: EvolutionRules,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_alias_depth: DEFAULT_MAX_ALIAS_DEPTH,
            rules: EvolutionRules::default(),
        }
    }
}

impl PlannerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With master seed
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// With alias depth bound
    #[inline]
    #[must_use]
    pub fn with_max_alias_depth(mut self, depth: usize) -> Self {
        self.max_alias_depth = depth;
        self
    }

    /// With rules
    #[inline]
    #[must_use]
    pub fn with_rules(mut self, rules: EvolutionRules) -> Self {
        self.rules = rules;
        self
    }
}
