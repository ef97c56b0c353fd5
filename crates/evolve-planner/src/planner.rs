//! Planner
//!
//! Walks one file's tree depth first. Entering a declaration opens a scope
//! (a context entry and a candidate frame); every visited node is tested
//! against every catalog kind and viable evolutions go to the innermost
//! open frame. Leaving a declaration closes its frame, draws one candidate
//! at random and appends it to the plan after its prerequisite chain.
//!
//! The random stream is passed explicitly to every call that may draw from
//! it. Draws happen in traversal order only, so a (tree, seed, rules)
//! triple always yields the same plan.

use evolve_catalog::{Evolution, EvolutionError, EvolutionKind};
use evolve_decl::{Decl, DeclContext};
use evolve_syntax::{ContentHash, NodeKind, SyntaxNode, SyntaxPath};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::candidates::{Candidate, CandidateStack};
use crate::config::PlannerConfig;
use crate::error::PlanningError;
use crate::plan::{Plan, PlannedEvolution};
use crate::rules::EvolutionRules;
use crate::source::SourceFile;

/// Seed of a file's independent random stream
#[must_use]
pub fn file_seed(master_seed: u64, path: &str) -> u64 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&master_seed.to_le_bytes());
    hasher.update(path.as_bytes());
    ContentHash::new(*hasher.finalize().as_bytes()).prefix_u64()
}

/// Evolution planner
#[derive(Debug, Clone, Default)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    #[must_use]
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan one file with the given random stream
    ///
    /// # Errors
    ///
    /// [`PlanningError::InvalidRoot`] if the tree is not a source file, and
    /// [`PlanningError::Evolution`] if testing an evolution fails for a
    /// reason other than a shape mismatch. No partial plan is returned.
    pub fn plan_file<R: Rng + ?Sized>(
        &self,
        source: &SourceFile,
        rng: &mut R,
    ) -> Result<Plan, PlanningError> {
        if source.root.kind() != NodeKind::SourceFile {
            return Err(PlanningError::InvalidRoot {
                file: source.path.clone(),
                kind: source.root.kind(),
            });
        }

        let mut traversal = Traversal::new(&source.path, &self.config);
        traversal
            .visit(&source.root, &SyntaxPath::root(), rng)
            .map_err(|err| PlanningError::Evolution {
                file: source.path.clone(),
                source: err,
            })?;
        debug_assert!(traversal.candidates.is_empty() && traversal.ctx.is_empty());

        let plan = traversal.plan;
        tracing::info!(file = %source.path, evolutions = plan.len(), "planned file");
        Ok(plan)
    }

    /// Plan several files in parallel
    ///
    /// Each file gets its own stream seeded from the master seed and its
    /// path, so results do not depend on scheduling. Results are in input
    /// order; a failed file does not affect the others.
    #[must_use]
    pub fn plan_files(&self, sources: &[SourceFile]) -> Vec<Result<Plan, PlanningError>> {
        sources
            .par_iter()
            .map(|source| {
                let mut rng = StdRng::seed_from_u64(file_seed(self.config.seed, &source.path));
                let result = self.plan_file(source, &mut rng);
                if let Err(err) = &result {
                    tracing::warn!(file = %source.path, error = %err, "planning aborted");
                }
                result
            })
            .collect()
    }
}

/// State of one file's traversal
struct Traversal<'a, 'c> {
    file: &'a str,
    rules: &'c EvolutionRules,
    ctx: DeclContext<'a>,
    candidates: CandidateStack<'a>,
    plan: Plan,
}

impl<'a, 'c> Traversal<'a, 'c> {
    fn new(file: &'a str, config: &'c PlannerConfig) -> Self {
        Self {
            file,
            rules: &config.rules,
            ctx: DeclContext::new().with_max_alias_depth(config.max_alias_depth),
            candidates: CandidateStack::new(),
            plan: Plan::new(),
        }
    }

    fn visit<R: Rng + ?Sized>(
        &mut self,
        node: &'a SyntaxNode,
        path: &SyntaxPath,
        rng: &mut R,
    ) -> Result<(), EvolutionError> {
        let frame = Decl::from_syntax(node).map(|decl| {
            self.ctx.push(decl);
            self.candidates.push()
        });

        self.collect(node, path, rng)?;
        for (index, child) in node.children().iter().enumerate() {
            self.visit(child, &path.child(index), rng)?;
        }

        if let Some(frame) = frame {
            let mut candidates = self.candidates.pop(frame);
            if !candidates.is_empty() {
                let count = candidates.len();
                let chosen = candidates.swap_remove(rng.random_range(0..count));
                tracing::debug!(
                    scope = %self.ctx.qualified_name(),
                    depth = self.ctx.depth(),
                    candidates = count,
                    kind = %chosen.evolution.kind(),
                    path = %chosen.path,
                    "selected evolution"
                );
                self.resolve(chosen.evolution, chosen.node, &chosen.path, rng)?;
            }
            self.ctx.pop();
        }
        Ok(())
    }

    /// Test every permitted kind against `node`
    fn collect<R: Rng + ?Sized>(
        &mut self,
        node: &'a SyntaxNode,
        path: &SyntaxPath,
        rng: &mut R,
    ) -> Result<(), EvolutionError> {
        let scope = if self.rules.is_empty() {
            String::new()
        } else {
            self.ctx.qualified_name()
        };

        for kind in EvolutionKind::ALL {
            if !self.rules.permit_with_prerequisites(kind, &scope) {
                continue;
            }
            match kind.test(node, &self.ctx, rng) {
                Ok(Some(evolution)) => {
                    tracing::trace!(%kind, %path, "candidate");
                    let accepted = self
                        .candidates
                        .append(Candidate {
                            evolution,
                            node,
                            path: path.clone(),
                        })
                        .is_ok();
                    debug_assert!(accepted, "candidate outside any declaration scope");
                }
                Ok(None) | Err(EvolutionError::Unsupported) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Append `evolution` after its prerequisite chain, depth first
    fn resolve<R: Rng + ?Sized>(
        &mut self,
        evolution: Evolution,
        node: &'a SyntaxNode,
        path: &SyntaxPath,
        rng: &mut R,
    ) -> Result<(), EvolutionError> {
        for prerequisite in evolution.prerequisites(node, &self.ctx, rng)? {
            self.resolve(prerequisite, node, path, rng)?;
        }
        self.plan.push(PlannedEvolution::new(
            self.file,
            path.clone(),
            node.position(),
            evolution,
        ));
        Ok(())
    }
}
