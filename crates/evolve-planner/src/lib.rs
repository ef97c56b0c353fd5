//! Evolve Planner
//!
//! Chooses, for every declaration scope of a parsed source file, at most one
//! evolution from the catalog, and records the choices as a replayable plan.
//!
//! # Core Concepts
//!
//! - [`Planner`]: Depth-first traversal that gathers candidates per scope
//! - [`Plan`]: Ordered, serializable list of [`PlannedEvolution`]s
//! - [`EvolutionRules`]: Per-kind exclusions keyed by qualified name
//! - [`Evolver`]: Applies a saved plan to the files it was made for
//!
//! Planning is deterministic: the same tree, seed and rules always produce
//! the same plan. Files planned together get independent random streams
//! derived from the master seed and the file path.
//!
//! # Example
//!
//! ```rust
//! use evolve_planner::{Evolver, Planner, PlannerConfig, SourceFile};
//! use evolve_syntax::{make, NodeKind, SyntaxNode};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let function = SyntaxNode::new(
//!     NodeKind::FunctionDecl,
//!     vec![
//!         make::name("f"),
//!         make::parameter_clause(vec![make::parameter("x", make::simple_type("Int"), None)]),
//!         make::code_block(vec![]),
//!     ],
//! );
//! let source = SourceFile::new("f.swift", SyntaxNode::new(NodeKind::SourceFile, vec![function]));
//!
//! let planner = Planner::new(PlannerConfig::new().with_seed(7));
//! let plan = planner.plan_file(&source, &mut StdRng::seed_from_u64(7)).unwrap();
//! assert_eq!(plan.len(), 1);
//!
//! let evolved = Evolver::new().apply(&source, &plan).unwrap();
//! assert_ne!(evolved, source);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod candidates;
mod config;
mod error;
mod evolver;
mod plan;
mod planner;
mod rules;
mod source;

pub use candidates::{Candidate, CandidateStack, FrameId};
pub use config::PlannerConfig;
pub use error::{PlanningError, ReplayError, RulesError};
pub use evolver::Evolver;
pub use plan::{location_label, Plan, PlannedEvolution};
pub use planner::{file_seed, Planner};
pub use rules::{EvolutionRules, Exclusion};
pub use source::SourceFile;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
