//! Evolve Syntax
//!
//! The immutable tree model the evolution planner consumes.
//!
//! # Core Concepts
//!
//! - [`SyntaxNode`]: Immutable, ordered node produced by an external parser
//! - [`NodeKind`]: Closed set of node shapes with fixed child layouts
//! - [`SyntaxPath`]: Structural identity of a node (child indices from the root)
//! - [`TypeShape`]: Exact structural classification of type syntax
//! - [`ContentHash`]: Blake3 digest for trees and plans
//!
//! # Example
//!
//! ```rust
//! use evolve_syntax::{make, NodeKind, SyntaxNode, SyntaxPath};
//!
//! let file = SyntaxNode::new(NodeKind::SourceFile, vec![make::statement("print(1)")]);
//! let path = SyntaxPath::root().child(0);
//!
//! assert_eq!(file.node_at(&path).and_then(SyntaxNode::text), Some("print(1)"));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod hash;
pub mod make;
mod node;
mod path;
mod shape;

pub use hash::{ContentHash, HashError};
pub use node::{NodeKind, Position, SyntaxNode};
pub use path::{PathError, SyntaxPath};
pub use shape::{literal_type, spelling, TypeShape, STANDARD_MODULE};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
