//! Evolve Decl
//!
//! Declaration model and name lookup over an immutable syntax tree.
//!
//! # Core Concepts
//!
//! - [`Decl`]: Closed sum type over the declaration shapes the planner tracks
//! - [`DeclContext`]: Chain of enclosing declarations, outermost first
//! - [`ResolvedType`]: Type syntax resolved to a declaration, or left as syntax
//!
//! Capabilities are separate traits ([`DeclName`], [`Resilience`],
//! [`StorageClass`], [`MemberLookup`], [`AccessControl`]) implemented once
//! per declaration variant.
//!
//! # Example
//!
//! ```rust
//! use evolve_decl::{Decl, DeclContext};
//! use evolve_syntax::{make, NodeKind, SyntaxNode};
//!
//! let strukt = SyntaxNode::new(
//!     NodeKind::StructDecl,
//!     vec![make::name("Point"), SyntaxNode::new(NodeKind::MemberBlock, vec![])],
//! );
//! let file = SyntaxNode::new(NodeKind::SourceFile, vec![strukt]);
//!
//! let mut ctx = DeclContext::new();
//! ctx.push(Decl::from_syntax(&file).unwrap());
//! let point = ctx.lookup_unqualified("Point").unwrap();
//!
//! assert_eq!(point.qualified_name(), "(file).Point");
//! assert!(point.is_resilient());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod context;
mod decl;
mod error;
mod resolve;

pub use context::{DeclContext, DEFAULT_MAX_ALIAS_DEPTH};
pub use decl::{
    AccessControl, AccessLevel, AssociatedTypeDecl, ClassDecl, Decl, DeclName, DeclSyntax,
    EnumDecl, ExtensionDecl, FileDecl, FunctionDecl, InitializerDecl, MemberLookup,
    ProtocolDecl, Resilience, StorageClass, StructDecl, SubscriptDecl, TypeAliasDecl,
    VariableDecl, FROZEN_ATTRIBUTES, OBSERVING_ACCESSORS, ROOT_LABEL,
};
pub use error::ResolveError;
pub use resolve::ResolvedType;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
