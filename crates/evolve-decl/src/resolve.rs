//! Type resolution
//!
//! Resolves type syntax against a [`DeclContext`]. Names are looked up
//! unqualified from the context, member types through their resolved base,
//! and type aliases are followed into their targets, each target resolved
//! from the alias's own enclosing scope. Alias chains are bounded by the
//! context's `max_alias_depth`, which also breaks alias cycles.

use evolve_syntax::{NodeKind, SyntaxNode, TypeShape};
use tracing::trace;

use crate::context::DeclContext;
use crate::decl::Decl;
use crate::error::ResolveError;

/// Outcome of resolving type syntax
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedType<'a> {
    /// A declaration in the tree; the context ends at that declaration
    Declaration(DeclContext<'a>),
    /// No declaration found; the type stays as syntax, along with the
    /// context it must be interpreted in
    Syntax(&'a SyntaxNode, DeclContext<'a>),
}

impl<'a> ResolvedType<'a> {
    /// Resolved declaration, if any
    #[must_use]
    pub fn declaration(&self) -> Option<Decl<'a>> {
        match self {
            Self::Declaration(ctx) => ctx.innermost(),
            Self::Syntax(..) => None,
        }
    }
}

impl<'a> DeclContext<'a> {
    /// Resolve type syntax from this context
    ///
    /// # Errors
    ///
    /// [`ResolveError::AliasDepthExceeded`] if more than `max_alias_depth`
    /// aliases would have to be followed.
    pub fn resolve_type(&self, ty: &'a SyntaxNode) -> Result<ResolvedType<'a>, ResolveError> {
        self.resolve_at_depth(ty, 0)
    }

    /// Shape of type syntax after resolution
    ///
    /// Types resolving to a declaration in the tree are [`TypeShape::Named`]
    /// even when they shadow a standard library name.
    ///
    /// # Errors
    ///
    /// Propagates [`ResolveError`] from [`Self::resolve_type`].
    pub fn type_shape(&self, ty: &'a SyntaxNode) -> Result<TypeShape, ResolveError> {
        Ok(match self.resolve_type(ty)? {
            ResolvedType::Declaration(_) => TypeShape::Named,
            ResolvedType::Syntax(syntax, _) => TypeShape::of_syntax(syntax),
        })
    }

    fn resolve_at_depth(
        &self,
        ty: &'a SyntaxNode,
        depth: usize,
    ) -> Result<ResolvedType<'a>, ResolveError> {
        let found = match (ty.kind(), ty.text()) {
            (NodeKind::SimpleType, Some(name)) => self.lookup_unqualified(name),
            (NodeKind::MemberType, Some(member)) => match ty.child(0) {
                Some(base) => match self.resolve_at_depth(base, depth)? {
                    ResolvedType::Declaration(base_ctx) => base_ctx.lookup_direct(member),
                    ResolvedType::Syntax(..) => None,
                },
                None => None,
            },
            _ => None,
        };

        match found {
            Some(found) => self.follow_alias(found, depth),
            None => Ok(ResolvedType::Syntax(ty, self.clone())),
        }
    }

    fn follow_alias(
        &self,
        found: DeclContext<'a>,
        depth: usize,
    ) -> Result<ResolvedType<'a>, ResolveError> {
        let Some(Decl::TypeAlias(alias)) = found.innermost() else {
            return Ok(ResolvedType::Declaration(found));
        };
        let Some(target) = alias.target() else {
            return Ok(ResolvedType::Declaration(found));
        };
        if depth >= self.max_alias_depth() {
            return Err(ResolveError::AliasDepthExceeded {
                name: found.qualified_name(),
                depth,
            });
        }

        trace!(alias = %found.qualified_name(), depth, "following type alias");
        let mut scope = found;
        scope.pop();
        scope.resolve_at_depth(target, depth + 1)
    }
}
