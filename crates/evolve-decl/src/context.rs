//! Declaration contexts
//!
//! A [`DeclContext`] is the chain of declarations enclosing a point of the
//! tree, outermost first. The planner pushes a declaration when the
//! traversal enters it and pops it on exit, so the context always mirrors
//! the traversal position.

use crate::decl::{Decl, ROOT_LABEL};

/// Default bound on alias chains followed during type resolution
pub const DEFAULT_MAX_ALIAS_DEPTH: usize = 32;

/// Chain of enclosing declarations, outermost first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclContext<'a> {
    chain: Vec<Decl<'a>>,
    max_alias_depth: usize,
}

impl Default for DeclContext<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> DeclContext<'a> {
    /// Empty context (the file itself)
    #[must_use]
    pub fn new() -> Self {
        Self {
            chain: Vec::new(),
            max_alias_depth: DEFAULT_MAX_ALIAS_DEPTH,
        }
    }

    /// Same context with a different alias depth bound
    #[must_use]
    pub fn with_max_alias_depth(mut self, max_alias_depth: usize) -> Self {
        self.max_alias_depth = max_alias_depth;
        self
    }

    /// Alias depth bound
    #[inline]
    #[must_use]
    pub fn max_alias_depth(&self) -> usize {
        self.max_alias_depth
    }

    /// Enter a declaration
    pub fn push(&mut self, decl: Decl<'a>) {
        self.chain.push(decl);
    }

    /// Leave the innermost declaration
    pub fn pop(&mut self) -> Option<Decl<'a>> {
        self.chain.pop()
    }

    /// Same context extended by `decl`
    #[must_use]
    pub fn extended(&self, decl: Decl<'a>) -> Self {
        let mut next = self.clone();
        next.push(decl);
        next
    }

    /// Number of enclosing declarations
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.chain.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Innermost declaration
    #[inline]
    #[must_use]
    pub fn innermost(&self) -> Option<Decl<'a>> {
        self.chain.last().copied()
    }

    /// Declaration enclosing the innermost one
    #[must_use]
    pub fn enclosing(&self) -> Option<Decl<'a>> {
        self.chain.len().checked_sub(2).map(|i| self.chain[i])
    }

    /// Look `name` up among the innermost declaration's direct members
    ///
    /// Returns the context extended by the first match in member order.
    #[must_use]
    pub fn lookup_direct(&self, name: &str) -> Option<Self> {
        let found = self.innermost()?.lookup_direct(name).into_iter().next()?;
        Some(self.extended(found))
    }

    /// Look `name` up in each enclosing scope, innermost first
    ///
    /// The first scope with a direct member named `name` wins; the result is
    /// that scope's context extended by the member.
    #[must_use]
    pub fn lookup_unqualified(&self, name: &str) -> Option<Self> {
        (0..self.chain.len()).rev().find_map(|scope| {
            let found = self.chain[scope].lookup_direct(name).into_iter().next()?;
            let mut chain = self.chain[..=scope].to_vec();
            chain.push(found);
            Some(Self {
                chain,
                max_alias_depth: self.max_alias_depth,
            })
        })
    }

    /// Whether the innermost declaration is resilient
    ///
    /// The empty context is the file itself, which is always resilient.
    #[must_use]
    pub fn is_resilient(&self) -> bool {
        self.innermost().map_or(true, |decl| decl.is_resilient())
    }

    /// Storage classification of the innermost declaration
    #[must_use]
    pub fn is_stored(&self) -> Option<bool> {
        self.innermost().and_then(|decl| decl.is_stored())
    }

    /// Dot-joined names from the root, e.g. `(file).Outer.method`
    #[must_use]
    pub fn qualified_name(&self) -> String {
        if self.chain.is_empty() {
            return ROOT_LABEL.to_string();
        }
        self.chain
            .iter()
            .map(Decl::name)
            .collect::<Vec<_>>()
            .join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evolve_test_utils::{file, function, structure, ty, typealias, typed_var};
    use pretty_assertions::assert_eq;

    fn nested() -> evolve_syntax::SyntaxNode {
        file(vec![
            typealias("Shared", ty("Int")),
            structure("Outer")
                .member(typed_var("x", "Int"))
                .member(structure("Inner").member(function("method", vec![])).build())
                .build(),
        ])
    }

    fn enter<'a>(ctx: &DeclContext<'a>, name: &str) -> DeclContext<'a> {
        ctx.lookup_direct(name).expect("member exists")
    }

    #[test]
    fn push_pop_mirror_traversal() {
        let tree = nested();
        let mut ctx = DeclContext::new();
        assert!(ctx.is_empty());
        assert!(ctx.is_resilient());

        ctx.push(Decl::from_syntax(&tree).unwrap());
        let inner = enter(&enter(&ctx, "Outer"), "Inner");
        assert_eq!(inner.depth(), 3);
        assert_eq!(inner.enclosing().map(|d| d.name()), Some("Outer".to_string()));

        let mut popped = inner.clone();
        assert_eq!(popped.pop().map(|d| d.name()), Some("Inner".to_string()));
        assert_eq!(popped.innermost().map(|d| d.name()), Some("Outer".to_string()));
    }

    #[test]
    fn qualified_names_include_root() {
        let tree = nested();
        let mut ctx = DeclContext::new();
        assert_eq!(ctx.qualified_name(), "(file)");

        ctx.push(Decl::from_syntax(&tree).unwrap());
        let method = enter(&enter(&enter(&ctx, "Outer"), "Inner"), "method");
        assert_eq!(method.qualified_name(), "(file).Outer.Inner.method");
    }

    #[test]
    fn unqualified_lookup_walks_outward() {
        let tree = nested();
        let mut ctx = DeclContext::new();
        ctx.push(Decl::from_syntax(&tree).unwrap());
        let inner = enter(&enter(&ctx, "Outer"), "Inner");

        let shared = inner.lookup_unqualified("Shared").unwrap();
        assert_eq!(shared.qualified_name(), "(file).Shared");

        let x = inner.lookup_unqualified("x").unwrap();
        assert_eq!(x.qualified_name(), "(file).Outer.x");
        assert_eq!(x.is_stored(), Some(true));

        assert!(inner.lookup_unqualified("missing").is_none());
        assert!(DeclContext::new().lookup_unqualified("Shared").is_none());
    }

    #[test]
    fn direct_lookup_does_not_walk_outward() {
        let tree = nested();
        let mut ctx = DeclContext::new();
        ctx.push(Decl::from_syntax(&tree).unwrap());
        let outer = enter(&ctx, "Outer");

        assert!(outer.lookup_direct("Shared").is_none());
        assert!(outer.lookup_direct("x").is_some());
    }

    #[test]
    fn alias_bound_is_carried_through_lookup() {
        let tree = nested();
        let mut ctx = DeclContext::new().with_max_alias_depth(4);
        ctx.push(Decl::from_syntax(&tree).unwrap());

        assert_eq!(enter(&ctx, "Outer").max_alias_depth(), 4);
        assert_eq!(ctx.lookup_unqualified("Shared").unwrap().max_alias_depth(), 4);
    }
}
