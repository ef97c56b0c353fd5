//! Memberwise initializer synthesis
//!
//! A struct without an explicit initializer gets implicit memberwise
//! initializers whose parameter order follows the stored properties. This
//! evolution spells them out so that later reordering cannot change them.

use evolve_decl::{AccessLevel, Decl, DeclContext, DeclSyntax};
use evolve_syntax::{literal_type, make, NodeKind, SyntaxNode};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::EvolutionError;
use crate::evolution::Transformation;
use crate::kind::EvolutionKind;

/// One initializer parameter, bound to the stored property of the same name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializerParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: SyntaxNode,
}

impl InitializerParameter {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: SyntaxNode) -> Self {
        Self { name: name.into(), ty }
    }
}

/// Ordered parameter list of one initializer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InitializerSignature(Vec<InitializerParameter>);

impl InitializerSignature {
    #[must_use]
    pub fn new(parameters: Vec<InitializerParameter>) -> Self {
        Self(parameters)
    }

    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &[InitializerParameter] {
        &self.0
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

    fn to_syntax(&self, modifiers: &[&str]) -> SyntaxNode {
        let parameters = self
            .0
            .iter()
            .map(|p| make::parameter(p.name.clone(), p.ty.clone(), None))
            .collect();
        let body = self
            .0
            .iter()
            .map(|p| make::statement(format!("self.{0} = {0}", p.name)))
            .collect();
        make::initializer(modifiers, parameters, body)
    }
}

/// Initializers to append to a struct's member block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesizeMemberwiseInitializer {
    pub inits: Vec<InitializerSignature>,
}

impl SynthesizeMemberwiseInitializer {
    #[must_use]
    pub fn new(inits: Vec<InitializerSignature>) -> Self {
        Self { inits }
    }
}

/// Stored instance properties of a member block, one entry per binding
///
/// A `let` with an initial value is skipped: it is never assigned by an
/// initializer.
fn stored_bindings(block: &SyntaxNode) -> impl Iterator<Item = &SyntaxNode> {
    block
        .children()
        .iter()
        .filter_map(Decl::from_syntax)
        .filter(Decl::is_instance_storage)
        .filter_map(|decl| match decl {
            Decl::Variable(var) => Some(var),
            _ => None,
        })
        .flat_map(|var| {
            let constant = var.is_constant();
            var.syntax()
                .bindings()
                .filter(move |binding| !(constant && binding.initial_value().is_some()))
        })
}

/// Whether any stored property is hidden from the rest of the module
fn has_restricted_storage(block: &SyntaxNode) -> bool {
    block
        .children()
        .iter()
        .filter_map(Decl::from_syntax)
        .filter(Decl::is_instance_storage)
        .any(|decl| decl.access_level().is_some_and(|level| level <= AccessLevel::FilePrivate))
}

impl Transformation for SynthesizeMemberwiseInitializer {
    const KIND: EvolutionKind = EvolutionKind::SynthesizeMemberwiseInitializer;

    fn test<'a, R: Rng + ?Sized>(
        node: &'a SyntaxNode,
        ctx: &DeclContext<'a>,
        _rng: &mut R,
    ) -> Result<Option<Self>, EvolutionError> {
        if node.kind() != NodeKind::MemberBlock {
            return Err(EvolutionError::Unsupported);
        }
        match ctx.innermost() {
            Some(Decl::Struct(strukt)) if !strukt.has_explicit_initializer() => {}
            _ => return Err(EvolutionError::Unsupported),
        }

        let mut all_defaulted = true;
        let mut full = Some(Vec::new());
        for binding in stored_bindings(node) {
            let Some(name) = binding.name() else {
                return Err(EvolutionError::Unsupported);
            };
            let initial = binding.initial_value();
            let annotated = binding.type_annotation();
            if annotated.is_none() && initial.and_then(literal_type).is_none() {
                return Err(EvolutionError::Unsupported);
            }

            all_defaulted &= initial.is_some();
            match (annotated, full.as_mut()) {
                (Some(ty), Some(parameters)) => {
                    parameters.push(InitializerParameter::new(name, ty.clone()));
                }
                _ => full = None,
            }
        }

        let mut inits = Vec::new();
        if all_defaulted {
            inits.push(InitializerSignature::default());
        }
        if let Some(parameters) = full {
            if !(all_defaulted && parameters.is_empty()) {
                inits.push(InitializerSignature::new(parameters));
            }
        }

        Ok((!inits.is_empty()).then(|| Self::new(inits)))
    }

    fn accepts(&self, node: &SyntaxNode) -> bool {
        node.kind() == NodeKind::MemberBlock
            && node.children_of(NodeKind::InitializerDecl).next().is_none()
    }

    fn apply(&self, node: &SyntaxNode) -> SyntaxNode {
        assert!(
            self.accepts(node),
            "memberwise initializers cannot be added to {:?} node",
            node.kind()
        );

        let modifiers: &[&str] = if has_restricted_storage(node) {
            &["fileprivate"]
        } else {
            &[]
        };
        node.appending_children(self.inits.iter().map(|init| init.to_syntax(modifiers)))
    }
}
