//! Node factories
//!
//! Builders for the node layouts documented on [`NodeKind`]. Transformations
//! use these to synthesize new syntax; tests use them to assemble fixtures.

use crate::node::{NodeKind, SyntaxNode};

/// `Name` leaf
#[inline]
#[must_use]
pub fn name(text: impl Into<String>) -> SyntaxNode {
    SyntaxNode::leaf(NodeKind::Name, text)
}

/// `Attribute` leaf (without `@`)
#[inline]
#[must_use]
pub fn attribute(text: impl Into<String>) -> SyntaxNode {
    SyntaxNode::leaf(NodeKind::Attribute, text)
}

/// `Modifier` leaf
#[inline]
#[must_use]
pub fn modifier(text: impl Into<String>) -> SyntaxNode {
    SyntaxNode::leaf(NodeKind::Modifier, text)
}

/// Opaque expression
#[inline]
#[must_use]
pub fn expr(text: impl Into<String>) -> SyntaxNode {
    SyntaxNode::leaf(NodeKind::Expr, text)
}

/// Opaque statement
#[inline]
#[must_use]
pub fn statement(text: impl Into<String>) -> SyntaxNode {
    SyntaxNode::leaf(NodeKind::Statement, text)
}

/// `Name` type without generic arguments
#[inline]
#[must_use]
pub fn simple_type(name: impl Into<String>) -> SyntaxNode {
    SyntaxNode::leaf(NodeKind::SimpleType, name)
}

/// `Base.Member`
#[inline]
#[must_use]
pub fn member_type(base: SyntaxNode, member: impl Into<String>) -> SyntaxNode {
    SyntaxNode::with_text(NodeKind::MemberType, member, vec![base])
}

/// `[Element]`
#[inline]
#[must_use]
pub fn array_type(element: SyntaxNode) -> SyntaxNode {
    SyntaxNode::new(NodeKind::ArrayType, vec![element])
}

/// `[Key: Value]`
#[inline]
#[must_use]
pub fn dictionary_type(key: SyntaxNode, value: SyntaxNode) -> SyntaxNode {
    SyntaxNode::new(NodeKind::DictionaryType, vec![key, value])
}

/// `Wrapped?`
#[inline]
#[must_use]
pub fn optional_type(wrapped: SyntaxNode) -> SyntaxNode {
    SyntaxNode::new(NodeKind::OptionalType, vec![wrapped])
}

/// `= value` clause of a parameter
#[inline]
#[must_use]
pub fn default_argument(value: SyntaxNode) -> SyntaxNode {
    SyntaxNode::new(NodeKind::DefaultArgument, vec![value])
}

/// Parameter with a single name serving as both label and local name
#[must_use]
pub fn parameter(label: impl Into<String>, ty: SyntaxNode, default: Option<SyntaxNode>) -> SyntaxNode {
    let mut children = vec![SyntaxNode::leaf(NodeKind::Label, label), ty];
    children.extend(default.map(default_argument));
    SyntaxNode::new(NodeKind::Parameter, children)
}

/// `(params...)`
#[inline]
#[must_use]
pub fn parameter_clause(parameters: Vec<SyntaxNode>) -> SyntaxNode {
    SyntaxNode::new(NodeKind::ParameterClause, parameters)
}

/// `{ statements... }`
#[inline]
#[must_use]
pub fn code_block(statements: Vec<SyntaxNode>) -> SyntaxNode {
    SyntaxNode::new(NodeKind::CodeBlock, statements)
}

/// `modifiers init(params) { body }`
#[must_use]
pub fn initializer(modifiers: &[&str], parameters: Vec<SyntaxNode>, body: Vec<SyntaxNode>) -> SyntaxNode {
    let mut children: Vec<_> = modifiers.iter().map(|m| modifier(*m)).collect();
    children.push(parameter_clause(parameters));
    children.push(code_block(body));
    SyntaxNode::new(NodeKind::InitializerDecl, children)
}

/// Single pattern binding `name[: ty][ = value]`
#[must_use]
pub fn pattern_binding(
    binding: impl Into<String>,
    ty: Option<SyntaxNode>,
    value: Option<SyntaxNode>,
) -> SyntaxNode {
    let mut children = vec![name(binding)];
    children.extend(ty.map(|t| SyntaxNode::new(NodeKind::TypeAnnotation, vec![t])));
    children.extend(value.map(|v| SyntaxNode::new(NodeKind::InitializerClause, vec![v])));
    SyntaxNode::new(NodeKind::PatternBinding, children)
}
