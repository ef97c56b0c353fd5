//! Testing utilities for the evolution planner workspace
//!
//! Shared tree fixtures: declaration builders and the canonical scenarios.

#![allow(missing_docs)]

use evolve_syntax::{make, NodeKind, Position, SyntaxNode};

pub fn ty(name: &str) -> SyntaxNode {
    make::simple_type(name)
}

pub fn file(decls: Vec<SyntaxNode>) -> SyntaxNode {
    SyntaxNode::new(NodeKind::SourceFile, decls)
}

#[derive(Debug, Clone)]
pub struct DeclBuilder {
    kind: NodeKind,
    attributes: Vec<String>,
    modifiers: Vec<String>,
    head: SyntaxNode,
    members: Vec<SyntaxNode>,
    position: Option<Position>,
}

impl DeclBuilder {
    fn new(kind: NodeKind, head: SyntaxNode) -> Self {
        Self {
            kind,
            attributes: Vec::new(),
            modifiers: Vec::new(),
            head,
            members: Vec::new(),
            position: None,
        }
    }

    pub fn attribute(mut self, attr: &str) -> Self {
        self.attributes.push(attr.to_string());
        self
    }

    pub fn frozen(self) -> Self {
        self.attribute("frozen")
    }

    pub fn modifier(mut self, modifier: &str) -> Self {
        self.modifiers.push(modifier.to_string());
        self
    }

    pub fn member(mut self, member: SyntaxNode) -> Self {
        self.members.push(member);
        self
    }

    pub fn members(mut self, members: impl IntoIterator<Item = SyntaxNode>) -> Self {
        self.members.extend(members);
        self
    }

    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.position = Some(Position::new(line, column));
        self
    }

    pub fn build(self) -> SyntaxNode {
        let mut children: Vec<SyntaxNode> = self.attributes.into_iter().map(make::attribute).collect();
        children.extend(self.modifiers.into_iter().map(make::modifier));
        children.push(self.head);
        children.push(SyntaxNode::new(NodeKind::MemberBlock, self.members));
        let node = SyntaxNode::new(self.kind, children);
        match self.position {
            Some(position) => node.at(position),
            None => node,
        }
    }
}

pub fn structure(name: &str) -> DeclBuilder {
    DeclBuilder::new(NodeKind::StructDecl, make::name(name))
}

pub fn class(name: &str) -> DeclBuilder {
    DeclBuilder::new(NodeKind::ClassDecl, make::name(name))
}

pub fn enumeration(name: &str) -> DeclBuilder {
    DeclBuilder::new(NodeKind::EnumDecl, make::name(name))
}

pub fn protocol(name: &str) -> DeclBuilder {
    DeclBuilder::new(NodeKind::ProtocolDecl, make::name(name))
}

pub fn extension(extended: SyntaxNode) -> DeclBuilder {
    DeclBuilder::new(NodeKind::ExtensionDecl, extended)
}

/// Prepend declaration modifiers, after any attributes
pub fn with_modifiers(decl: SyntaxNode, modifiers: &[&str]) -> SyntaxNode {
    let split = decl
        .children()
        .iter()
        .take_while(|c| c.kind() == NodeKind::Attribute)
        .count();
    let mut children = decl.children()[..split].to_vec();
    children.extend(modifiers.iter().map(|m| make::modifier(*m)));
    children.extend_from_slice(&decl.children()[split..]);
    decl.with_children(children)
}

/// Prepend declaration attributes
pub fn with_attributes(decl: SyntaxNode, attributes: &[&str]) -> SyntaxNode {
    let mut children: Vec<SyntaxNode> = attributes.iter().map(|a| make::attribute(*a)).collect();
    children.extend_from_slice(decl.children());
    decl.with_children(children)
}

fn variable(keyword: &str, bindings: Vec<SyntaxNode>) -> SyntaxNode {
    SyntaxNode::with_text(NodeKind::VariableDecl, keyword, bindings)
}

/// `var name: Ty`
pub fn typed_var(name: &str, type_name: &str) -> SyntaxNode {
    variable("var", vec![make::pattern_binding(name, Some(ty(type_name)), None)])
}

/// `var name: <ty>`
pub fn var_of(name: &str, annotation: SyntaxNode) -> SyntaxNode {
    variable("var", vec![make::pattern_binding(name, Some(annotation), None)])
}

/// `var name = value`
pub fn stored_var(name: &str, value: &str) -> SyntaxNode {
    variable("var", vec![make::pattern_binding(name, None, Some(make::expr(value)))])
}

/// `var name: Ty = value`
pub fn typed_var_with_value(name: &str, type_name: &str, value: &str) -> SyntaxNode {
    variable(
        "var",
        vec![make::pattern_binding(name, Some(ty(type_name)), Some(make::expr(value)))],
    )
}

/// `let name: Ty`
pub fn constant(name: &str, type_name: &str) -> SyntaxNode {
    variable("let", vec![make::pattern_binding(name, Some(ty(type_name)), None)])
}

/// `let name = value`
pub fn constant_with_value(name: &str, value: &str) -> SyntaxNode {
    variable("let", vec![make::pattern_binding(name, None, Some(make::expr(value)))])
}

/// `var a: Ty, b: Ty`
pub fn multi_var(names: &[&str], type_name: &str) -> SyntaxNode {
    variable(
        "var",
        names
            .iter()
            .map(|n| make::pattern_binding(*n, Some(ty(type_name)), None))
            .collect(),
    )
}

/// Accessor block with one empty accessor per keyword
pub fn accessor_block(keywords: &[&str]) -> SyntaxNode {
    SyntaxNode::new(
        NodeKind::AccessorBlock,
        keywords
            .iter()
            .map(|k| SyntaxNode::with_text(NodeKind::Accessor, *k, vec![make::code_block(vec![])]))
            .collect(),
    )
}

/// `var name: Ty { <accessors> }`
pub fn var_with_accessors(name: &str, type_name: &str, accessors: SyntaxNode) -> SyntaxNode {
    let binding = make::pattern_binding(name, Some(ty(type_name)), None).appending_children([accessors]);
    variable("var", vec![binding])
}

/// `var name: Ty { ... }` with an implicit getter
pub fn computed_var(name: &str, type_name: &str) -> SyntaxNode {
    let getter = SyntaxNode::new(
        NodeKind::AccessorBlock,
        vec![make::code_block(vec![make::statement("fatalError()")])],
    );
    var_with_accessors(name, type_name, getter)
}

/// `label: Ty`
pub fn param(label: &str, type_name: &str) -> SyntaxNode {
    make::parameter(label, ty(type_name), None)
}

/// `label: <ty> = value`
pub fn param_with_default(label: &str, param_type: SyntaxNode, value: &str) -> SyntaxNode {
    make::parameter(label, param_type, Some(make::expr(value)))
}

/// `func name(params) { }`
pub fn function(name: &str, params: Vec<SyntaxNode>) -> SyntaxNode {
    SyntaxNode::new(
        NodeKind::FunctionDecl,
        vec![make::name(name), make::parameter_clause(params), make::code_block(vec![])],
    )
}

/// `func name(params)` without a body
pub fn requirement(name: &str, params: Vec<SyntaxNode>) -> SyntaxNode {
    SyntaxNode::new(NodeKind::FunctionDecl, vec![make::name(name), make::parameter_clause(params)])
}

/// `init(params) { }`
pub fn initializer(params: Vec<SyntaxNode>) -> SyntaxNode {
    make::initializer(&[], params, vec![])
}

/// `subscript(params) -> Result { }`
pub fn subscript(params: Vec<SyntaxNode>, result: &str) -> SyntaxNode {
    SyntaxNode::new(
        NodeKind::SubscriptDecl,
        vec![
            make::parameter_clause(params),
            ty(result),
            SyntaxNode::new(NodeKind::AccessorBlock, vec![make::code_block(vec![])]),
        ],
    )
}

/// `typealias name = target`
pub fn typealias(name: &str, target: SyntaxNode) -> SyntaxNode {
    SyntaxNode::new(NodeKind::TypeAliasDecl, vec![make::name(name), target])
}

/// `associatedtype name`
pub fn associated_type(name: &str) -> SyntaxNode {
    SyntaxNode::new(NodeKind::AssociatedTypeDecl, vec![make::name(name)])
}

/// Canonical planning scenarios
pub mod scenarios {
    use super::*;

    /// Ten annotated stored properties `p0: Int` .. `p9: Int`
    pub fn ten_properties() -> Vec<SyntaxNode> {
        (0..10).map(|i| typed_var(&format!("p{i}"), "Int")).collect()
    }

    /// `@frozen struct Frozen` with ten stored properties
    pub fn frozen_struct() -> SyntaxNode {
        file(vec![structure("Frozen").frozen().members(ten_properties()).build()])
    }

    /// `struct Resilient` with ten stored properties and no initializer
    pub fn resilient_struct() -> SyntaxNode {
        file(vec![structure("Resilient").members(ten_properties()).build()])
    }

    /// Free function with one array parameter and one dictionary parameter
    pub fn collection_function() -> SyntaxNode {
        file(vec![function(
            "consume",
            vec![
                make::parameter("items", make::array_type(ty("Int")), None),
                make::parameter("lookup", make::dictionary_type(ty("String"), ty("Int")), None),
            ],
        )])
    }

    /// Chain of `depth` aliases ending at `Int`, plus a function taking the
    /// last alias
    pub fn alias_chain(depth: usize) -> SyntaxNode {
        let mut decls: Vec<SyntaxNode> = (0..depth)
            .map(|i| {
                let target = if i == 0 { ty("Int") } else { ty(&format!("A{}", i - 1)) };
                typealias(&format!("A{i}"), target)
            })
            .collect();
        let last = if depth == 0 { "Int".to_string() } else { format!("A{}", depth - 1) };
        decls.push(function("take", vec![param("value", &last)]));
        file(decls)
    }
}
