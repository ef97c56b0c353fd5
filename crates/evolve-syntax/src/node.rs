//! Immutable syntax nodes
//!
//! Provides [`SyntaxNode`], the tree handed over by the external parser, and
//! [`NodeKind`], the closed set of node shapes the planner understands.
//!
//! Nodes are never mutated in place. Every "edit" returns a new node that
//! shares nothing with the original except cloned subtrees.

use serde::{Deserialize, Serialize};

use crate::path::SyntaxPath;

/// Source position reported by the parser (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number
    pub line: u32,
    /// Column number
    pub column: u32,
}

impl Position {
    /// Create a position
    #[inline]
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Node shapes
///
/// Declarations share a common prefix: zero or more `Attribute` children,
/// then zero or more `Modifier` children. The remaining children follow a
/// fixed layout per kind:
///
/// | kind | layout after the prefix |
/// |---|---|
/// | `ClassDecl`, `StructDecl`, `EnumDecl`, `ProtocolDecl` | `Name`, `[InheritanceClause]`, `MemberBlock` |
/// | `ExtensionDecl` | type, `[InheritanceClause]`, `MemberBlock` |
/// | `TypeAliasDecl` | `Name`, type |
/// | `AssociatedTypeDecl` | `Name`, `[InheritanceClause]`, `[type]` |
/// | `FunctionDecl` | `Name`, `ParameterClause`, `[type]`, `[CodeBlock]` |
/// | `InitializerDecl` | `ParameterClause`, `[CodeBlock]` |
/// | `SubscriptDecl` | `ParameterClause`, type, `[AccessorBlock]` |
/// | `VariableDecl` | `PatternBinding`+ (text is `var` or `let`) |
/// | `EnumCaseDecl` | `Name`+ |
///
/// Other layouts:
/// - `PatternBinding`: `Name`, `[TypeAnnotation]`, `[InitializerClause]`, `[AccessorBlock]`
/// - `AccessorBlock`: `Accessor`* (text is the accessor keyword), or a single
///   `CodeBlock` for an implicit getter
/// - `Parameter`: `Label`, `[Name]`, type, `[DefaultArgument]`
/// - `TypeAnnotation`, `OptionalType`, `ImplicitlyUnwrappedOptionalType`,
///   `ArrayType`: one type child; `DictionaryType`: key and value types
/// - `InitializerClause`, `DefaultArgument`: one `Expr`
/// - `SimpleType`: text is the name, children are generic arguments
/// - `MemberType`: text is the member name, first child is the base type,
///   remaining children are generic arguments
/// - `FunctionType`: parameter types followed by the result type
/// - `Statement`, `Expr`, `Other`, `OpaqueType`: opaque text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    // Declarations
    SourceFile,
    ClassDecl,
    StructDecl,
    EnumDecl,
    ProtocolDecl,
    ExtensionDecl,
    TypeAliasDecl,
    AssociatedTypeDecl,
    FunctionDecl,
    InitializerDecl,
    SubscriptDecl,
    VariableDecl,

    // Structure
    Attribute,
    Modifier,
    Name,
    Label,
    InheritanceClause,
    MemberBlock,
    EnumCaseDecl,
    PatternBinding,
    TypeAnnotation,
    InitializerClause,
    AccessorBlock,
    Accessor,
    ParameterClause,
    Parameter,
    DefaultArgument,
    CodeBlock,
    Statement,
    Expr,
    Other,

    // Types
    SimpleType,
    MemberType,
    ArrayType,
    DictionaryType,
    OptionalType,
    ImplicitlyUnwrappedOptionalType,
    TupleType,
    FunctionType,
    OpaqueType,
}

impl NodeKind {
    /// Whether nodes of this kind open a declaration scope
    #[inline]
    #[must_use]
    pub const fn is_declaration(self) -> bool {
        matches!(
            self,
            Self::SourceFile
                | Self::ClassDecl
                | Self::StructDecl
                | Self::EnumDecl
                | Self::ProtocolDecl
                | Self::ExtensionDecl
                | Self::TypeAliasDecl
                | Self::AssociatedTypeDecl
                | Self::FunctionDecl
                | Self::InitializerDecl
                | Self::SubscriptDecl
                | Self::VariableDecl
        )
    }

    /// Whether nodes of this kind spell a type
    #[inline]
    #[must_use]
    pub const fn is_type(self) -> bool {
        matches!(
            self,
            Self::SimpleType
                | Self::MemberType
                | Self::ArrayType
                | Self::DictionaryType
                | Self::OptionalType
                | Self::ImplicitlyUnwrappedOptionalType
                | Self::TupleType
                | Self::FunctionType
                | Self::OpaqueType
        )
    }

    /// Whether declarations of this kind carry a parameter clause
    #[inline]
    #[must_use]
    pub const fn has_parameters(self) -> bool {
        matches!(
            self,
            Self::FunctionDecl | Self::InitializerDecl | Self::SubscriptDecl
        )
    }
}

/// Immutable, ordered syntax tree node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxNode {
    kind: NodeKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<Position>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    /// Create an interior node
    #[inline]
    #[must_use]
    pub fn new(kind: NodeKind, children: Vec<SyntaxNode>) -> Self {
        Self {
            kind,
            text: None,
            position: None,
            children,
        }
    }

    /// Create a leaf node carrying text
    #[inline]
    #[must_use]
    pub fn leaf(kind: NodeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: Some(text.into()),
            position: None,
            children: Vec::new(),
        }
    }

    /// Create a node carrying both text and children
    #[inline]
    #[must_use]
    pub fn with_text(kind: NodeKind, text: impl Into<String>, children: Vec<SyntaxNode>) -> Self {
        Self {
            kind,
            text: Some(text.into()),
            position: None,
            children,
        }
    }

    /// Same node, positioned
    #[inline]
    #[must_use]
    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Node kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Node text (leaves, accessor keywords, `var`/`let`)
    #[inline]
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Parser-reported position
    #[inline]
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Ordered children
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[SyntaxNode] {
        &self.children
    }

    /// Child at index
    #[inline]
    #[must_use]
    pub fn child(&self, index: usize) -> Option<&SyntaxNode> {
        self.children.get(index)
    }

    /// Whether this node opens a declaration scope
    #[inline]
    #[must_use]
    pub fn is_declaration(&self) -> bool {
        self.kind.is_declaration()
    }

    /// Same node with a new child list
    #[must_use]
    pub fn with_children(&self, children: Vec<SyntaxNode>) -> Self {
        Self {
            kind: self.kind,
            text: self.text.clone(),
            position: self.position,
            children,
        }
    }

    /// Same node with `extra` appended to its children
    #[must_use]
    pub fn appending_children(&self, extra: impl IntoIterator<Item = SyntaxNode>) -> Self {
        let mut children = self.children.clone();
        children.extend(extra);
        self.with_children(children)
    }

    /// Same node with the child at `index` replaced
    ///
    /// Returns `None` if `index` is out of range.
    #[must_use]
    pub fn replacing_child(&self, index: usize, replacement: SyntaxNode) -> Option<Self> {
        if index >= self.children.len() {
            return None;
        }
        let mut children = self.children.clone();
        children[index] = replacement;
        Some(self.with_children(children))
    }

    /// Resolve a structural path from this node
    #[must_use]
    pub fn node_at(&self, path: &SyntaxPath) -> Option<&SyntaxNode> {
        path.iter()
            .try_fold(self, |node, &index| node.children.get(index))
    }

    /// New tree with the node at `path` replaced, rebuilding the spine
    ///
    /// Returns `None` if the path does not resolve.
    #[must_use]
    pub fn replacing_at(&self, path: &SyntaxPath, replacement: SyntaxNode) -> Option<Self> {
        self.replace_along(path.indices(), replacement)
    }

    fn replace_along(&self, indices: &[usize], replacement: SyntaxNode) -> Option<Self> {
        match indices.split_first() {
            None => Some(replacement),
            Some((&index, rest)) => {
                let rebuilt = self.children.get(index)?.replace_along(rest, replacement)?;
                self.replacing_child(index, rebuilt)
            }
        }
    }

    // --- Layout accessors -------------------------------------------------

    /// First child of `kind`
    #[inline]
    #[must_use]
    pub fn first_child_of(&self, kind: NodeKind) -> Option<&SyntaxNode> {
        self.children.iter().find(|c| c.kind == kind)
    }

    /// All children of `kind`
    pub fn children_of(&self, kind: NodeKind) -> impl Iterator<Item = &SyntaxNode> {
        self.children.iter().filter(move |c| c.kind == kind)
    }

    /// Attribute names (without `@`)
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.children_of(NodeKind::Attribute).filter_map(SyntaxNode::text)
    }

    /// Whether the declaration carries attribute `name`
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes().any(|a| a == name)
    }

    /// Modifier keywords
    pub fn modifiers(&self) -> impl Iterator<Item = &str> {
        self.children_of(NodeKind::Modifier).filter_map(SyntaxNode::text)
    }

    /// Text of the first `Name` child
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.first_child_of(NodeKind::Name).and_then(SyntaxNode::text)
    }

    /// First child that spells a type
    #[must_use]
    pub fn type_child(&self) -> Option<&SyntaxNode> {
        self.children.iter().find(|c| c.kind.is_type())
    }

    /// Member block of a nominal type or extension
    #[must_use]
    pub fn member_block(&self) -> Option<&SyntaxNode> {
        self.first_child_of(NodeKind::MemberBlock)
    }

    /// Parameters of a function, initializer, or subscript
    pub fn parameters(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.first_child_of(NodeKind::ParameterClause)
            .into_iter()
            .flat_map(|clause| clause.children_of(NodeKind::Parameter))
    }

    /// Pattern bindings of a variable declaration
    pub fn bindings(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.children_of(NodeKind::PatternBinding)
    }

    /// Annotated type of a pattern binding
    #[must_use]
    pub fn type_annotation(&self) -> Option<&SyntaxNode> {
        self.first_child_of(NodeKind::TypeAnnotation)
            .and_then(SyntaxNode::type_child)
    }

    /// Initial value of a pattern binding
    #[must_use]
    pub fn initial_value(&self) -> Option<&SyntaxNode> {
        self.first_child_of(NodeKind::InitializerClause)
            .and_then(|clause| clause.first_child_of(NodeKind::Expr))
    }

    /// Default value of a parameter
    #[must_use]
    pub fn default_value(&self) -> Option<&SyntaxNode> {
        self.first_child_of(NodeKind::DefaultArgument)
            .and_then(|clause| clause.first_child_of(NodeKind::Expr))
    }

    /// Accessor block of a pattern binding or subscript
    #[must_use]
    pub fn accessor_block(&self) -> Option<&SyntaxNode> {
        self.first_child_of(NodeKind::AccessorBlock)
    }

    /// Number of nodes in this subtree
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(SyntaxNode::subtree_len).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SyntaxNode {
        SyntaxNode::new(
            NodeKind::SourceFile,
            vec![SyntaxNode::new(
                NodeKind::StructDecl,
                vec![
                    SyntaxNode::leaf(NodeKind::Attribute, "frozen"),
                    SyntaxNode::leaf(NodeKind::Modifier, "public"),
                    SyntaxNode::leaf(NodeKind::Name, "Point"),
                    SyntaxNode::new(NodeKind::MemberBlock, vec![]),
                ],
            )],
        )
    }

    #[test]
    fn declaration_kinds() {
        assert!(NodeKind::StructDecl.is_declaration());
        assert!(NodeKind::SourceFile.is_declaration());
        assert!(!NodeKind::MemberBlock.is_declaration());
        assert!(NodeKind::ArrayType.is_type());
        assert!(NodeKind::SubscriptDecl.has_parameters());
        assert!(!NodeKind::VariableDecl.has_parameters());
    }

    #[test]
    fn layout_accessors() {
        let file = sample();
        let decl = file.child(0).unwrap();

        assert_eq!(decl.name(), Some("Point"));
        assert!(decl.has_attribute("frozen"));
        assert_eq!(decl.modifiers().collect::<Vec<_>>(), vec!["public"]);
        assert!(decl.member_block().is_some());
    }

    #[test]
    fn node_at_resolves_paths() {
        let file = sample();
        let path = SyntaxPath::from(vec![0, 2]);

        assert_eq!(file.node_at(&path).and_then(SyntaxNode::text), Some("Point"));
        assert!(file.node_at(&SyntaxPath::from(vec![0, 9])).is_none());
        assert_eq!(file.node_at(&SyntaxPath::root()), Some(&file));
    }

    #[test]
    fn replacing_at_rebuilds_spine_only() {
        let file = sample();
        let path = SyntaxPath::from(vec![0, 2]);
        let renamed = file
            .replacing_at(&path, SyntaxNode::leaf(NodeKind::Name, "Vector"))
            .unwrap();

        assert_eq!(renamed.child(0).unwrap().name(), Some("Vector"));
        assert_eq!(file.child(0).unwrap().name(), Some("Point"));
        assert_eq!(renamed.subtree_len(), file.subtree_len());
    }

    #[test]
    fn replacing_out_of_range_fails() {
        let file = sample();
        assert!(file
            .replacing_at(&SyntaxPath::from(vec![3]), SyntaxNode::leaf(NodeKind::Other, "x"))
            .is_none());
    }

    #[test]
    fn json_omits_empty_fields() {
        let name = SyntaxNode::leaf(NodeKind::Name, "a");
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, r#"{"kind":"Name","text":"a"}"#);

        let back: SyntaxNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, name);
    }
}
