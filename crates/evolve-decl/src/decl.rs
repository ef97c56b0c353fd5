//! Declarations
//!
//! Provides [`Decl`], a closed sum type over every declaration shape the
//! planner tracks, and one capability trait per behavior:
//!
//! - [`DeclName`]: naming and name matching
//! - [`Resilience`]: whether the layout may evolve
//! - [`StorageClass`]: stored versus computed
//! - [`MemberLookup`]: direct member enumeration and lookup
//! - [`AccessControl`]: explicit access level
//!
//! Every variant is a thin view over a node of the immutable tree, so a
//! `Decl<'a>` is `Copy` and lives as long as the tree it was read from.

use evolve_syntax::{spelling, NodeKind, SyntaxNode};
use serde::{Deserialize, Serialize};

/// Name of the file-scope root declaration
pub const ROOT_LABEL: &str = "(file)";

/// Attributes that opt a declaration out of resilience
pub const FROZEN_ATTRIBUTES: &[&str] = &["frozen", "_fixed_layout"];

/// Accessors that observe a stored property without replacing its storage
pub const OBSERVING_ACCESSORS: &[&str] = &["willSet", "didSet"];

/// Access to the underlying syntax of a declaration view
pub trait DeclSyntax<'a> {
    /// Declaration node
    fn syntax(&self) -> &'a SyntaxNode;
}

/// Naming capability
pub trait DeclName<'a>: DeclSyntax<'a> {
    /// Declared name
    fn name(&self) -> String {
        self.syntax().name().unwrap_or_default().to_string()
    }

    /// Whether a lookup for `name` finds this declaration
    fn matches_name(&self, name: &str) -> bool {
        self.syntax().name() == Some(name)
    }
}

/// Resilience capability
pub trait Resilience<'a>: DeclSyntax<'a> {
    /// True unless the declaration carries an ABI-frozen marker
    fn is_resilient(&self) -> bool {
        !FROZEN_ATTRIBUTES
            .iter()
            .any(|attr| self.syntax().has_attribute(attr))
    }
}

/// Storage classification capability
pub trait StorageClass<'a>: DeclSyntax<'a> {
    /// Whether the declaration occupies storage
    fn is_stored(&self) -> bool {
        false
    }
}

/// Member lookup capability
pub trait MemberLookup<'a>: DeclSyntax<'a> {
    /// Direct member declarations in source order
    fn members(&self) -> Vec<Decl<'a>> {
        Vec::new()
    }

    /// Direct members answering to `name`, in source order
    fn lookup_direct(&self, name: &str) -> Vec<Decl<'a>> {
        self.members()
            .into_iter()
            .filter(|member| member.matches_name(name))
            .collect()
    }
}

/// Access level capability
pub trait AccessControl<'a>: DeclSyntax<'a> {
    /// Explicit access level, if any modifier spells one
    fn access_level(&self) -> Option<AccessLevel> {
        self.syntax().modifiers().find_map(AccessLevel::from_modifier)
    }
}

/// Access level modifiers, least to most visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AccessLevel {
    Private,
    FilePrivate,
    Internal,
    Package,
    Public,
    Open,
}

impl AccessLevel {
    /// Parse a modifier keyword
    #[must_use]
    pub fn from_modifier(modifier: &str) -> Option<Self> {
        match modifier {
            "private" => Some(Self::Private),
            "fileprivate" => Some(Self::FilePrivate),
            "internal" => Some(Self::Internal),
            "package" => Some(Self::Package),
            "public" => Some(Self::Public),
            "open" => Some(Self::Open),
            _ => None,
        }
    }

    /// Modifier keyword
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::FilePrivate => "fileprivate",
            Self::Internal => "internal",
            Self::Package => "package",
            Self::Public => "public",
            Self::Open => "open",
        }
    }
}

macro_rules! decl_views {
    ($($(#[$doc:meta])* $view:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            pub struct $view<'a> {
                node: &'a SyntaxNode,
            }

            impl<'a> DeclSyntax<'a> for $view<'a> {
                #[inline]
                fn syntax(&self) -> &'a SyntaxNode {
                    self.node
                }
            }
        )*
    };
}

decl_views! {
    /// File-scope root
    FileDecl,
    /// `class`
    ClassDecl,
    /// `struct`
    StructDecl,
    /// `enum`
    EnumDecl,
    /// `protocol`
    ProtocolDecl,
    /// `extension`
    ExtensionDecl,
    /// `typealias`
    TypeAliasDecl,
    /// `associatedtype`
    AssociatedTypeDecl,
    /// `func`
    FunctionDecl,
    /// `init`
    InitializerDecl,
    /// `subscript`
    SubscriptDecl,
    /// `var` / `let`
    VariableDecl,
}

/// Member declarations of a member block, in source order
fn block_members(node: &SyntaxNode) -> Vec<Decl<'_>> {
    node.member_block()
        .map(|block| block.children().iter().filter_map(Decl::from_syntax).collect())
        .unwrap_or_default()
}

// --- FileDecl ---------------------------------------------------------------

impl<'a> DeclName<'a> for FileDecl<'a> {
    fn name(&self) -> String {
        ROOT_LABEL.to_string()
    }

    fn matches_name(&self, _name: &str) -> bool {
        false
    }
}

impl<'a> Resilience<'a> for FileDecl<'a> {
    fn is_resilient(&self) -> bool {
        true
    }
}

impl<'a> MemberLookup<'a> for FileDecl<'a> {
    fn members(&self) -> Vec<Decl<'a>> {
        self.node.children().iter().filter_map(Decl::from_syntax).collect()
    }
}

// --- Nominal types ----------------------------------------------------------

macro_rules! nominal_members {
    ($($view:ident),*) => {
        $(
            impl<'a> MemberLookup<'a> for $view<'a> {
                fn members(&self) -> Vec<Decl<'a>> {
                    block_members(self.node)
                }
            }
        )*
    };
}

nominal_members!(ClassDecl, StructDecl, EnumDecl, ProtocolDecl, ExtensionDecl);

impl<'a> StructDecl<'a> {
    /// Whether the body declares an initializer explicitly
    #[must_use]
    pub fn has_explicit_initializer(&self) -> bool {
        self.members()
            .iter()
            .any(|member| matches!(member, Decl::Initializer(_)))
    }
}

// --- ExtensionDecl ----------------------------------------------------------

impl<'a> ExtensionDecl<'a> {
    /// Extended type
    #[must_use]
    pub fn extended_type(&self) -> Option<&'a SyntaxNode> {
        self.node.type_child()
    }
}

impl<'a> DeclName<'a> for ExtensionDecl<'a> {
    fn name(&self) -> String {
        self.extended_type().map(spelling).unwrap_or_default()
    }

    fn matches_name(&self, _name: &str) -> bool {
        false
    }
}

// --- TypeAliasDecl ----------------------------------------------------------

impl<'a> TypeAliasDecl<'a> {
    /// Aliased type
    #[must_use]
    pub fn target(&self) -> Option<&'a SyntaxNode> {
        self.node.type_child()
    }
}

// --- Functions, initializers, subscripts -------------------------------------

impl<'a> DeclName<'a> for InitializerDecl<'a> {
    fn name(&self) -> String {
        "init".to_string()
    }

    fn matches_name(&self, name: &str) -> bool {
        name == "init"
    }
}

impl<'a> DeclName<'a> for SubscriptDecl<'a> {
    fn name(&self) -> String {
        "subscript".to_string()
    }

    fn matches_name(&self, name: &str) -> bool {
        name == "subscript"
    }
}

// --- VariableDecl -----------------------------------------------------------

impl<'a> VariableDecl<'a> {
    /// Bound names in source order
    pub fn binding_names(&self) -> impl Iterator<Item = &'a str> {
        self.node.bindings().filter_map(SyntaxNode::name)
    }

    /// Whether this is a `let`
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.node.text() == Some("let")
    }

    /// Whether the storage belongs to the type rather than its instances
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.node.modifiers().any(|m| m == "static" || m == "class")
    }
}

impl<'a> DeclName<'a> for VariableDecl<'a> {
    fn name(&self) -> String {
        self.binding_names().collect::<Vec<_>>().join(",")
    }

    fn matches_name(&self, name: &str) -> bool {
        self.binding_names().any(|bound| bound == name)
    }
}

impl<'a> StorageClass<'a> for VariableDecl<'a> {
    /// Stored when no binding has accessors other than observers
    fn is_stored(&self) -> bool {
        self.node.bindings().all(|binding| match binding.accessor_block() {
            None => true,
            Some(block) => {
                block.first_child_of(NodeKind::CodeBlock).is_none()
                    && block
                        .children_of(NodeKind::Accessor)
                        .all(|accessor| {
                            accessor
                                .text()
                                .is_some_and(|keyword| OBSERVING_ACCESSORS.contains(&keyword))
                        })
            }
        })
    }
}

// --- Default capability implementations --------------------------------------

macro_rules! default_capabilities {
    ($capability:ident for $($view:ident),*) => {
        $( impl<'a> $capability<'a> for $view<'a> {} )*
    };
}

default_capabilities!(DeclName for ClassDecl, StructDecl, EnumDecl, ProtocolDecl, TypeAliasDecl, AssociatedTypeDecl, FunctionDecl);
default_capabilities!(Resilience for ClassDecl, StructDecl, EnumDecl, ProtocolDecl, ExtensionDecl, TypeAliasDecl, AssociatedTypeDecl, FunctionDecl, InitializerDecl, SubscriptDecl, VariableDecl);
default_capabilities!(StorageClass for FileDecl, ClassDecl, StructDecl, EnumDecl, ProtocolDecl, ExtensionDecl, TypeAliasDecl, AssociatedTypeDecl, FunctionDecl, InitializerDecl, SubscriptDecl);
default_capabilities!(MemberLookup for TypeAliasDecl, AssociatedTypeDecl, FunctionDecl, InitializerDecl, SubscriptDecl, VariableDecl);
default_capabilities!(AccessControl for FileDecl, ClassDecl, StructDecl, EnumDecl, ProtocolDecl, ExtensionDecl, TypeAliasDecl, AssociatedTypeDecl, FunctionDecl, InitializerDecl, SubscriptDecl, VariableDecl);

// --- Decl -------------------------------------------------------------------

/// Any declaration the planner tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decl<'a> {
    File(FileDecl<'a>),
    Class(ClassDecl<'a>),
    Struct(StructDecl<'a>),
    Enum(EnumDecl<'a>),
    Protocol(ProtocolDecl<'a>),
    Extension(ExtensionDecl<'a>),
    TypeAlias(TypeAliasDecl<'a>),
    AssociatedType(AssociatedTypeDecl<'a>),
    Function(FunctionDecl<'a>),
    Initializer(InitializerDecl<'a>),
    Subscript(SubscriptDecl<'a>),
    Variable(VariableDecl<'a>),
}

macro_rules! dispatch {
    ($decl:expr, $view:ident => $body:expr) => {
        match $decl {
            Decl::File($view) => $body,
            Decl::Class($view) => $body,
            Decl::Struct($view) => $body,
            Decl::Enum($view) => $body,
            Decl::Protocol($view) => $body,
            Decl::Extension($view) => $body,
            Decl::TypeAlias($view) => $body,
            Decl::AssociatedType($view) => $body,
            Decl::Function($view) => $body,
            Decl::Initializer($view) => $body,
            Decl::Subscript($view) => $body,
            Decl::Variable($view) => $body,
        }
    };
}

impl<'a> Decl<'a> {
    /// View a node as a declaration
    ///
    /// Returns `None` for nodes that do not open a declaration scope.
    #[must_use]
    pub fn from_syntax(node: &'a SyntaxNode) -> Option<Self> {
        let decl = match node.kind() {
            NodeKind::SourceFile => Self::File(FileDecl { node }),
            NodeKind::ClassDecl => Self::Class(ClassDecl { node }),
            NodeKind::StructDecl => Self::Struct(StructDecl { node }),
            NodeKind::EnumDecl => Self::Enum(EnumDecl { node }),
            NodeKind::ProtocolDecl => Self::Protocol(ProtocolDecl { node }),
            NodeKind::ExtensionDecl => Self::Extension(ExtensionDecl { node }),
            NodeKind::TypeAliasDecl => Self::TypeAlias(TypeAliasDecl { node }),
            NodeKind::AssociatedTypeDecl => Self::AssociatedType(AssociatedTypeDecl { node }),
            NodeKind::FunctionDecl => Self::Function(FunctionDecl { node }),
            NodeKind::InitializerDecl => Self::Initializer(InitializerDecl { node }),
            NodeKind::SubscriptDecl => Self::Subscript(SubscriptDecl { node }),
            NodeKind::VariableDecl => Self::Variable(VariableDecl { node }),
            _ => return None,
        };
        Some(decl)
    }

    /// Declaration node
    #[inline]
    #[must_use]
    pub fn syntax(&self) -> &'a SyntaxNode {
        dispatch!(self, d => d.syntax())
    }

    /// Declared name
    #[must_use]
    pub fn name(&self) -> String {
        dispatch!(self, d => d.name())
    }

    /// Whether a lookup for `name` finds this declaration
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        dispatch!(self, d => d.matches_name(name))
    }

    /// Whether the layout may evolve
    #[must_use]
    pub fn is_resilient(&self) -> bool {
        dispatch!(self, d => d.is_resilient())
    }

    /// Storage classification; only property-like declarations have one
    #[must_use]
    pub fn is_stored(&self) -> Option<bool> {
        match self {
            Self::Variable(var) => Some(var.is_stored()),
            _ => None,
        }
    }

    /// Whether this is a stored property of each instance
    #[must_use]
    pub fn is_instance_storage(&self) -> bool {
        matches!(self, Self::Variable(var) if var.is_stored() && !var.is_static())
    }

    /// Explicit access level
    #[must_use]
    pub fn access_level(&self) -> Option<AccessLevel> {
        dispatch!(self, d => d.access_level())
    }

    /// Direct members in source order
    #[must_use]
    pub fn members(&self) -> Vec<Decl<'a>> {
        dispatch!(self, d => d.members())
    }

    /// Direct members answering to `name`
    #[must_use]
    pub fn lookup_direct(&self, name: &str) -> Vec<Decl<'a>> {
        dispatch!(self, d => d.lookup_direct(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evolve_syntax::make;
    use evolve_test_utils::{
        accessor_block, computed_var, extension, file, function, initializer, multi_var,
        protocol, stored_var, structure, ty, typed_var, var_with_accessors, with_modifiers,
    };

    #[test]
    fn from_syntax_rejects_non_declarations() {
        assert!(Decl::from_syntax(&make::expr("1")).is_none());
        assert!(Decl::from_syntax(&make::name("x")).is_none());
    }

    #[test]
    fn names() {
        let tree = file(vec![
            structure("Point").member(typed_var("x", "Int")).build(),
            extension(ty("Point")).build(),
        ]);
        let root = Decl::from_syntax(&tree).unwrap();
        let members = root.members();

        assert_eq!(root.name(), ROOT_LABEL);
        assert_eq!(members[0].name(), "Point");
        assert_eq!(members[1].name(), "Point");
        assert!(members[0].matches_name("Point"));
        assert!(!members[1].matches_name("Point"));
    }

    #[test]
    fn frozen_marker_disables_resilience() {
        let frozen = structure("A").frozen().build();
        let fixed = structure("B").attribute("_fixed_layout").build();
        let plain = structure("C").build();

        assert!(!Decl::from_syntax(&frozen).unwrap().is_resilient());
        assert!(!Decl::from_syntax(&fixed).unwrap().is_resilient());
        assert!(Decl::from_syntax(&plain).unwrap().is_resilient());
    }

    #[test]
    fn storage_classification_follows_accessors() {
        let plain = stored_var("a", "1");
        let observed = var_with_accessors("b", "Int", accessor_block(&["willSet", "didSet"]));
        let computed = computed_var("c", "Int");
        let getter = var_with_accessors("d", "Int", accessor_block(&["get", "set"]));

        assert_eq!(Decl::from_syntax(&plain).unwrap().is_stored(), Some(true));
        assert_eq!(Decl::from_syntax(&observed).unwrap().is_stored(), Some(true));
        assert_eq!(Decl::from_syntax(&computed).unwrap().is_stored(), Some(false));
        assert_eq!(Decl::from_syntax(&getter).unwrap().is_stored(), Some(false));

        let strukt = structure("S").build();
        assert_eq!(Decl::from_syntax(&strukt).unwrap().is_stored(), None);
    }

    #[test]
    fn static_storage_is_not_instance_storage() {
        let shared = with_modifiers(stored_var("count", "0"), &["static"]);
        let decl = Decl::from_syntax(&shared).unwrap();

        assert_eq!(decl.is_stored(), Some(true));
        assert!(!decl.is_instance_storage());
        assert!(Decl::from_syntax(&stored_var("n", "0")).unwrap().is_instance_storage());
    }

    #[test]
    fn lookup_direct_matches_any_binding_and_special_names() {
        let strukt = structure("S")
            .member(multi_var(&["a", "b"], "Int"))
            .member(function("run", vec![]))
            .member(initializer(vec![]))
            .build();
        let decl = Decl::from_syntax(&strukt).unwrap();

        assert_eq!(decl.lookup_direct("b").len(), 1);
        assert_eq!(decl.lookup_direct("run").len(), 1);
        assert_eq!(decl.lookup_direct("init").len(), 1);
        assert!(decl.lookup_direct("missing").is_empty());
        assert_eq!(decl.members()[0].name(), "a,b");
    }

    #[test]
    fn explicit_initializer_detection() {
        let without = structure("S").member(typed_var("a", "Int")).build();
        let with = structure("S").member(initializer(vec![])).build();

        let Some(Decl::Struct(without)) = Decl::from_syntax(&without) else { panic!("struct") };
        let Some(Decl::Struct(with)) = Decl::from_syntax(&with) else { panic!("struct") };
        assert!(!without.has_explicit_initializer());
        assert!(with.has_explicit_initializer());
    }

    #[test]
    fn access_levels() {
        let hidden = with_modifiers(typed_var("a", "Int"), &["private"]);
        let open = protocol("P").modifier("public").build();

        assert_eq!(Decl::from_syntax(&hidden).unwrap().access_level(), Some(AccessLevel::Private));
        assert_eq!(Decl::from_syntax(&open).unwrap().access_level(), Some(AccessLevel::Public));
        assert!(AccessLevel::Private < AccessLevel::FilePrivate);
        assert_eq!(AccessLevel::from_modifier("static"), None);
    }
}
