//! Structural type shapes and literal typing
//!
//! Classifies type syntax into a small set of [`TypeShape`]s by exact
//! structural matching. A nominal type whose name merely contains `Array`
//! is [`TypeShape::Named`], never [`TypeShape::Array`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::make;
use crate::node::{NodeKind, SyntaxNode};

/// Module name that may qualify standard library types
pub const STANDARD_MODULE: &str = "Swift";

/// Normalized shape of a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TypeShape {
    /// `[T]`, `Array<T>`, `ContiguousArray<T>`, `ArraySlice<T>`
    Array,
    /// `Set<T>`
    Set,
    /// `[K: V]`, `Dictionary<K, V>`
    Dictionary,
    /// `String`, `Substring`
    Text,
    /// Fixed-width integers
    Integer,
    /// Binary floating point
    Floating,
    /// `T?`, `T!`, `Optional<T>`
    Optional,
    /// Anything else
    Named,
}

impl TypeShape {
    /// Classify type syntax without consulting declarations
    ///
    /// Names are matched exactly against standard library spellings, bare or
    /// qualified by [`STANDARD_MODULE`].
    #[must_use]
    pub fn of_syntax(ty: &SyntaxNode) -> Self {
        match ty.kind() {
            NodeKind::ArrayType => Self::Array,
            NodeKind::DictionaryType => Self::Dictionary,
            NodeKind::OptionalType | NodeKind::ImplicitlyUnwrappedOptionalType => Self::Optional,
            NodeKind::SimpleType => ty.text().map_or(Self::Named, Self::of_standard_name),
            NodeKind::MemberType => {
                let in_standard_module = ty.child(0).is_some_and(|base| {
                    base.kind() == NodeKind::SimpleType
                        && base.text() == Some(STANDARD_MODULE)
                        && base.children().is_empty()
                });
                match ty.text() {
                    Some(member) if in_standard_module => Self::of_standard_name(member),
                    _ => Self::Named,
                }
            }
            _ => Self::Named,
        }
    }

    /// Classify a standard library type name
    #[must_use]
    pub fn of_standard_name(name: &str) -> Self {
        match name {
            "Array" | "ContiguousArray" | "ArraySlice" => Self::Array,
            "Set" => Self::Set,
            "Dictionary" => Self::Dictionary,
            "String" | "Substring" => Self::Text,
            "Int" | "Int8" | "Int16" | "Int32" | "Int64" | "UInt" | "UInt8" | "UInt16"
            | "UInt32" | "UInt64" => Self::Integer,
            "Float" | "Double" | "Float16" | "Float80" => Self::Floating,
            "Optional" | "ImplicitlyUnwrappedOptional" => Self::Optional,
            _ => Self::Named,
        }
    }
}

static INTEGER_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?(0x[0-9a-fA-F][0-9a-fA-F_]*|0o[0-7][0-7_]*|0b[01][01_]*|[0-9][0-9_]*)$")
        .expect("integer literal pattern is valid")
});

static FLOAT_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?[0-9][0-9_]*(\.[0-9][0-9_]*([eE][+-]?[0-9]+)?|[eE][+-]?[0-9]+)$")
        .expect("float literal pattern is valid")
});

static STRING_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)^".*"$"#).expect("string literal pattern is valid"));

/// Type inferred from a literal initializer expression
///
/// Returns `None` for anything that is not a plain literal.
#[must_use]
pub fn literal_type(expr: &SyntaxNode) -> Option<SyntaxNode> {
    if expr.kind() != NodeKind::Expr {
        return None;
    }
    let text = expr.text()?.trim();
    let name = if INTEGER_LITERAL.is_match(text) {
        "Int"
    } else if FLOAT_LITERAL.is_match(text) {
        "Double"
    } else if STRING_LITERAL.is_match(text) {
        "String"
    } else if text == "true" || text == "false" {
        "Bool"
    } else {
        return None;
    };
    Some(make::simple_type(name))
}

/// Source spelling of a type node
#[must_use]
pub fn spelling(ty: &SyntaxNode) -> String {
    let children = ty.children();
    match ty.kind() {
        NodeKind::SimpleType => with_generic_args(ty.text().unwrap_or_default(), children),
        NodeKind::MemberType => {
            let base = children.first().map(spelling).unwrap_or_default();
            let member = with_generic_args(ty.text().unwrap_or_default(), children.get(1..).unwrap_or_default());
            format!("{base}.{member}")
        }
        NodeKind::ArrayType => format!("[{}]", joined(children)),
        NodeKind::DictionaryType => match children {
            [key, value] => format!("[{}: {}]", spelling(key), spelling(value)),
            _ => format!("[{}]", joined(children)),
        },
        NodeKind::OptionalType => format!("{}?", joined(children)),
        NodeKind::ImplicitlyUnwrappedOptionalType => format!("{}!", joined(children)),
        NodeKind::TupleType => format!("({})", joined(children)),
        NodeKind::FunctionType => match children.split_last() {
            Some((result, params)) => format!("({}) -> {}", joined(params), spelling(result)),
            None => "() -> ()".to_string(),
        },
        _ => ty.text().unwrap_or_default().to_string(),
    }
}

fn with_generic_args(name: &str, args: &[SyntaxNode]) -> String {
    if args.is_empty() {
        name.to_string()
    } else {
        format!("{name}<{}>", joined(args))
    }
}

fn joined(types: &[SyntaxNode]) -> String {
    types.iter().map(spelling).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::make::{expr, simple_type};

    fn generic(name: &str, args: Vec<SyntaxNode>) -> SyntaxNode {
        SyntaxNode::with_text(NodeKind::SimpleType, name, args)
    }

    #[test]
    fn structural_shapes() {
        let int = simple_type("Int");
        assert_eq!(TypeShape::of_syntax(&make::array_type(int.clone())), TypeShape::Array);
        assert_eq!(
            TypeShape::of_syntax(&make::dictionary_type(simple_type("String"), int.clone())),
            TypeShape::Dictionary
        );
        assert_eq!(TypeShape::of_syntax(&make::optional_type(int.clone())), TypeShape::Optional);
        assert_eq!(TypeShape::of_syntax(&generic("Set", vec![int.clone()])), TypeShape::Set);
        assert_eq!(TypeShape::of_syntax(&int), TypeShape::Integer);
        assert_eq!(TypeShape::of_syntax(&simple_type("Double")), TypeShape::Floating);
        assert_eq!(TypeShape::of_syntax(&simple_type("Substring")), TypeShape::Text);
    }

    #[test]
    fn names_containing_standard_names_are_not_matched() {
        assert_eq!(TypeShape::of_syntax(&simple_type("MyArray")), TypeShape::Named);
        assert_eq!(TypeShape::of_syntax(&simple_type("ArrayBuilder")), TypeShape::Named);
        assert_eq!(TypeShape::of_syntax(&simple_type("StringProtocol")), TypeShape::Named);
        assert_eq!(TypeShape::of_syntax(&simple_type("Bool")), TypeShape::Named);
    }

    #[test]
    fn standard_module_qualification() {
        let qualified = make::member_type(simple_type("Swift"), "Int");
        assert_eq!(TypeShape::of_syntax(&qualified), TypeShape::Integer);

        let foreign = make::member_type(simple_type("Foundation"), "Int");
        assert_eq!(TypeShape::of_syntax(&foreign), TypeShape::Named);
    }

    #[test]
    fn literal_typing() {
        let ty = |text: &str| literal_type(&expr(text)).map(|t| spelling(&t));

        assert_eq!(ty("42"), Some("Int".to_string()));
        assert_eq!(ty("-1_000"), Some("Int".to_string()));
        assert_eq!(ty("0xFF"), Some("Int".to_string()));
        assert_eq!(ty("3.14"), Some("Double".to_string()));
        assert_eq!(ty("1e10"), Some("Double".to_string()));
        assert_eq!(ty("\"hi\""), Some("String".to_string()));
        assert_eq!(ty("true"), Some("Bool".to_string()));
        assert_eq!(ty("makeValue()"), None);
        assert_eq!(ty("[]"), None);
    }

    #[test]
    fn spelling_round_trips_common_types() {
        let int = simple_type("Int");
        assert_eq!(spelling(&make::array_type(int.clone())), "[Int]");
        assert_eq!(
            spelling(&make::dictionary_type(simple_type("String"), int.clone())),
            "[String: Int]"
        );
        assert_eq!(spelling(&make::optional_type(int.clone())), "Int?");
        assert_eq!(spelling(&generic("Set", vec![int.clone()])), "Set<Int>");
        assert_eq!(spelling(&make::member_type(simple_type("Outer"), "Inner")), "Outer.Inner");
    }
}
