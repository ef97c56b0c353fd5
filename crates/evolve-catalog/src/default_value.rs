//! Default value synthesis
//!
//! Maps a resolved [`TypeShape`] to a literal usable as a default argument.

use evolve_syntax::TypeShape;

/// Placeholder used for text-shaped defaults
pub const PLACEHOLDER_TEXT: &str = "\"lorem ipsum\"";

/// Synthesizable default value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    EmptyCollection,
    EmptyDictionary,
    Placeholder,
    ZeroInteger,
    ZeroFloat,
    Nil,
}

impl DefaultValue {
    /// Default for a type shape; named types have none
    #[must_use]
    pub const fn for_shape(shape: TypeShape) -> Option<Self> {
        match shape {
            TypeShape::Array | TypeShape::Set => Some(Self::EmptyCollection),
            TypeShape::Dictionary => Some(Self::EmptyDictionary),
            TypeShape::Text => Some(Self::Placeholder),
            TypeShape::Integer => Some(Self::ZeroInteger),
            TypeShape::Floating => Some(Self::ZeroFloat),
            TypeShape::Optional => Some(Self::Nil),
            TypeShape::Named => None,
        }
    }

    /// Source text of the literal
    #[must_use]
    pub const fn source(self) -> &'static str {
        match self {
            Self::EmptyCollection => "[]",
            Self::EmptyDictionary => "[:]",
            Self::Placeholder => PLACEHOLDER_TEXT,
            Self::ZeroInteger => "0",
            Self::ZeroFloat => "0.0",
            Self::Nil => "nil",
        }
    }
}

/// Literals evaluated at the call site
///
/// Inside a closure they would name the closure's location instead.
pub const MAGIC_LITERALS: [&str; 7] = [
    "#file",
    "#fileID",
    "#filePath",
    "#line",
    "#column",
    "#function",
    "#dsohandle",
];

/// True for a call-site literal such as `#line`
#[must_use]
pub fn is_magic_literal(expr: &str) -> bool {
    MAGIC_LITERALS.contains(&expr.trim())
}

/// Wrap an existing default in an immediately applied closure
///
/// The value is unchanged; the expression producing it is not. Call-site
/// literals have no wrapped form.
#[must_use]
pub fn wrapped_default(existing: &str) -> Option<String> {
    (!is_magic_literal(existing)).then(|| format!("{{ {} }}()", existing.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes_map_to_literals() {
        let source = |shape| DefaultValue::for_shape(shape).map(DefaultValue::source);

        assert_eq!(source(TypeShape::Array), Some("[]"));
        assert_eq!(source(TypeShape::Set), Some("[]"));
        assert_eq!(source(TypeShape::Dictionary), Some("[:]"));
        assert_eq!(source(TypeShape::Text), Some("\"lorem ipsum\""));
        assert_eq!(source(TypeShape::Integer), Some("0"));
        assert_eq!(source(TypeShape::Floating), Some("0.0"));
        assert_eq!(source(TypeShape::Optional), Some("nil"));
        assert_eq!(source(TypeShape::Named), None);
    }

    #[test]
    fn wrapping_keeps_the_value() {
        assert_eq!(wrapped_default(" 42 ").as_deref(), Some("{ 42 }()"));
    }

    #[test]
    fn call_site_literals_are_not_wrapped() {
        for literal in MAGIC_LITERALS {
            assert_eq!(wrapped_default(literal), None, "{literal}");
        }
        assert_eq!(wrapped_default(" #line "), None);
        assert_eq!(
            wrapped_default("#fileLiteral(resourceName: \"a\")").as_deref(),
            Some("{ #fileLiteral(resourceName: \"a\") }()")
        );
    }
}
