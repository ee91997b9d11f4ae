//! Type tags for parameter values.
//!
//! A [`Type`] selects the transform that converts raw tokens and the
//! completer that suggests them. Registries are keyed by these tags rather
//! than by any runtime type inspection.

use std::fmt;
use std::sync::Arc;

/// Type tag for a command parameter.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Boolean (`true`/`false`, case-insensitive).
    Bool,
    /// 64-bit signed integer.
    Int,
    /// 64-bit floating point.
    Float,
    /// A single word.
    String,
    /// Free text; as a vararg the remaining words are joined before conversion.
    Text,
    /// A registered enumeration, by name.
    Enum(Arc<str>),
    /// A host-defined type, by name (e.g. `player`).
    Named(Arc<str>),
}

impl Type {
    /// Creates an enumeration type tag.
    #[must_use]
    pub fn enumeration(name: impl AsRef<str>) -> Self {
        Self::Enum(Arc::from(name.as_ref()))
    }

    /// Creates a host-defined type tag.
    #[must_use]
    pub fn named(name: impl AsRef<str>) -> Self {
        Self::Named(Arc::from(name.as_ref()))
    }

    /// Returns true for the types every registry knows out of the box.
    #[must_use]
    pub const fn is_builtin(&self) -> bool {
        matches!(
            self,
            Self::Bool | Self::Int | Self::Float | Self::String | Self::Text
        )
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::String => write!(f, "string"),
            Self::Text => write!(f, "text"),
            Self::Enum(name) => write!(f, "enum:{name}"),
            Self::Named(name) => write!(f, "{name}"),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
