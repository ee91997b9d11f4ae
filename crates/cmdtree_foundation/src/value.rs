//! Typed argument values.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A converted argument value.
///
/// Values are immutable and cheaply cloneable.
#[derive(Clone)]
pub enum Value {
    /// Absent optional argument with no default.
    Nil,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// String value.
    String(Arc<str>),
    /// A variant of a registered enumeration.
    Enum {
        /// Enumeration name.
        type_name: Arc<str>,
        /// Canonical variant name.
        variant: Arc<str>,
    },
    /// Ordered sequence (vararg parameters).
    List(Arc<[Value]>),
    /// Host-defined value produced by a custom transform.
    Custom(CustomValue),
}

/// A host-defined value with its type name.
#[derive(Clone)]
pub struct CustomValue {
    type_name: Arc<str>,
    inner: Arc<dyn Any + Send + Sync>,
}

impl CustomValue {
    /// Wraps a host value.
    #[must_use]
    pub fn new<T: Any + Send + Sync>(type_name: impl AsRef<str>, value: T) -> Self {
        Self {
            type_name: Arc::from(type_name.as_ref()),
            inner: Arc::new(value),
        }
    }

    /// Returns the host type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Attempts to borrow the wrapped value as `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl Value {
    /// Creates a string value.
    #[must_use]
    pub fn string(s: impl AsRef<str>) -> Self {
        Self::String(Arc::from(s.as_ref()))
    }

    /// Creates a list value.
    #[must_use]
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Self::List(items.into_iter().collect())
    }

    /// Creates a custom host value.
    #[must_use]
    pub fn custom<T: Any + Send + Sync>(type_name: impl AsRef<str>, value: T) -> Self {
        Self::Custom(CustomValue::new(type_name, value))
    }

    /// Returns a short name for this value's kind, for diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> &str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Enum { type_name, .. } => type_name.as_ref(),
            Self::List(_) => "list",
            Self::Custom(c) => c.type_name(),
        }
    }

    /// Returns true if this value is nil.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Attempts to extract a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a number as f64 (converts int to float).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract an enumeration variant name.
    #[must_use]
    pub fn as_variant(&self) -> Option<&str> {
        match self {
            Self::Enum { variant, .. } => Some(variant),
            _ => None,
        }
    }

    /// Attempts to extract a list slice.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Attempts to borrow a custom host value as `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Custom(c) => c.downcast_ref::<T>(),
            _ => None,
        }
    }
}

// Implement PartialEq manually to handle float and host value comparison
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (
                Self::Enum {
                    type_name: ta,
                    variant: va,
                },
                Self::Enum {
                    type_name: tb,
                    variant: vb,
                },
            ) => ta == tb && va == vb,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(&a.inner, &b.inner),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Enum { type_name, variant } => write!(f, "{type_name}::{variant}"),
            Self::List(items) => f.debug_list().entries(items.iter()).finish(),
            Self::Custom(c) => write!(f, "<{}>", c.type_name),
        }
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CustomValue({})", self.type_name)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Enum { variant, .. } => write!(f, "{variant}"),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Self::Custom(c) => write!(f, "<{}>", c.type_name),
        }
    }
}

// Convenience From implementations

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(Arc::from(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(Arc::from(items))
    }
}
