//! Type-keyed token conversion.
//!
//! A [`TransformRegistry`] maps a [`Type`] tag to a [`Transform`] that turns
//! a raw token into a typed [`Value`]. The last registration for a type wins.

use std::fmt;
use std::sync::Arc;

use cmdtree_foundation::{Type, Value};
use thiserror::Error;
use tracing::{debug, warn};

/// A token conversion failure.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ConversionError {
    message: String,
}

impl ConversionError {
    /// Creates a conversion error with a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Creates an "expected X" conversion error.
    #[must_use]
    pub fn expected(what: impl fmt::Display, raw: &str) -> Self {
        Self::new(format!("expected {what}, got '{raw}'"))
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// How a vararg parameter of this type receives its tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarargPolicy {
    /// Each token is converted on its own; the result is a list.
    Sequence,
    /// Tokens are joined with the separator and converted once.
    Joined,
}

/// Conversion function signature.
pub type TransformFn = Arc<dyn Fn(&str) -> Result<Value, ConversionError> + Send + Sync>;

/// A registered conversion for one type.
#[derive(Clone)]
pub struct Transform {
    convert: TransformFn,
    policy: VarargPolicy,
}

impl Transform {
    /// Creates a per-token transform.
    pub fn new<F>(convert: F) -> Self
    where
        F: Fn(&str) -> Result<Value, ConversionError> + Send + Sync + 'static,
    {
        Self {
            convert: Arc::new(convert),
            policy: VarargPolicy::Sequence,
        }
    }

    /// Creates a transform that receives joined vararg text.
    pub fn joined<F>(convert: F) -> Self
    where
        F: Fn(&str) -> Result<Value, ConversionError> + Send + Sync + 'static,
    {
        Self {
            convert: Arc::new(convert),
            policy: VarargPolicy::Joined,
        }
    }

    /// Returns the vararg policy.
    #[must_use]
    pub const fn policy(&self) -> VarargPolicy {
        self.policy
    }

    /// Converts a raw token.
    ///
    /// # Errors
    ///
    /// Returns the transform's own [`ConversionError`].
    pub fn convert(&self, raw: &str) -> Result<Value, ConversionError> {
        (self.convert)(raw)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Transform({:?})", self.policy)
    }
}

/// Registry of transforms keyed by type tag.
///
/// Cloning is O(1); the map is persistent.
#[derive(Clone, Debug, Default)]
pub struct TransformRegistry {
    entries: im::HashMap<Type, Transform>,
}

impl TransformRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in transforms.
    ///
    /// - `bool`: `true`/`false`, case-insensitive
    /// - `int`, `float`: standard Rust number parsing
    /// - `string`: the token itself
    /// - `text`: the token itself, joined when used as a vararg
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Type::Bool, Transform::new(parse_bool));
        registry.register(
            Type::Int,
            Transform::new(|raw| {
                raw.parse::<i64>()
                    .map(Value::Int)
                    .map_err(|_| ConversionError::expected("an integer", raw))
            }),
        );
        registry.register(
            Type::Float,
            Transform::new(|raw| {
                raw.parse::<f64>()
                    .map(Value::Float)
                    .map_err(|_| ConversionError::expected("a number", raw))
            }),
        );
        registry.register(Type::String, Transform::new(|raw| Ok(Value::string(raw))));
        registry.register(Type::Text, Transform::joined(|raw| Ok(Value::string(raw))));
        registry
    }

    /// Registers a transform, replacing any previous one for the type.
    ///
    /// Returns the replaced transform.
    pub fn register(&mut self, value_type: Type, transform: Transform) -> Option<Transform> {
        let previous = self.entries.insert(value_type.clone(), transform);
        if previous.is_some() {
            warn!(%value_type, "transform overridden");
        } else {
            debug!(%value_type, "transform registered");
        }
        previous
    }

    /// Registers a case-insensitive enumeration transform.
    ///
    /// Tokens convert to [`Value::Enum`] carrying the canonical variant name.
    pub fn register_enum<I, S>(&mut self, name: &str, variants: I) -> Type
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let value_type = Type::enumeration(name);
        let type_name: Arc<str> = Arc::from(name);
        let variants: Arc<[Arc<str>]> = variants
            .into_iter()
            .map(|v| Arc::from(v.as_ref()))
            .collect();

        self.register(
            value_type.clone(),
            Transform::new(move |raw| {
                variants
                    .iter()
                    .find(|v| v.eq_ignore_ascii_case(raw))
                    .map(|v| Value::Enum {
                        type_name: Arc::clone(&type_name),
                        variant: Arc::clone(v),
                    })
                    .ok_or_else(|| {
                        let names: Vec<&str> = variants.iter().map(|v| &**v).collect();
                        ConversionError::expected(
                            format_args!("one of {}", names.join(", ")),
                            raw,
                        )
                    })
            }),
        );
        value_type
    }

    /// Looks up the transform for a type.
    #[must_use]
    pub fn get(&self, value_type: &Type) -> Option<&Transform> {
        self.entries.get(value_type)
    }

    /// Returns true if a transform is registered for the type.
    #[must_use]
    pub fn contains(&self, value_type: &Type) -> bool {
        self.entries.contains_key(value_type)
    }

    /// Converts a raw token with the transform for a type.
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionError`] if no transform is registered or the
    /// transform rejects the token.
    pub fn convert(&self, value_type: &Type, raw: &str) -> Result<Value, ConversionError> {
        match self.get(value_type) {
            Some(transform) => transform.convert(raw),
            None => Err(ConversionError::new(format!(
                "no transform registered for type {value_type}"
            ))),
        }
    }

    /// Returns the number of registered transforms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no transforms are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_bool(raw: &str) -> Result<Value, ConversionError> {
    if raw.eq_ignore_ascii_case("true") {
        Ok(Value::Bool(true))
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(Value::Bool(false))
    } else {
        Err(ConversionError::expected("true or false", raw))
    }
}
