//! Configuration error types for cmdtree.
//!
//! These errors are raised while registering families, transforms and
//! completers. They are fatal to the registration call that produced them and
//! never leave a half-registered tree behind. Runtime failures (unknown
//! commands, bad arguments) are reported as dispatch outcomes instead.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::types::Type;

/// Result type for registration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main configuration error type.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a duplicate name error.
    #[must_use]
    pub fn duplicate_name(name: impl Into<String>, existing: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateName {
            name: name.into(),
            existing: existing.into(),
        })
    }

    /// Creates an unknown type error.
    #[must_use]
    pub fn unknown_type(value_type: Type) -> Self {
        Self::new(ErrorKind::UnknownType(value_type))
    }

    /// Creates a malformed default error.
    #[must_use]
    pub fn malformed_default(
        parameter: impl Into<String>,
        raw: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::MalformedDefault {
            parameter: parameter.into(),
            raw: raw.into(),
            reason: reason.into(),
        })
    }

    /// Creates an invalid name error.
    #[must_use]
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidName(name.into()))
    }

    /// Creates a missing path error.
    #[must_use]
    pub fn no_such_path(path: &[String]) -> Self {
        Self::new(ErrorKind::NoSuchPath(path.join(" ")))
    }

    /// Returns true if this is a duplicate name error.
    #[must_use]
    pub const fn is_duplicate_name(&self) -> bool {
        matches!(self.kind, ErrorKind::DuplicateName { .. })
    }
}

/// Categorized configuration error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A name or alias collides with a sibling's name or alias.
    #[error("duplicate command name '{name}' (already used by '{existing}')")]
    DuplicateName {
        /// The colliding name or alias.
        name: String,
        /// The sibling that already owns it.
        existing: String,
    },

    /// No transform is registered for a parameter's value type.
    #[error("no transform registered for type {0}")]
    UnknownType(Type),

    /// A vararg parameter is not the last parameter.
    #[error("vararg parameter '{0}' must be the last parameter")]
    VarargNotLast(String),

    /// A required parameter follows an optional one.
    #[error("required parameter '{required}' follows optional parameter '{optional}'")]
    OptionalBeforeRequired {
        /// The optional parameter declared first.
        optional: String,
        /// The required parameter declared after it.
        required: String,
    },

    /// A default value was declared on a required parameter.
    #[error("parameter '{0}' declares a default but is not optional")]
    DefaultOnRequired(String),

    /// A declared default value fails its own transform.
    #[error("default '{raw}' for parameter '{parameter}' is malformed: {reason}")]
    MalformedDefault {
        /// The parameter declaring the default.
        parameter: String,
        /// The raw default text.
        raw: String,
        /// Why the conversion failed.
        reason: String,
    },

    /// A command name or alias is empty or contains whitespace.
    #[error("invalid command name '{0}'")]
    InvalidName(String),

    /// A node has neither children nor an executor.
    #[error("command '{0}' has no subcommands and no executor")]
    EmptyBranch(String),

    /// A node declares parameters but no handler to receive them.
    #[error("command '{0}' declares parameters but no handler")]
    ParametersWithoutHandler(String),

    /// A registration path does not exist in the tree.
    #[error("no command at path '{0}'")]
    NoSuchPath(String),

    /// A family name is not registered.
    #[error("unknown command family '{0}'")]
    UnknownFamily(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where a configuration error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Command path from the family root to the failing node.
    pub path: Vec<String>,
    /// Parameter involved, if any.
    pub parameter: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the command path.
    #[must_use]
    pub fn with_path(mut self, path: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.path = path.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the parameter name.
    #[must_use]
    pub fn with_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.parameter = Some(parameter.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.path.is_empty() {
            write!(f, "in /{}", self.path.join(" "))?;
        }
        if let Some(parameter) = &self.parameter {
            write!(f, " <{parameter}>")?;
        }
        Ok(())
    }
}
