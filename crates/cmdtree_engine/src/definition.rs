//! Builder-authored command definitions.
//!
//! A [`CommandDefinition`] describes one node of a command family: its name,
//! aliases, permissions, parameters and handler, plus nested subcommands.
//! Definitions are plain data; they are validated and turned into tree nodes
//! when registered with a [`crate::CommandManager`].
//!
//! # Example
//!
//! ```
//! use cmdtree_engine::{CommandDefinition, Parameter};
//! use cmdtree_foundation::Type;
//!
//! let user = CommandDefinition::new("user")
//!     .alias("u")
//!     .permission("sample.user")
//!     .child(
//!         CommandDefinition::new("add")
//!             .parameter(Parameter::new("username", Type::String))
//!             .parameter(Parameter::new("password", Type::String).or_default("123456"))
//!             .executes(|_ctx| Ok(())),
//!     );
//! assert_eq!(user.children.len(), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use cmdtree_foundation::Type;
use thiserror::Error;

use crate::context::ExecutionContext;
use crate::permission::PermissionDefault;

/// Failure reported by a handler.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl HandlerError {
    /// Creates a handler error with a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

/// Result of running a handler.
pub type HandlerResult = Result<(), HandlerError>;

/// A command handler.
pub type Handler = Arc<dyn Fn(&ExecutionContext<'_>) -> HandlerResult + Send + Sync>;

/// A declared command parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name, used in usage text and context lookups.
    pub name: String,
    /// Type tag selecting the transform and completer.
    pub value_type: Type,
    /// Whether the parameter may be omitted.
    pub optional: bool,
    /// Raw default text, converted when the parameter is omitted.
    pub default_raw: Option<String>,
    /// Whether the parameter absorbs all remaining tokens.
    pub vararg: bool,
    /// Named completer overriding the type completer.
    pub completer: Option<Arc<str>>,
}

impl Parameter {
    /// Creates a required parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, value_type: Type) -> Self {
        Self {
            name: name.into(),
            value_type,
            optional: false,
            default_raw: None,
            vararg: false,
            completer: None,
        }
    }

    /// Marks the parameter optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Marks the parameter optional with a raw default.
    #[must_use]
    pub fn or_default(mut self, raw: impl Into<String>) -> Self {
        self.optional = true;
        self.default_raw = Some(raw.into());
        self
    }

    /// Marks the parameter as a vararg.
    #[must_use]
    pub fn vararg(mut self) -> Self {
        self.vararg = true;
        self
    }

    /// Uses a named completer for this parameter.
    #[must_use]
    pub fn with_completer(mut self, name: impl AsRef<str>) -> Self {
        self.completer = Some(Arc::from(name.as_ref()));
        self
    }
}

/// Definition of a command node and its subcommands.
#[derive(Clone)]
pub struct CommandDefinition {
    /// Primary name.
    pub name: String,
    /// Alternative names.
    pub aliases: Vec<String>,
    /// Permissions, any one of which admits the actor.
    pub permissions: Vec<String>,
    /// Advisory default for the declared permissions.
    pub permission_default: Option<PermissionDefault>,
    /// Explicit ordering key among siblings.
    pub sort_key: Option<i32>,
    /// Human-readable description.
    pub description: Option<String>,
    /// Whether the handler requires a live player.
    pub playable_only: bool,
    /// Message prefix used by hosts (family roots only).
    pub prefix: Option<String>,
    /// Parameters bound before the handler runs.
    pub parameters: Vec<Parameter>,
    /// Handler; a node with children may also have one.
    pub handler: Option<Handler>,
    /// Subcommands.
    pub children: Vec<CommandDefinition>,
}

impl CommandDefinition {
    /// Creates an empty definition.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            permissions: Vec::new(),
            permission_default: None,
            sort_key: None,
            description: None,
            playable_only: false,
            prefix: None,
            parameters: Vec::new(),
            handler: None,
            children: Vec::new(),
        }
    }

    /// Adds an alias.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Adds a permission.
    #[must_use]
    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.push(permission.into());
        self
    }

    /// Sets the advisory permission default.
    #[must_use]
    pub fn permission_default(mut self, default: PermissionDefault) -> Self {
        self.permission_default = Some(default);
        self
    }

    /// Sets the sort key.
    #[must_use]
    pub fn sorted(mut self, key: i32) -> Self {
        self.sort_key = Some(key);
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Restricts the handler to live players.
    #[must_use]
    pub fn playable(mut self) -> Self {
        self.playable_only = true;
        self
    }

    /// Sets the message prefix.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Appends a parameter.
    #[must_use]
    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Sets the handler from a closure.
    #[must_use]
    pub fn executes<F>(mut self, handler: F) -> Self
    where
        F: Fn(&ExecutionContext<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Sets a shared handler.
    #[must_use]
    pub fn handler(mut self, handler: Handler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Appends a subcommand.
    #[must_use]
    pub fn child(mut self, child: CommandDefinition) -> Self {
        self.children.push(child);
        self
    }
}

impl fmt::Debug for CommandDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDefinition")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("permissions", &self.permissions)
            .field("sort_key", &self.sort_key)
            .field("parameters", &self.parameters)
            .field("has_handler", &self.handler.is_some())
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}
