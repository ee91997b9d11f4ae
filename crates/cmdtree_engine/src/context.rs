//! Per-invocation execution context.

use cmdtree_foundation::Value;

use crate::actor::Actor;
use crate::definition::Parameter;

/// What a handler sees when it runs.
///
/// Owned by a single dispatch call and dropped when the handler returns.
pub struct ExecutionContext<'a> {
    actor: &'a dyn Actor,
    path: Vec<String>,
    label: String,
    parameters: &'a [Parameter],
    arguments: Vec<Value>,
    prefix: &'a str,
}

impl<'a> ExecutionContext<'a> {
    /// Creates a context for one invocation.
    ///
    /// `arguments` holds one value per parameter, in declaration order.
    #[must_use]
    pub fn new(
        actor: &'a dyn Actor,
        path: Vec<String>,
        label: impl Into<String>,
        parameters: &'a [Parameter],
        arguments: Vec<Value>,
    ) -> Self {
        Self {
            actor,
            path,
            label: label.into(),
            parameters,
            arguments,
            prefix: "",
        }
    }

    /// Sets the family message prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: &'a str) -> Self {
        self.prefix = prefix;
        self
    }

    /// The actor that issued the command.
    #[must_use]
    pub fn actor(&self) -> &'a dyn Actor {
        self.actor
    }

    /// Canonical names from the family root to the executed node.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// The family label as the actor typed it (name or alias).
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The family message prefix, or an empty string.
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.prefix
    }

    /// All bound arguments in declaration order.
    #[must_use]
    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    /// Argument by position.
    #[must_use]
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.arguments.get(index)
    }

    /// Argument by parameter name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.parameters
            .iter()
            .position(|p| p.name == name)
            .and_then(|index| self.arguments.get(index))
    }

    /// String argument by parameter name.
    #[must_use]
    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Integer argument by parameter name.
    #[must_use]
    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    /// Boolean argument by parameter name.
    #[must_use]
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// List argument (a sequence vararg) by parameter name.
    #[must_use]
    pub fn list(&self, name: &str) -> Option<&[Value]> {
        self.get(name).and_then(Value::as_list)
    }

    /// Message text prefixed with the family prefix.
    #[must_use]
    pub fn prefixed(&self, text: &str) -> String {
        format!("{}{text}", self.prefix)
    }
}
