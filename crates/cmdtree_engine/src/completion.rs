//! Completer registry.
//!
//! Completers suggest values for a parameter position. They are keyed either
//! by a parameter [`Type`] or by a name a parameter opts into, and the named
//! completer takes precedence when both exist.

use std::fmt;
use std::sync::Arc;

use cmdtree_foundation::{Type, Value};
use thiserror::Error;
use tracing::debug;

use crate::actor::Actor;
use crate::definition::Parameter;

/// Key under which a completer is registered.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CompleterKey {
    /// Completer for every parameter of a type.
    Type(Type),
    /// Completer a parameter selects by name.
    Named(Arc<str>),
}

impl CompleterKey {
    /// Creates a named key.
    #[must_use]
    pub fn named(name: impl AsRef<str>) -> Self {
        Self::Named(Arc::from(name.as_ref()))
    }
}

impl From<Type> for CompleterKey {
    fn from(value_type: Type) -> Self {
        Self::Type(value_type)
    }
}

impl fmt::Display for CompleterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(t) => write!(f, "type {t}"),
            Self::Named(name) => write!(f, "@{name}"),
        }
    }
}

/// A completer failure. Completion degrades to no candidates.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct CompletionError(pub String);

impl CompletionError {
    /// Creates a completion error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// An argument already typed before the position being completed.
#[derive(Clone, Debug, PartialEq)]
pub struct PriorArgument {
    /// Parameter the token binds to.
    pub parameter: String,
    /// Raw token text.
    pub raw: String,
    /// Converted value, if the token converts cleanly.
    pub value: Option<Value>,
}

/// Everything a completer gets to look at.
pub struct CompletionRequest<'a> {
    /// The actor asking for completions.
    pub actor: &'a dyn Actor,
    /// The parameter being completed.
    pub parameter: &'a Parameter,
    /// Arguments typed so far, in order.
    pub prior: &'a [PriorArgument],
    /// The partial token being typed (may be empty).
    pub stem: &'a str,
}

impl CompletionRequest<'_> {
    /// Returns the prior argument bound to a parameter name.
    #[must_use]
    pub fn prior_for(&self, parameter: &str) -> Option<&PriorArgument> {
        self.prior.iter().find(|p| p.parameter == parameter)
    }
}

/// Completer function signature.
pub type CompleterFn =
    Arc<dyn Fn(&CompletionRequest<'_>) -> Result<Vec<String>, CompletionError> + Send + Sync>;

/// Registry of completers.
///
/// Cloning is O(1); the map is persistent.
#[derive(Clone, Default)]
pub struct CompletionRegistry {
    entries: im::HashMap<CompleterKey, CompleterFn>,
}

impl CompletionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in `bool` completer.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Type::Bool, |request: &CompletionRequest<'_>| {
            Ok(filter_prefix(["false", "true"], request.stem))
        });
        registry
    }

    /// Registers a completer; the last registration for a key wins.
    ///
    /// Returns true if an earlier completer was replaced.
    pub fn register<K, F>(&mut self, key: K, completer: F) -> bool
    where
        K: Into<CompleterKey>,
        F: Fn(&CompletionRequest<'_>) -> Result<Vec<String>, CompletionError>
            + Send
            + Sync
            + 'static,
    {
        self.register_shared(key.into(), Arc::new(completer))
    }

    /// Registers an already shared completer.
    pub fn register_shared(&mut self, key: CompleterKey, completer: CompleterFn) -> bool {
        debug!(%key, "completer registered");
        self.entries.insert(key, completer).is_some()
    }

    /// Looks up a completer by key.
    #[must_use]
    pub fn get(&self, key: &CompleterKey) -> Option<&CompleterFn> {
        self.entries.get(key)
    }

    /// Finds the completer for a parameter: its named completer if one is
    /// registered, otherwise the completer for its type.
    #[must_use]
    pub fn lookup(&self, parameter: &Parameter) -> Option<&CompleterFn> {
        parameter
            .completer
            .as_ref()
            .and_then(|name| self.entries.get(&CompleterKey::Named(Arc::clone(name))))
            .or_else(|| {
                self.entries
                    .get(&CompleterKey::Type(parameter.value_type.clone()))
            })
    }

    /// Returns the number of registered completers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no completers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for CompletionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

/// Keeps the candidates starting with `stem`, ignoring case.
pub fn filter_prefix<I, S>(candidates: I, stem: &str) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let stem = stem.to_lowercase();
    candidates
        .into_iter()
        .filter(|c| c.as_ref().to_lowercase().starts_with(&stem))
        .map(|c| c.as_ref().to_string())
        .collect()
}
