//! Registration, dispatch and completion entry points.
//!
//! A [`CommandManager`] owns one immutable [`ManagerState`] snapshot behind a
//! read-write lock. Dispatch and completion clone the snapshot `Arc` and work
//! without holding the lock, so handlers are free to register commands.
//! Registration builds a new snapshot and swaps it in; a failed registration
//! leaves the current one untouched.

use std::fmt;
use std::sync::Arc;

use cmdtree_foundation::{Error, ErrorKind, Result, Type};
use parking_lot::RwLock;
use tracing::{debug, error};

use crate::actor::Actor;
use crate::binder::{ArgumentBinder, BindError};
use crate::completion::{
    CompleterKey, CompletionError, CompletionRegistry, CompletionRequest, filter_prefix,
};
use crate::config::EngineConfig;
use crate::context::ExecutionContext;
use crate::definition::{CommandDefinition, HandlerError};
use crate::help::{self, Tooltip};
use crate::permission::PermissionDeclaration;
use crate::resolver::{ResolveError, Resolver};
use crate::suggest::CompletionEngine;
use crate::tokenizer::{InputTokenizer, TokenizeError};
use crate::transform::{ConversionError, Transform, TransformRegistry};
use crate::tree::{CommandNode, CommandTree};

/// Metadata about a registered family.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisteredFamily {
    /// Primary name.
    pub name: String,
    /// Aliases.
    pub aliases: Vec<String>,
    /// Message prefix for host output.
    pub prefix: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Permissions declared anywhere in the family.
    pub declarations: Vec<PermissionDeclaration>,
}

impl RegisteredFamily {
    fn from_node(node: &CommandNode) -> Self {
        Self {
            name: node.name().to_string(),
            aliases: node.aliases().iter().map(|a| a.to_string()).collect(),
            prefix: node.prefix().map(str::to_string),
            description: node.description().map(str::to_string),
            declarations: PermissionDeclaration::collect(node),
        }
    }
}

/// Result of dispatching one line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The handler ran and succeeded.
    Invoked {
        /// Path of the executed node.
        path: Vec<String>,
    },
    /// The line held no tokens.
    EmptyInput,
    /// The line could not be tokenized.
    InvalidInput(TokenizeError),
    /// No family matches the first token.
    NoSuchCommand {
        /// The first token.
        label: String,
    },
    /// The walk ended on a node that cannot take the remaining input.
    NoSuchSubcommand {
        /// Path to the node where the walk ended.
        path: Vec<String>,
        /// The unmatched token, if any.
        token: Option<String>,
        /// Children the actor may use.
        candidates: Vec<String>,
    },
    /// The actor lacks permission for a node.
    PermissionDenied {
        /// Path up to and including the denied node.
        path: Vec<String>,
    },
    /// The executor requires a live player.
    NotPlayable {
        /// Path of the node.
        path: Vec<String>,
    },
    /// Fewer arguments than required.
    TooFewArguments {
        /// Path of the node.
        path: Vec<String>,
        /// Usage line.
        usage: String,
        /// Required argument count.
        min: usize,
        /// Arguments supplied.
        given: usize,
    },
    /// More arguments than accepted.
    TooManyArguments {
        /// Path of the node.
        path: Vec<String>,
        /// Usage line.
        usage: String,
        /// Accepted argument count.
        max: usize,
        /// Arguments supplied.
        given: usize,
    },
    /// An argument failed conversion.
    ArgumentConversionFailed {
        /// Path of the node.
        path: Vec<String>,
        /// Usage line.
        usage: String,
        /// Parameter name.
        parameter: String,
        /// Offending token.
        raw: String,
        /// Conversion failure.
        cause: ConversionError,
    },
    /// A declared default failed conversion.
    Misconfigured {
        /// Path of the node.
        path: Vec<String>,
        /// Parameter name.
        parameter: String,
        /// Raw default text.
        raw: String,
        /// Conversion failure.
        cause: ConversionError,
    },
    /// An engine invariant was violated.
    InternalError {
        /// Path of the node.
        path: Vec<String>,
        /// Description.
        message: String,
    },
    /// The handler reported a failure.
    HandlerFailed {
        /// Path of the node.
        path: Vec<String>,
        /// The handler's error.
        error: HandlerError,
    },
}

impl DispatchOutcome {
    /// Returns true if the handler ran successfully.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Invoked { .. })
    }

    /// Returns true for failures caused by the actor's arguments.
    #[must_use]
    pub const fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::TooFewArguments { .. }
                | Self::TooManyArguments { .. }
                | Self::ArgumentConversionFailed { .. }
        )
    }

    /// Returns the node path the outcome refers to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&[String]> {
        match self {
            Self::Invoked { path }
            | Self::NoSuchSubcommand { path, .. }
            | Self::PermissionDenied { path }
            | Self::NotPlayable { path }
            | Self::TooFewArguments { path, .. }
            | Self::TooManyArguments { path, .. }
            | Self::ArgumentConversionFailed { path, .. }
            | Self::Misconfigured { path, .. }
            | Self::InternalError { path, .. }
            | Self::HandlerFailed { path, .. } => Some(path),
            Self::EmptyInput | Self::InvalidInput(_) | Self::NoSuchCommand { .. } => None,
        }
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invoked { path } => write!(f, "Ran /{}.", path.join(" ")),
            Self::EmptyInput => write!(f, "Type a command."),
            Self::InvalidInput(e) => write!(f, "Invalid input: {e}."),
            Self::NoSuchCommand { label } => write!(f, "Unknown command '{label}'."),
            Self::NoSuchSubcommand {
                path,
                token,
                candidates,
            } => {
                match token {
                    Some(token) => {
                        write!(f, "Unknown subcommand '{token}' for /{}.", path.join(" "))?;
                    }
                    None => write!(f, "/{} needs a subcommand.", path.join(" "))?,
                }
                if !candidates.is_empty() {
                    write!(f, " Try: {}", candidates.join(", "))?;
                }
                Ok(())
            }
            Self::PermissionDenied { path } => {
                write!(f, "You do not have permission to use /{}.", path.join(" "))
            }
            Self::NotPlayable { path } => {
                write!(f, "/{} can only be used by players.", path.join(" "))
            }
            Self::TooFewArguments {
                usage, min, given, ..
            } => write!(
                f,
                "Not enough arguments (expected at least {min}, got {given}). Usage: {usage}"
            ),
            Self::TooManyArguments {
                usage, max, given, ..
            } => write!(
                f,
                "Too many arguments (expected at most {max}, got {given}). Usage: {usage}"
            ),
            Self::ArgumentConversionFailed {
                usage,
                parameter,
                cause,
                ..
            } => write!(f, "Invalid <{parameter}>: {cause}. Usage: {usage}"),
            Self::Misconfigured {
                path,
                parameter,
                raw,
                cause,
            } => write!(
                f,
                "/{} is misconfigured: default '{raw}' for <{parameter}> is invalid ({cause}).",
                path.join(" ")
            ),
            Self::InternalError { path, message } => {
                write!(f, "Internal error in /{}: {message}", path.join(" "))
            }
            Self::HandlerFailed { error, .. } => write!(f, "{error}"),
        }
    }
}

impl From<ResolveError> for DispatchOutcome {
    fn from(error: ResolveError) -> Self {
        match error {
            ResolveError::NoSuchCommand { label } => Self::NoSuchCommand { label },
            ResolveError::NoSuchSubcommand {
                path,
                token,
                candidates,
            } => Self::NoSuchSubcommand {
                path,
                token,
                candidates,
            },
            ResolveError::PermissionDenied { path } => Self::PermissionDenied { path },
        }
    }
}

fn bind_outcome(error: BindError, path: Vec<String>, usage: String) -> DispatchOutcome {
    match error {
        BindError::TooFewArguments { min, given } => DispatchOutcome::TooFewArguments {
            path,
            usage,
            min,
            given,
        },
        BindError::TooManyArguments { max, given } => DispatchOutcome::TooManyArguments {
            path,
            usage,
            max,
            given,
        },
        BindError::ArgumentConversion {
            parameter,
            raw,
            cause,
        } => DispatchOutcome::ArgumentConversionFailed {
            path,
            usage,
            parameter,
            raw,
            cause,
        },
        BindError::MalformedDefault {
            parameter,
            raw,
            cause,
        } => DispatchOutcome::Misconfigured {
            path,
            parameter,
            raw,
            cause,
        },
        BindError::Internal(message) => DispatchOutcome::InternalError { path, message },
    }
}

/// An immutable snapshot of everything dispatch needs.
#[derive(Clone, Debug)]
pub struct ManagerState {
    tree: CommandTree,
    transforms: TransformRegistry,
    completers: CompletionRegistry,
    families: im::OrdMap<String, RegisteredFamily>,
}

impl Default for ManagerState {
    fn default() -> Self {
        Self {
            tree: CommandTree::new(),
            transforms: TransformRegistry::with_defaults(),
            completers: CompletionRegistry::with_defaults(),
            families: im::OrdMap::new(),
        }
    }
}

impl ManagerState {
    /// The command tree.
    #[must_use]
    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }

    /// The transform registry.
    #[must_use]
    pub fn transforms(&self) -> &TransformRegistry {
        &self.transforms
    }

    /// The completion registry.
    #[must_use]
    pub fn completers(&self) -> &CompletionRegistry {
        &self.completers
    }

    fn refresh_family(&mut self, label: &str) {
        if let Some(node) = self.tree.family(label) {
            let family = RegisteredFamily::from_node(node);
            self.families.insert(family.name.to_lowercase(), family);
        }
    }
}

/// Owns the command tree and registries and runs dispatch and completion.
///
/// # Example
///
/// ```
/// use cmdtree_engine::{CommandDefinition, CommandManager, Parameter, SimpleActor};
/// use cmdtree_foundation::Type;
///
/// let manager = CommandManager::new();
/// manager
///     .register_family(
///         CommandDefinition::new("greet")
///             .parameter(Parameter::new("name", Type::String))
///             .executes(|ctx| {
///                 assert_eq!(ctx.string("name"), Some("alice"));
///                 Ok(())
///             }),
///     )
///     .unwrap();
///
/// let outcome = manager.dispatch(&SimpleActor::new("console"), "greet alice");
/// assert!(outcome.is_success());
/// ```
pub struct CommandManager {
    config: EngineConfig,
    tokenizer: InputTokenizer,
    state: RwLock<Arc<ManagerState>>,
}

impl Default for CommandManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CommandManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandManager")
            .field("config", &self.config)
            .field("state", &self.snapshot())
            .finish()
    }
}

impl CommandManager {
    /// Creates a manager with the default configuration and built-in
    /// transforms and completers.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Creates a manager with a configuration.
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            tokenizer: InputTokenizer::new(config.quotes.clone()),
            config,
            state: RwLock::new(Arc::new(ManagerState::default())),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<ManagerState> {
        Arc::clone(&self.state.read())
    }

    /// Applies `change` to a copy of the current state and publishes it.
    fn update<R>(&self, change: impl FnOnce(&mut ManagerState) -> Result<R>) -> Result<R> {
        let mut guard = self.state.write();
        let mut next = ManagerState::clone(&guard);
        let result = change(&mut next)?;
        *guard = Arc::new(next);
        Ok(result)
    }

    /// Like [`CommandManager::update`] for changes that cannot fail.
    fn update_with<R>(&self, change: impl FnOnce(&mut ManagerState) -> R) -> R {
        let mut guard = self.state.write();
        let mut next = ManagerState::clone(&guard);
        let result = change(&mut next);
        *guard = Arc::new(next);
        result
    }

    /// Registers a new command family.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the definition is invalid or its name
    /// or an alias is already taken by another family.
    pub fn register_family(&self, definition: CommandDefinition) -> Result<RegisteredFamily> {
        let family = self.update(|state| {
            state.tree = state
                .tree
                .register::<&str>(&[], &definition, &state.transforms)?;
            state.refresh_family(&definition.name);
            state
                .families
                .get(&definition.name.to_lowercase())
                .cloned()
                .ok_or_else(|| Error::new(ErrorKind::Internal("family vanished".into())))
        })?;
        debug!(family = %family.name, "family registered");
        Ok(family)
    }

    /// Registers a subcommand below an existing node.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::NoSuchPath`] if `parent_path` does not name a
    /// node, or any error [`CommandManager::register_family`] can return.
    pub fn register_subcommand<S: AsRef<str>>(
        &self,
        parent_path: &[S],
        definition: CommandDefinition,
    ) -> Result<()> {
        let Some(family) = parent_path.first() else {
            return Err(Error::no_such_path(&[]));
        };
        self.update(|state| {
            state.tree = state
                .tree
                .register(parent_path, &definition, &state.transforms)?;
            state.refresh_family(family.as_ref());
            Ok(())
        })
    }

    /// Removes a family.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::UnknownFamily`] if no family matches.
    pub fn unregister_family(&self, label: &str) -> Result<RegisteredFamily> {
        self.update(|state| {
            let (tree, removed) = state.tree.unregister(label)?;
            state.tree = tree;
            state
                .families
                .remove(&removed.name().to_lowercase())
                .ok_or_else(|| Error::new(ErrorKind::Internal("family metadata missing".into())))
        })
    }

    /// Registers a transform; the last registration for a type wins.
    ///
    /// Commands already registered keep working; their defaults are checked
    /// again only when they are used.
    pub fn register_transform(&self, value_type: Type, transform: Transform) {
        self.update_with(|state| {
            state.transforms.register(value_type, transform);
        });
    }

    /// Registers an enumeration type with a case-insensitive transform and a
    /// prefix-filtering completer.
    pub fn register_enum<I, S>(&self, name: &str, variants: I) -> Type
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let variants: Vec<String> = variants
            .into_iter()
            .map(|v| v.as_ref().to_string())
            .collect();
        self.update_with(|state| {
            let registered = state.transforms.register_enum(name, &variants);
            state.completers.register(
                registered.clone(),
                move |request: &CompletionRequest<'_>| Ok(filter_prefix(&variants, request.stem)),
            );
            registered
        })
    }

    /// Registers a completer.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::UnknownType`] for a type key with no registered
    /// transform.
    pub fn register_completer<F>(&self, key: impl Into<CompleterKey>, completer: F) -> Result<()>
    where
        F: Fn(&CompletionRequest<'_>) -> std::result::Result<Vec<String>, CompletionError>
            + Send
            + Sync
            + 'static,
    {
        let key = key.into();
        self.update(|state| {
            if let CompleterKey::Type(value_type) = &key {
                if !state.transforms.contains(value_type) {
                    return Err(Error::unknown_type(value_type.clone()));
                }
            }
            state.completers.register(key, completer);
            Ok(())
        })
    }

    /// Looks up a registered family by name or alias.
    #[must_use]
    pub fn family(&self, label: &str) -> Option<RegisteredFamily> {
        let state = self.snapshot();
        let node = state.tree.family(label)?;
        state.families.get(&node.name().to_lowercase()).cloned()
    }

    /// Returns all registered families, ordered by name.
    #[must_use]
    pub fn families(&self) -> Vec<RegisteredFamily> {
        self.snapshot().families.values().cloned().collect()
    }

    /// Renders the usage line for the node at `path`.
    #[must_use]
    pub fn usage<S: AsRef<str>>(&self, path: &[S]) -> Option<String> {
        let state = self.snapshot();
        let node = state.tree.node_at(path)?;
        let names = canonical_path(&state.tree, path)?;
        Some(help::usage(names.as_slice(), node.executor()))
    }

    /// Lists the executable commands of a family the actor may use.
    #[must_use]
    pub fn help(&self, actor: &dyn Actor, family: &str) -> Vec<Tooltip> {
        let state = self.snapshot();
        state
            .tree
            .family(family)
            .map(|node| help::tooltips(actor, node))
            .unwrap_or_default()
    }

    /// Dispatches one line of actor input.
    pub fn dispatch(&self, actor: &dyn Actor, line: &str) -> DispatchOutcome {
        let outcome = self.dispatch_inner(actor, line);
        debug!(actor = actor.name(), line, ?outcome, "dispatched");
        outcome
    }

    fn dispatch_inner(&self, actor: &dyn Actor, line: &str) -> DispatchOutcome {
        let tokens = match self.tokenizer.tokenize(line) {
            Ok(tokens) if tokens.is_empty() => return DispatchOutcome::EmptyInput,
            Ok(tokens) => tokens,
            Err(e) => return DispatchOutcome::InvalidInput(e),
        };

        let state = self.snapshot();
        let target = match Resolver::resolve(&state.tree, actor, &tokens) {
            Ok(target) => target,
            Err(e) => return e.into(),
        };
        let path = target.walk.path();
        let executor = target.executor;

        if executor.playable_only() && !actor.is_player() {
            return DispatchOutcome::NotPlayable { path };
        }

        let arguments = &tokens[target.walk.consumed..];
        let binder = ArgumentBinder::new(&state.transforms, &self.config.vararg_separator);
        let values = match binder.bind(executor, arguments) {
            Ok(values) => values,
            Err(e) => {
                if let BindError::Internal(message) = &e {
                    error!(path = %path.join(" "), %message, "binding invariant violated");
                }
                let usage = help::usage(path.as_slice(), Some(executor));
                return bind_outcome(e, path, usage);
            }
        };

        let family = target.walk.chain[0];
        let context = ExecutionContext::new(
            actor,
            path.clone(),
            tokens[0].text.clone(),
            executor.parameters(),
            values,
        )
        .with_prefix(family.prefix().unwrap_or_default());

        match executor.invoke(&context) {
            Ok(()) => DispatchOutcome::Invoked { path },
            Err(error) => DispatchOutcome::HandlerFailed { path, error },
        }
    }

    /// Returns completion candidates for a partially typed line.
    #[must_use]
    pub fn complete(&self, actor: &dyn Actor, line: &str) -> Vec<String> {
        let state = self.snapshot();
        CompletionEngine::new(&state.tree, &state.transforms, &state.completers, &self.config)
            .complete(actor, line)
    }
}

/// Maps a path of names or aliases to canonical names.
fn canonical_path<S: AsRef<str>>(tree: &CommandTree, path: &[S]) -> Option<Vec<String>> {
    let mut node: &CommandNode = tree.root();
    let mut names = Vec::with_capacity(path.len());
    for segment in path {
        node = node.find_child(segment.as_ref())?;
        names.push(node.name().to_string());
    }
    Some(names)
}
