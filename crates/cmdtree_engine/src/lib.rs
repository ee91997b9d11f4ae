//! Command dispatch and parameter binding for chat-typed commands.
//!
//! This crate turns actor input like `/sample user add alice` into a typed
//! handler invocation, or into a structured failure the host can report.
//!
//! # Architecture
//!
//! ```text
//! "sample user add alice"
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   TOKENIZER     │  → ["sample", "user", "add", "alice"]
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ RESOLVER        │  → sample ▸ user ▸ add   (permission gate at every node)
//! │ (tree walk)     │
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ ARGUMENT        │  → [String("alice"), String("123456")]
//! │ BINDER          │     (transform registry, defaults, varargs)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ HANDLER         │  → DispatchOutcome::Invoked
//! └─────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`tokenizer`] - Convert raw input to tokens (quoted spans preserved)
//! - [`definition`] - Builder-authored command and parameter definitions
//! - [`tree`] - Persistent command tree with alias indexing and sort order
//! - [`transform`] - Type-keyed token conversion
//! - [`completion`] - Type- and name-keyed completers
//! - [`permission`] - Permission gate and declarations
//! - [`resolver`] - Tree walk from tokens to an executable node
//! - [`binder`] - Argument binding against a parameter list
//! - [`suggest`] - Completion engine for partial input
//! - [`dispatcher`] - Registration, dispatch and completion entry points
//! - [`context`] - Per-invocation execution context
//! - [`help`] - Usage and help rendering
//! - [`actor`] - Actor and messenger collaborator traits
//! - [`config`] - Engine configuration

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod actor;
pub mod binder;
pub mod completion;
pub mod config;
pub mod context;
pub mod definition;
pub mod dispatcher;
pub mod help;
pub mod permission;
pub mod resolver;
pub mod suggest;
pub mod tokenizer;
pub mod transform;
pub mod tree;

// Re-export main types for convenience
pub use actor::{Actor, Messenger, SimpleActor};
pub use binder::{ArgumentBinder, BindError};
pub use completion::{
    CompleterKey, CompletionError, CompletionRegistry, CompletionRequest, PriorArgument,
};
pub use config::EngineConfig;
pub use context::ExecutionContext;
pub use definition::{CommandDefinition, Handler, HandlerError, HandlerResult, Parameter};
pub use dispatcher::{CommandManager, DispatchOutcome, ManagerState, RegisteredFamily};
pub use help::Tooltip;
pub use permission::{PermissionDeclaration, PermissionDefault, PermissionGate};
pub use resolver::{ResolveError, Resolver};
pub use suggest::CompletionEngine;
pub use tokenizer::{InputToken, InputTokenizer, PartialLine, TokenizeError};
pub use transform::{ConversionError, Transform, TransformRegistry, VarargPolicy};
pub use tree::{CommandNode, CommandTree, Executor};
