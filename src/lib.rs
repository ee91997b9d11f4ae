//! cmdtree - declarative command dispatch for chat-typed commands
//!
//! This crate re-exports all layers of the cmdtree system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: cmdtree_runtime     Console host, config file, demo commands
//! Layer 1: cmdtree_engine      Tree, resolver, binder, completion, manager
//! Layer 0: cmdtree_foundation  Core types (Type, Value, Error)
//! ```

pub use cmdtree_engine as engine;
pub use cmdtree_foundation as foundation;
pub use cmdtree_runtime as runtime;
