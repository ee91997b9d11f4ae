//! Console host for cmdtree.
//!
//! This crate wires the engine to a terminal:
//! - [`settings`]: TOML configuration
//! - [`actor`]: the console actor and its permission resolution
//! - [`messenger`]: output to the console
//! - [`editor`]: line editing and tab completion
//! - [`console`]: the read-dispatch-report loop
//! - [`sample`]: the demo `sample` command family

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod actor;
pub mod console;
pub mod editor;
pub mod error;
pub mod messenger;
pub mod sample;
pub mod settings;

pub use actor::ConsoleActor;
pub use console::Console;
pub use editor::{LineEditor, ReadResult, RustylineEditor, ScriptedEditor};
pub use error::{Result, RuntimeError};
pub use messenger::ConsoleMessenger;
pub use sample::{SampleState, register_sample};
pub use settings::RuntimeConfig;
