//! Core values, type tags, and configuration errors for cmdtree.
//!
//! This crate provides:
//! - [`Value`] - Typed argument values produced by transforms
//! - [`Type`] - Type tags used to select transforms and completers
//! - [`Error`] - Configuration errors raised at registration time

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod types;
pub mod value;

pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use types::Type;
pub use value::{CustomValue, Value};
