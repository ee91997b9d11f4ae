//! Integration tests for argument binding.
//!
//! Tests for arity, defaults, conversion and varargs.

mod arity;
mod conversion;

use std::sync::Arc;

use cmdtree::engine::{
    ArgumentBinder, BindError, ExecutionContext, Executor, HandlerResult, Parameter,
    TransformRegistry,
};
use cmdtree::foundation::Value;

/// Builds an executor with a no-op handler.
pub fn executor(parameters: Vec<Parameter>) -> Executor {
    let handler = Arc::new(|_: &ExecutionContext<'_>| -> HandlerResult { Ok(()) });
    Executor::new(parameters, handler, false)
}

/// Binds `tokens` against `parameters` with the default transforms.
pub fn bind(parameters: Vec<Parameter>, tokens: &[&str]) -> Result<Vec<Value>, BindError> {
    let transforms = TransformRegistry::with_defaults();
    ArgumentBinder::new(&transforms, " ").bind(&executor(parameters), tokens)
}
