//! Integration tests for the command tree.
//!
//! Tests for registration, validation, lookup and ordering.

mod lookup;
mod registration;

use cmdtree::engine::{CommandDefinition, Parameter};
use cmdtree::foundation::Type;

/// A leaf command with a no-op handler.
pub fn leaf(name: &str) -> CommandDefinition {
    CommandDefinition::new(name).executes(|_| Ok(()))
}

/// The demo family shape used across the tree tests.
pub fn sample() -> CommandDefinition {
    CommandDefinition::new("sample")
        .alias("sp")
        .executes(|_| Ok(()))
        .child(leaf("help").sorted(1))
        .child(leaf("hello").alias("hi").alias("nh").sorted(2))
        .child(
            CommandDefinition::new("user")
                .alias("u")
                .sorted(4)
                .executes(|_| Ok(()))
                .child(
                    leaf("add")
                        .alias("a")
                        .alias("tj")
                        .parameter(Parameter::new("username", Type::String))
                        .parameter(Parameter::new("password", Type::String).or_default("123456")),
                )
                .child(
                    leaf("remove")
                        .alias("r")
                        .alias("yc")
                        .parameter(Parameter::new("username", Type::String)),
                ),
        )
        .child(leaf("misc"))
        .child(
            leaf("tell")
                .sorted(3)
                .parameter(Parameter::new("target", Type::String))
                .parameter(Parameter::new("msgs", Type::String).vararg().or_default("hi~")),
        )
}
