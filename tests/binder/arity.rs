//! Argument counts and optional parameters.

use cmdtree::engine::{BindError, Parameter};
use cmdtree::foundation::{Type, Value};

use crate::bind;

fn add_parameters() -> Vec<Parameter> {
    vec![
        Parameter::new("username", Type::String),
        Parameter::new("password", Type::String).or_default("123456"),
    ]
}

#[test]
fn default_fills_missing_optional() {
    let values = bind(add_parameters(), &["alice"]).unwrap();
    assert_eq!(values, [Value::string("alice"), Value::string("123456")]);
}

#[test]
fn supplied_optional_overrides_default() {
    let values = bind(add_parameters(), &["alice", "secret"]).unwrap();
    assert_eq!(values, [Value::string("alice"), Value::string("secret")]);
}

#[test]
fn too_few() {
    assert_eq!(
        bind(add_parameters(), &[]),
        Err(BindError::TooFewArguments { min: 1, given: 0 })
    );
}

#[test]
fn too_many() {
    assert_eq!(
        bind(add_parameters(), &["a", "b", "c"]),
        Err(BindError::TooManyArguments { max: 2, given: 3 })
    );
}

#[test]
fn optional_without_default_is_nil() {
    let values = bind(
        vec![
            Parameter::new("n", Type::Int),
            Parameter::new("m", Type::Int).optional(),
        ],
        &["4"],
    )
    .unwrap();
    assert_eq!(values, [Value::Int(4), Value::Nil]);
}

#[test]
fn no_parameters_no_tokens() {
    assert_eq!(bind(vec![], &[]), Ok(vec![]));
    assert_eq!(
        bind(vec![], &["extra"]),
        Err(BindError::TooManyArguments { max: 0, given: 1 })
    );
}
