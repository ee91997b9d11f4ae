//! Built-in and custom transforms.

use cmdtree::engine::{
    ArgumentBinder, BindError, ConversionError, Parameter, Transform, TransformRegistry,
};
use cmdtree::foundation::{Type, Value};

use crate::{bind, executor};

#[test]
fn builtin_types() {
    let values = bind(
        vec![
            Parameter::new("b", Type::Bool),
            Parameter::new("i", Type::Int),
            Parameter::new("f", Type::Float),
            Parameter::new("s", Type::String),
        ],
        &["TRUE", "-7", "2.5", "x"],
    )
    .unwrap();
    assert_eq!(
        values,
        [
            Value::Bool(true),
            Value::Int(-7),
            Value::Float(2.5),
            Value::string("x")
        ]
    );
}

#[test]
fn first_failure_names_the_parameter() {
    let err = bind(
        vec![Parameter::new("a", Type::Int), Parameter::new("b", Type::Int)],
        &["1", "two"],
    )
    .unwrap_err();
    match err {
        BindError::ArgumentConversion { parameter, raw, .. } => {
            assert_eq!(parameter, "b");
            assert_eq!(raw, "two");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn custom_transform_and_enum() {
    let mut transforms = TransformRegistry::with_defaults();
    let even = Type::named("even");
    transforms.register(
        even.clone(),
        Transform::new(|raw| {
            let n: i64 = raw
                .parse()
                .map_err(|_| ConversionError::expected("an integer", raw))?;
            if n % 2 == 0 {
                Ok(Value::Int(n))
            } else {
                Err(ConversionError::new(format!("{n} is odd")))
            }
        }),
    );
    let nbt = transforms.register_enum("nbt-type", ["BYTE", "INT", "LONG"]);

    let executor = executor(vec![Parameter::new("n", even), Parameter::new("t", nbt)]);
    let binder = ArgumentBinder::new(&transforms, " ");

    let values = binder.bind(&executor, &["4", "int"]).unwrap();
    assert_eq!(values[0], Value::Int(4));
    assert_eq!(values[1].as_variant(), Some("INT"));

    let err = binder.bind(&executor, &["3", "int"]).unwrap_err();
    assert!(err.to_string().contains("3 is odd"), "{err}");

    let err = binder.bind(&executor, &["2", "short"]).unwrap_err();
    assert!(matches!(err, BindError::ArgumentConversion { ref parameter, .. } if parameter == "t"));
}

#[test]
fn missing_transform_is_internal() {
    let executor = executor(vec![Parameter::new("p", Type::named("player"))]);
    let transforms = TransformRegistry::with_defaults();
    let err = ArgumentBinder::new(&transforms, " ")
        .bind(&executor, &["steve"])
        .unwrap_err();
    assert!(matches!(err, BindError::Internal(_)));
}
