//! Dispatch failures and their user-facing messages.

use cmdtree::engine::{
    CommandDefinition, CommandManager, ConversionError, DispatchOutcome, Parameter, SimpleActor,
    TokenizeError, Transform,
};
use cmdtree::foundation::{Type, Value};

use crate::{Recorder, admin, path, sample_manager};

#[test]
fn empty_and_blank_lines() {
    let recorder = Recorder::default();
    let manager = sample_manager(&recorder);
    assert_eq!(manager.dispatch(&admin(), ""), DispatchOutcome::EmptyInput);
    assert_eq!(manager.dispatch(&admin(), "  \t"), DispatchOutcome::EmptyInput);
}

#[test]
fn unterminated_quote() {
    let recorder = Recorder::default();
    let manager = sample_manager(&recorder);
    let outcome = manager.dispatch(&admin(), "sample tell bob \"hi");
    assert_eq!(
        outcome,
        DispatchOutcome::InvalidInput(TokenizeError::UnterminatedQuote {
            quote: '"',
            column: 17
        })
    );
    assert!(recorder.calls().is_empty());
}

#[test]
fn unknown_family() {
    let recorder = Recorder::default();
    let manager = sample_manager(&recorder);
    let outcome = manager.dispatch(&admin(), "nope arg");
    assert_eq!(
        outcome,
        DispatchOutcome::NoSuchCommand {
            label: "nope".into()
        }
    );
    assert_eq!(outcome.to_string(), "Unknown command 'nope'.");
    assert_eq!(outcome.path(), None);
}

#[test]
fn unknown_subcommand_lists_visible_children() {
    let recorder = Recorder::default();
    let manager = sample_manager(&recorder);

    let outcome = manager.dispatch(&admin(), "sample user list");
    assert_eq!(
        outcome,
        DispatchOutcome::NoSuchSubcommand {
            path: path(&["sample", "user"]),
            token: Some("list".into()),
            candidates: vec!["add".into(), "remove".into()],
        }
    );
    assert_eq!(
        outcome.to_string(),
        "Unknown subcommand 'list' for /sample user. Try: add, remove"
    );

    let limited =
        SimpleActor::new("guest").with_permissions(["sample", "sample.user", "sample.user.add"]);
    let outcome = manager.dispatch(&limited, "sample user list");
    assert!(matches!(
        outcome,
        DispatchOutcome::NoSuchSubcommand { ref candidates, .. } if candidates == &["add"]
    ));
}

#[test]
fn branch_without_executor_needs_a_subcommand() {
    let recorder = Recorder::default();
    let manager = sample_manager(&recorder);

    let outcome = manager.dispatch(&admin(), "sample nbt");
    assert_eq!(outcome.to_string(), "/sample nbt needs a subcommand. Try: type");
}

#[test]
fn permission_is_checked_at_every_node() {
    let recorder = Recorder::default();
    let manager = sample_manager(&recorder);

    let nobody = SimpleActor::new("guest");
    assert_eq!(
        manager.dispatch(&nobody, "sample hello"),
        DispatchOutcome::PermissionDenied {
            path: path(&["sample"])
        }
    );

    let no_add = SimpleActor::new("guest").with_permissions(["sample", "sample.user"]);
    let outcome = manager.dispatch(&no_add, "sample u a alice");
    assert_eq!(
        outcome,
        DispatchOutcome::PermissionDenied {
            path: path(&["sample", "user", "add"])
        }
    );
    assert_eq!(
        outcome.to_string(),
        "You do not have permission to use /sample user add."
    );
    assert!(recorder.calls().is_empty());
}

#[test]
fn permission_comes_before_argument_checks() {
    let recorder = Recorder::default();
    let manager = sample_manager(&recorder);

    let actor = SimpleActor::new("guest").with_permissions(["sample", "sample.nbt"]);
    let outcome = manager.dispatch(&actor, "sample nbt type not-a-type too many args");
    assert!(matches!(outcome, DispatchOutcome::PermissionDenied { .. }));
}

#[test]
fn console_cannot_run_playable_commands() {
    let recorder = Recorder::default();
    let manager = sample_manager(&recorder);

    let outcome = manager.dispatch(&admin(), "sample fly 3");
    assert_eq!(
        outcome,
        DispatchOutcome::NotPlayable {
            path: path(&["sample", "fly"])
        }
    );
    assert_eq!(outcome.to_string(), "/sample fly can only be used by players.");
}

#[test]
fn argument_count_errors_carry_usage() {
    let recorder = Recorder::default();
    let manager = sample_manager(&recorder);

    let outcome = manager.dispatch(&admin(), "sample user add");
    assert_eq!(
        outcome,
        DispatchOutcome::TooFewArguments {
            path: path(&["sample", "user", "add"]),
            usage: "/sample user add <username> [password]".into(),
            min: 1,
            given: 0,
        }
    );
    assert!(outcome.is_usage_error());
    assert_eq!(
        outcome.to_string(),
        "Not enough arguments (expected at least 1, got 0). Usage: /sample user add <username> [password]"
    );

    let outcome = manager.dispatch(&admin(), "sample u remove a b");
    assert!(matches!(
        outcome,
        DispatchOutcome::TooManyArguments { max: 1, given: 2, ref usage, .. }
            if usage == "/sample user remove <username>"
    ));
    assert!(recorder.calls().is_empty());
}

#[test]
fn conversion_failure_names_parameter() {
    let recorder = Recorder::default();
    let manager = sample_manager(&recorder);

    let outcome = manager.dispatch(&admin(), "sample nbt type short");
    match &outcome {
        DispatchOutcome::ArgumentConversionFailed {
            parameter, raw, usage, ..
        } => {
            assert_eq!(parameter, "type");
            assert_eq!(raw, "short");
            assert_eq!(usage, "/sample nbt type <type> [count]");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(
        outcome
            .to_string()
            .starts_with("Invalid <type>: expected one of BYTE, INT, LONG, COMPOUND")
    );

    let outcome = manager.dispatch(&admin(), "sample nbt type int lots");
    assert!(matches!(
        outcome,
        DispatchOutcome::ArgumentConversionFailed { ref parameter, .. } if parameter == "count"
    ));
    assert!(recorder.calls().is_empty());
}

#[test]
fn handler_errors_are_reported() {
    let manager = CommandManager::new();
    manager
        .register_family(
            CommandDefinition::new("fail")
                .executes(|_| Err("the world is not ready".into())),
        )
        .unwrap();

    let outcome = manager.dispatch(&SimpleActor::new("console"), "fail");
    assert!(matches!(outcome, DispatchOutcome::HandlerFailed { .. }));
    assert_eq!(outcome.to_string(), "the world is not ready");
}

#[test]
fn default_broken_by_later_transform_is_misconfigured() {
    let manager = CommandManager::new();
    let level = Type::named("level");
    manager.register_transform(
        level.clone(),
        Transform::new(|raw| {
            raw.parse::<i64>()
                .map(Value::Int)
                .map_err(|_| ConversionError::new("not a level"))
        }),
    );
    manager
        .register_family(
            CommandDefinition::new("game")
                .permission("game")
                .parameter(Parameter::new("level", level.clone()).or_default("5"))
                .executes(|_| Ok(())),
        )
        .unwrap();

    manager.register_transform(
        level,
        Transform::new(|raw| Err(ConversionError::new(format!("levels are closed, got '{raw}'")))),
    );

    let actor = SimpleActor::new("console").with_permission("game");
    let outcome = manager.dispatch(&actor, "game");
    assert!(matches!(
        outcome,
        DispatchOutcome::Misconfigured { ref parameter, ref raw, .. }
            if parameter == "level" && raw == "5"
    ));
    assert!(!outcome.is_usage_error());
}
