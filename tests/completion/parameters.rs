//! Completing parameter values.

use cmdtree::engine::{
    CommandDefinition, CompleterKey, CompletionError, CompletionRequest, Parameter, SimpleActor,
};
use cmdtree::foundation::Type;

use crate::{admin, manager};

#[test]
fn named_completer_output_is_returned_as_is() {
    let (manager, seen) = manager();
    assert_eq!(
        manager.complete(&admin(), "sample user add ali"),
        ["alice", "bob", "carol"]
    );
    assert_eq!(
        seen.lock().unwrap().clone(),
        Some(("ali".to_string(), Vec::new()))
    );
}

#[test]
fn second_parameter_without_completer() {
    let (manager, _) = manager();
    assert!(manager.complete(&admin(), "sample user add alice ").is_empty());
    assert!(manager.complete(&admin(), "sample user add alice pw ").is_empty());
}

#[test]
fn completer_sees_prior_arguments() {
    let (manager, seen) = manager();
    assert_eq!(
        manager.complete(&admin(), "sample toggle true b"),
        ["alice", "bob", "carol"]
    );
    assert_eq!(
        seen.lock().unwrap().clone(),
        Some(("b".to_string(), vec!["true".to_string()]))
    );
}

#[test]
fn builtin_bool_completer() {
    let (manager, _) = manager();
    assert_eq!(manager.complete(&admin(), "sample toggle "), ["false", "true"]);
    assert_eq!(manager.complete(&admin(), "sample toggle T"), ["true"]);
}

#[test]
fn enum_completer_repeats_for_varargs() {
    let (manager, _) = manager();
    assert_eq!(manager.complete(&admin(), "sample paint g"), ["green", "GREY"]);
    assert_eq!(manager.complete(&admin(), "sample paint red b"), ["blue"]);
}

#[test]
fn playable_parameters_only_for_players() {
    let (manager, _) = manager();
    assert!(manager.complete(&admin(), "sample fly ").is_empty());

    let player = SimpleActor::player("steve").with_permission("sample");
    assert_eq!(manager.complete(&player, "sample fly "), ["false", "true"]);
}

#[test]
fn branch_offers_child_names_and_aliases() {
    let (manager, _) = manager();
    assert_eq!(
        manager.complete(&admin(), "sample "),
        ["fly", "hello", "hi", "nh", "paint", "toggle", "u", "user"]
    );
}

#[test]
fn branch_with_parameters_offers_both() {
    let (manager, _) = manager();
    manager
        .register_subcommand(
            &["sample"],
            CommandDefinition::new("give")
                .parameter(Parameter::new("flag", Type::Bool))
                .executes(|_| Ok(()))
                .child(CommandDefinition::new("tool").executes(|_| Ok(()))),
        )
        .unwrap();
    assert_eq!(manager.complete(&admin(), "sample give t"), ["tool", "true"]);
}

#[test]
fn panicking_completer_gives_no_candidates() {
    let (manager, _) = manager();
    manager
        .register_completer(
            CompleterKey::named("broken"),
            |_: &CompletionRequest<'_>| -> Result<Vec<String>, CompletionError> {
                panic!("host completer bug")
            },
        )
        .unwrap();
    manager
        .register_family(
            CommandDefinition::new("warp")
                .parameter(Parameter::new("place", Type::String).with_completer("broken"))
                .executes(|_| Ok(())),
        )
        .unwrap();

    let actor = SimpleActor::new("console");
    assert!(manager.complete(&actor, "warp ho").is_empty());
    assert_eq!(manager.complete(&actor, "wa"), ["warp"]);
}
