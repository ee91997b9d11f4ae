//! Live registration through the manager.

use std::sync::Arc;

use cmdtree::engine::{
    CommandDefinition, CompleterKey, CompletionRequest, DispatchOutcome, PermissionDefault,
    SimpleActor,
};
use cmdtree::foundation::{ErrorKind, Type};

use crate::{Recorder, admin, path, sample_manager};

#[test]
fn subcommand_registered_after_family() {
    let recorder = Recorder::default();
    let manager = sample_manager(&recorder);

    manager
        .register_subcommand(&["sp", "user"], CommandDefinition::new("list").executes(recorder.handler()))
        .unwrap();
    assert!(manager.dispatch(&admin(), "sample user list").is_success());
    assert_eq!(recorder.calls()[0].0, path(&["sample", "user", "list"]));
}

#[test]
fn subcommand_under_missing_parent() {
    let recorder = Recorder::default();
    let manager = sample_manager(&recorder);

    let err = manager
        .register_subcommand(&["sample", "group"], CommandDefinition::new("x").executes(|_| Ok(())))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NoSuchPath(_)));

    let err = manager
        .register_subcommand::<&str>(&[], CommandDefinition::new("x").executes(|_| Ok(())))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NoSuchPath(_)));
}

#[test]
fn failed_registration_keeps_the_snapshot() {
    let recorder = Recorder::default();
    let manager = sample_manager(&recorder);
    let before = manager.snapshot();

    let err = manager
        .register_family(CommandDefinition::new("SAMPLE").executes(|_| Ok(())))
        .unwrap_err();
    assert!(err.is_duplicate_name());
    assert!(Arc::ptr_eq(&before, &manager.snapshot()));
    assert!(manager.dispatch(&admin(), "sample hello").is_success());
}

#[test]
fn unregistered_family_is_gone() {
    let recorder = Recorder::default();
    let manager = sample_manager(&recorder);

    let removed = manager.unregister_family("sp").unwrap();
    assert_eq!(removed.name, "sample");
    assert!(manager.family("sample").is_none());
    assert!(manager.families().is_empty());
    assert_eq!(
        manager.dispatch(&admin(), "sample hello"),
        DispatchOutcome::NoSuchCommand {
            label: "sample".into()
        }
    );
    assert!(matches!(
        manager.unregister_family("sample").unwrap_err().kind,
        ErrorKind::UnknownFamily(_)
    ));
}

#[test]
fn family_metadata_and_declarations() {
    let recorder = Recorder::default();
    let manager = sample_manager(&recorder);
    manager
        .register_family(
            CommandDefinition::new("admin")
                .permission("admin")
                .permission_default(PermissionDefault::OpOnly)
                .description("Administration")
                .executes(|_| Ok(())),
        )
        .unwrap();

    let names: Vec<String> = manager.families().into_iter().map(|f| f.name).collect();
    assert_eq!(names, ["admin", "sample"]);

    let sample = manager.family("SP").unwrap();
    assert_eq!(sample.aliases, ["sp"]);
    assert_eq!(sample.prefix.as_deref(), Some("[Sample] "));
    let permissions: Vec<&str> = sample
        .declarations
        .iter()
        .map(|d| d.permission.as_str())
        .collect();
    for permission in crate::ALL {
        assert!(permissions.contains(&permission), "{permission}");
    }

    let admin_family = manager.family("admin").unwrap();
    assert_eq!(admin_family.description.as_deref(), Some("Administration"));
    assert_eq!(
        admin_family.declarations[0].default,
        Some(PermissionDefault::OpOnly)
    );
}

#[test]
fn usage_and_help() {
    let recorder = Recorder::default();
    let manager = sample_manager(&recorder);

    assert_eq!(
        manager.usage(&["sp", "u", "a"]).as_deref(),
        Some("/sample user add <username> [password]")
    );
    assert_eq!(
        manager.usage(&["sample", "tell"]).as_deref(),
        Some("/sample tell <target> [msgs...]")
    );
    assert_eq!(manager.usage(&["sample", "nbt"]).as_deref(), Some("/sample nbt"));
    assert_eq!(manager.usage(&["sample", "nope"]), None);

    let guest = SimpleActor::new("guest").with_permissions(["sample", "sample.hello"]);
    let usages: Vec<String> = manager
        .help(&guest, "sample")
        .into_iter()
        .map(|tip| tip.usage)
        .collect();
    assert_eq!(
        usages,
        [
            "/sample",
            "/sample hello",
            "/sample tell <target> [msgs...]",
            "/sample shout <text...>",
            "/sample fly [speed]",
        ]
    );
    assert!(manager.help(&guest, "nope").is_empty());
}

#[test]
fn completer_for_unknown_type_is_rejected() {
    let recorder = Recorder::default();
    let manager = sample_manager(&recorder);

    let err = manager
        .register_completer(Type::named("player"), |_: &CompletionRequest<'_>| Ok(vec![]))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownType(_)));

    assert!(manager
        .register_completer(CompleterKey::named("anything"), |_: &CompletionRequest<'_>| {
            Ok(vec![])
        })
        .is_ok());
}
