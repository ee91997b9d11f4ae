//! Registering and unregistering families and subcommands.

use cmdtree::engine::{CommandDefinition, CommandTree, TransformRegistry};
use cmdtree::foundation::ErrorKind;

use crate::{leaf, sample};

#[test]
fn register_returns_new_tree_and_keeps_old() {
    let transforms = TransformRegistry::with_defaults();
    let empty = CommandTree::new();
    let tree = empty.register::<&str>(&[], &sample(), &transforms).unwrap();

    assert!(empty.families().is_empty());
    assert_eq!(tree.families().len(), 1);
}

#[test]
fn register_subcommand_under_alias_path() {
    let transforms = TransformRegistry::with_defaults();
    let tree = CommandTree::new()
        .register::<&str>(&[], &sample(), &transforms)
        .unwrap()
        .register(&["sp", "u"], &leaf("list"), &transforms)
        .unwrap();

    let user = tree.node_at(&["sample", "user"]).unwrap();
    assert_eq!(user.find_child("list").unwrap().order(), 2);
}

#[test]
fn register_under_missing_path() {
    let transforms = TransformRegistry::with_defaults();
    let tree = CommandTree::new()
        .register::<&str>(&[], &sample(), &transforms)
        .unwrap();
    let err = tree
        .register(&["sample", "nope"], &leaf("x"), &transforms)
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NoSuchPath(ref p) if p == "sample nope"));
}

#[test]
fn duplicate_family_leaves_tree_unchanged() {
    let transforms = TransformRegistry::with_defaults();
    let tree = CommandTree::new()
        .register::<&str>(&[], &sample(), &transforms)
        .unwrap();

    let clash = CommandDefinition::new("other").alias("SP").executes(|_| Ok(()));
    let err = tree.register::<&str>(&[], &clash, &transforms).unwrap_err();

    assert!(err.is_duplicate_name());
    assert!(tree.family("other").is_none());
    assert_eq!(tree.families().len(), 1);
}

#[test]
fn duplicate_subcommand_alias() {
    let transforms = TransformRegistry::with_defaults();
    let tree = CommandTree::new()
        .register::<&str>(&[], &sample(), &transforms)
        .unwrap();

    let err = tree
        .register(&["sample"], &leaf("hola").alias("hi"), &transforms)
        .unwrap_err();
    match err.kind {
        ErrorKind::DuplicateName { name, existing } => {
            assert_eq!(name, "hi");
            assert_eq!(existing, "hello");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.context.unwrap().path, ["sample", "hola"]);
}

#[test]
fn unregister_by_alias() {
    let transforms = TransformRegistry::with_defaults();
    let tree = CommandTree::new()
        .register::<&str>(&[], &sample(), &transforms)
        .unwrap();

    let (after, removed) = tree.unregister("sp").unwrap();
    assert_eq!(removed.name(), "sample");
    assert!(after.family("sample").is_none());
    assert!(after.family("sp").is_none());
    assert!(tree.family("sample").is_some());

    // the name and alias are free again
    assert!(after.register::<&str>(&[], &sample(), &transforms).is_ok());
}

#[test]
fn unregister_unknown_family() {
    let err = CommandTree::new().unregister("sample").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownFamily(ref f) if f == "sample"));
}
