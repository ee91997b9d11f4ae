//! Child lookup and display order.

use cmdtree::engine::{CommandTree, TransformRegistry};

use crate::sample;

fn tree() -> CommandTree {
    CommandTree::new()
        .register::<&str>(&[], &sample(), &TransformRegistry::with_defaults())
        .unwrap()
}

#[test]
fn family_by_name_or_alias() {
    let tree = tree();
    assert_eq!(tree.family("sample").unwrap().name(), "sample");
    assert_eq!(tree.family("SP").unwrap().name(), "sample");
    assert!(tree.family("nope").is_none());
}

#[test]
fn find_child_by_alias_ignoring_case() {
    let tree = tree();
    let family = tree.family("sample").unwrap();
    assert_eq!(family.find_child("NH").unwrap().name(), "hello");
    assert_eq!(family.find_child("u").unwrap().name(), "user");
    assert_eq!(family.find_child("User").unwrap().name(), "user");
    assert!(family.find_child("").is_none());
}

#[test]
fn node_at_follows_aliases() {
    let tree = tree();
    let node = tree.node_at(&["sp", "u", "tj"]).unwrap();
    assert_eq!(node.name(), "add");
    assert_eq!(node.executor().unwrap().parameters().len(), 2);
    assert!(tree.node_at(&["sample", "user", "list"]).is_none());
}

#[test]
fn sort_keys_first_then_declaration_order() {
    let tree = tree();
    let family = tree.family("sample").unwrap();
    let names: Vec<&str> = family.children_sorted().into_iter().map(|c| c.name()).collect();
    assert_eq!(names, ["help", "hello", "tell", "user", "misc"]);
}

#[test]
fn declaration_order_without_sort_keys() {
    let tree = tree();
    let user = tree.node_at(&["sample", "user"]).unwrap();
    let names: Vec<&str> = user.children_sorted().into_iter().map(|c| c.name()).collect();
    assert_eq!(names, ["add", "remove"]);
}

#[test]
fn leaf_and_branch_shapes() {
    let tree = tree();
    let user = tree.node_at(&["sample", "user"]).unwrap();
    assert!(user.has_children());
    assert!(user.executor().is_some());
    assert!(!user.is_leaf());
    assert!(tree.node_at(&["sample", "hello"]).unwrap().is_leaf());
}

#[test]
fn executor_arity() {
    let tree = tree();
    let add = tree.node_at(&["sample", "user", "add"]).unwrap().executor().unwrap();
    assert_eq!(add.min_required(), 1);
    assert_eq!(add.max(), Some(2));

    let tell = tree.node_at(&["sample", "tell"]).unwrap().executor().unwrap();
    assert_eq!(tell.min_required(), 1);
    assert_eq!(tell.max(), None);
    assert!(tell.has_vararg());
}
