mod common;

use common::Example;
use synapse_core::{NetworkError, NodeKind};

fn assert_invalid_rekey(err: NetworkError) {
    assert!(
        matches!(err, NetworkError::InvalidRekey { .. }),
        "expected InvalidRekey, got {err}"
    );
}

#[test]
fn rekey_topic_rewrites_links_and_moves_file() {
    let example = Example::new();
    example.make_note("foo", "# Foo\n");
    example.make_note("bar", "see [[foo]]\n");
    example.make_note("thought:baz", "[[foo]] and [[foo]] again\n");
    let network = example.network();

    let mut node = network.lookup("foo").unwrap();
    node.rekey("quux").unwrap();

    assert_eq!(node.key(), &"quux");
    assert!(!example.path().join("foo.md").exists());
    assert_eq!(example.read("quux.md"), "# Foo\n");
    assert_eq!(example.read("bar.md"), "see [[quux]]\n");
    assert_eq!(
        example.read("thought/baz.md"),
        "[[quux]] and [[quux]] again\n"
    );
    assert!(network.lookup("foo").unwrap_err().is_not_found());
}

#[test]
fn rekey_thought_keeps_unrelated_links() {
    let example = Example::new();
    example.make_note("thought:old", "[[bar]]\n");
    example.make_note("bar", "[[thought:old]]\n[[thought:older]]\n");
    example.make_note("thought:older", "[[bar]]\n");
    let network = example.network();

    let mut node = network.lookup_note("thought:old").unwrap();
    node.rekey("thought:new").unwrap();

    assert_eq!(node.kind(), NodeKind::Thought);
    assert_eq!(example.read("thought/new.md"), "[[bar]]\n");
    assert_eq!(example.read("bar.md"), "[[thought:new]]\n[[thought:older]]\n");
    assert!(network.check().unwrap().is_empty());
}

#[test]
fn rekey_may_change_between_note_kinds() {
    let example = Example::new();
    example.make_note("thought:idea", "[[bar]]\n");
    example.make_note("bar", "[[thought:idea]]\n");
    let network = example.network();

    let mut node = network.lookup("thought:idea").unwrap();
    node.rekey("idea").unwrap();

    assert_eq!(node.kind(), NodeKind::Topic);
    assert_eq!(node.path(), example.path().join("idea.md"));
    assert!(node.path().exists());
    assert_eq!(example.read("bar.md"), "[[idea]]\n");
}

#[test]
fn rekey_note_to_attachment_is_rejected() {
    let example = Example::new();
    example.make_note("foo", "body");
    example.make_note("bar", "[[foo]]");

    let mut node = example.network().lookup("foo").unwrap();
    assert_invalid_rekey(node.rekey("image:foo.png").unwrap_err());

    assert_eq!(node.key(), &"foo");
    assert_eq!(example.read("foo.md"), "body");
    assert_eq!(example.read("bar.md"), "[[foo]]");
}

#[test]
fn rekey_attachment_to_note_is_rejected() {
    let example = Example::new();
    example.make_image("foo.png");
    example.make_note("bar", "[[image:foo.png]]");

    let mut node = example.network().lookup("image:foo.png").unwrap();
    assert_invalid_rekey(node.rekey("foo").unwrap_err());
    assert_invalid_rekey(node.rekey("file:foo.png").unwrap_err());

    assert!(example.path().join("image/foo.png").exists());
    assert_eq!(example.read("bar.md"), "[[image:foo.png]]");
}

#[test]
fn rekey_to_nested_note_is_rejected() {
    let example = Example::new();
    example.make_note("thought:foo", "");

    let mut node = example.network().lookup("thought:foo").unwrap();
    assert_invalid_rekey(node.rekey("thought:a/b").unwrap_err());
    assert_invalid_rekey(node.rekey("video:foo").unwrap_err());
    assert!(example.path().join("thought/foo.md").exists());
}

#[test]
fn rekey_to_existing_key_is_rejected() {
    let example = Example::new();
    example.make_note("foo", "foo body");
    example.make_note("bar", "bar body");

    let mut node = example.network().lookup("foo").unwrap();
    let err = node.rekey("bar").unwrap_err();
    assert_invalid_rekey(err);

    assert_eq!(example.read("foo.md"), "foo body");
    assert_eq!(example.read("bar.md"), "bar body");
}

#[test]
fn rekey_image_creates_missing_directories() {
    let example = Example::new();
    example.make_image("foo.png");
    example.make_note("bar", "## :Images:\n- [[image:foo.png]]\n");
    let network = example.network();

    let mut node = network.lookup("image:foo.png").unwrap();
    node.rekey("image:a/b/c/bar.png").unwrap();

    assert!(example.path().join("image/a/b/c/bar.png").is_file());
    assert!(!example.path().join("image/foo.png").exists());
    assert_eq!(
        example.read("bar.md"),
        "## :Images:\n- [[image:a/b/c/bar.png]]\n"
    );
    assert_eq!(
        network.lookup("image:a/b/c/bar.png").unwrap(),
        node
    );
}

#[test]
fn rekey_to_same_key_is_a_no_op() {
    let example = Example::new();
    example.make_note("foo", "body");

    let mut node = example.network().lookup("foo").unwrap();
    node.rekey("foo").unwrap();

    assert_eq!(example.read("foo.md"), "body");
}

#[test]
fn rekey_of_deleted_node_is_not_found() {
    let example = Example::new();
    example.make_note("foo", "");
    let mut node = example.network().lookup("foo").unwrap();
    std::fs::remove_file(node.path()).unwrap();

    assert!(node.rekey("bar").unwrap_err().is_not_found());
}

#[test]
fn rekey_rewrites_links_spelled_with_colon_separators() {
    let example = Example::new();
    example.make_image("dir/foo.png");
    example.make_note("bar", "[[image:dir:foo.png]]\n");
    example.make_note("baz", "[[image:dir//foo.png]] and [[image:dir/foo.png]]\n");
    let network = example.network();

    let mut node = network.lookup("image:dir/foo.png").unwrap();
    assert_eq!(node.predecessors().unwrap().len(), 2);
    node.rekey("image:dir/baz.png").unwrap();

    assert_eq!(example.read("bar.md"), "[[image:dir/baz.png]]\n");
    assert_eq!(
        example.read("baz.md"),
        "[[image:dir/baz.png]] and [[image:dir/baz.png]]\n"
    );
    assert!(example.path().join("image/dir/baz.png").is_file());
    assert!(!network
        .check()
        .unwrap()
        .iter()
        .any(|failure| failure.starts_with("Link to nonexistant")));
}

#[test]
fn rekey_rewrites_note_links_spelled_with_md_suffix() {
    let example = Example::new();
    example.make_note("foo", "");
    example.make_note("bar", "[[foo.md]]\n[[foo]]\n");
    let network = example.network();

    network.lookup("foo").unwrap().rekey("quux").unwrap();

    assert_eq!(example.read("bar.md"), "[[quux]]\n[[quux]]\n");
}
