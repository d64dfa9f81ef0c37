use std::cmp::Ordering;

use firestore_local_rs::model::{DocumentKey, ResourcePath};

fn resource_path(path: &str) -> ResourcePath {
    ResourcePath::from_segments(path.split('/').filter(|segment| !segment.is_empty()))
}

#[test]
fn indexes_into_segments() {
    let path = ResourcePath::from_segments(["rooms", "Eros", "messages"]);
    assert_eq!(path.segment(0), Some("rooms"));
    assert_eq!(path.segment(1), Some("Eros"));
    assert_eq!(path.segment(2), Some("messages"));
    assert_eq!(path.segment(3), None);
}

#[test]
fn pop_first_repeatedly() {
    let path = ResourcePath::from_segments(["rooms", "Eros", "messages"]);

    assert_eq!(path.pop_first(), ResourcePath::from_segments(["Eros", "messages"]));
    assert_eq!(path.pop_first().pop_first(), ResourcePath::from_segments(["messages"]));
    assert!(path.pop_first().pop_first().pop_first().is_empty());
    assert_eq!(path.pop_first_n(0), path);
    assert_eq!(path.pop_first_n(2), ResourcePath::from_segments(["messages"]));
    assert!(path.pop_first_n(3).is_empty());
    assert_eq!(path, ResourcePath::from_segments(["rooms", "Eros", "messages"]));
}

#[test]
fn pop_last_repeatedly() {
    let path = ResourcePath::from_segments(["rooms", "Eros", "messages"]);
    assert_eq!(path.without_last(), ResourcePath::from_segments(["rooms", "Eros"]));
    assert_eq!(path.without_last().without_last(), ResourcePath::from_segments(["rooms"]));
    assert!(path.without_last().without_last().without_last().is_empty());
    assert_eq!(ResourcePath::root().pop_last(), None);
    assert_eq!(path.last_segment(), Some("messages"));
}

#[test]
fn creates_child_path() {
    let base = resource_path("rooms");
    assert_eq!(base.child(["eros"]), resource_path("rooms/eros"));
    assert_eq!(base.child(["eros"]).child(["1"]), resource_path("rooms/eros/1"));
    assert_eq!(base, resource_path("rooms"));
}

#[test]
fn parses_slash_separated_strings() {
    assert_eq!(
        ResourcePath::from_string("/rooms/eros/").unwrap(),
        resource_path("rooms/eros")
    );
    assert!(ResourcePath::from_string("rooms//eros").is_err());
    assert_eq!(resource_path("rooms/eros").canonical_string(), "rooms/eros");
}

#[test]
fn compares_correctly() {
    fn expect_less(a: &[&str], b: &[&str]) {
        let a = ResourcePath::from_segments(a.iter().copied());
        let b = ResourcePath::from_segments(b.iter().copied());
        assert_eq!(a.cmp(&b), Ordering::Less);
        assert_eq!(b.cmp(&a), Ordering::Greater);
    }

    assert_eq!(resource_path("a/b/c").cmp(&resource_path("a/b/c")), Ordering::Equal);
    assert_eq!(ResourcePath::root().cmp(&ResourcePath::root()), Ordering::Equal);

    expect_less(&[], &["a"]);
    expect_less(&["a"], &["b"]);
    expect_less(&["a"], &["a", "b"]);
    expect_less(&["a", "z"], &["b"]);
}

#[test]
fn compares_segments_by_utf16_code_units() {
    // U+FFFD is a single code unit; U+1F600 starts with a surrogate below it.
    expect_ordered("\u{1F600}", "\u{FFFD}");
    expect_ordered("a", "\u{1F600}");

    fn expect_ordered(a: &str, b: &str) {
        assert_eq!(
            ResourcePath::from_segments([a]).cmp(&ResourcePath::from_segments([b])),
            Ordering::Less
        );
    }
}

#[test]
fn determines_prefix() {
    let empty = ResourcePath::root();
    let a = resource_path("a");
    let ab = resource_path("a/b");
    let abc = resource_path("a/b/c");
    let ba = resource_path("b/a");

    assert!(empty.is_prefix_of(&empty));
    assert!(empty.is_prefix_of(&abc));

    assert!(a.is_prefix_of(&a));
    assert!(a.is_prefix_of(&abc));
    assert!(!a.is_prefix_of(&empty));
    assert!(!a.is_prefix_of(&ba));

    assert!(!ab.is_prefix_of(&a));
    assert!(ab.is_prefix_of(&abc));

    assert!(!abc.is_prefix_of(&ab));
    assert!(abc.is_prefix_of(&abc));
}

#[test]
fn determines_immediate_parent() {
    assert!(resource_path("rooms").is_immediate_parent_of(&resource_path("rooms/eros")));
    assert!(!resource_path("rooms").is_immediate_parent_of(&resource_path("rooms/eros/messages")));
    assert!(!resource_path("rooms").is_immediate_parent_of(&resource_path("rooms")));
}

#[test]
fn document_keys_need_even_paths() {
    let key = DocumentKey::from_string("rooms/eros/messages/1").unwrap();
    assert_eq!(key.collection_group(), "messages");
    assert_eq!(key.collection_path(), resource_path("rooms/eros/messages"));
    assert!(DocumentKey::from_string("rooms/eros/messages").is_err());
}
