use metabag_core::{Metadata, Value};
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

/// Helper: the key set of a container.
fn key_set(metadata: &Metadata) -> BTreeSet<&str> {
    metadata.keys().collect()
}

/// Helper: a container built from a plain JSON object literal.
fn from_json(value: serde_json::Value) -> Metadata {
    match value {
        serde_json::Value::Object(map) => Metadata::from_native(map),
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// Helper: assert every view agrees on the container's size.
fn assert_cardinality(metadata: &Metadata) {
    assert_eq!(metadata.keys().count(), metadata.len());
    assert_eq!(metadata.values().count(), metadata.len());
    assert_eq!(metadata.iter().count(), metadata.len());
    assert_eq!(metadata.to_native().len(), metadata.len());
    assert_eq!(metadata.is_empty(), metadata.len() == 0);
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn empty_container_has_empty_views() {
    let metadata = Metadata::new();
    assert!(metadata.is_empty());
    assert!(metadata.to_native().is_empty());
    assert_eq!(metadata.keys().count(), 0);
    assert_eq!(metadata.values().count(), 0);
    assert_cardinality(&metadata);
}

#[test]
fn native_map_bridges_nested_structures() {
    let metadata = from_json(json!({
        "title": "Voyager",
        "duration": 42,
        "details": {"season": 3, "episode": 7},
        "tags": ["series", "cinema"],
        "isFeatured": true
    }));

    let native = metadata.to_native();
    assert_eq!(native["title"], json!("Voyager"));
    assert_eq!(native["duration"], json!(42));
    assert_eq!(native["details"]["season"], json!(3));
    assert_eq!(native["details"]["episode"], json!(7));
    assert_eq!(native["tags"], json!(["series", "cinema"]));
    assert_eq!(native["isFeatured"], json!(true));

    assert_eq!(
        key_set(&metadata),
        BTreeSet::from(["details", "duration", "isFeatured", "tags", "title"])
    );
    assert!(!metadata.is_empty());
    assert_cardinality(&metadata);
}

#[test]
fn collects_from_pairs() {
    let metadata: Metadata = vec![("role", "observer"), ("team", "core")].into_iter().collect();
    assert_eq!(metadata.get("role"), Some(&Value::from("observer")));
    assert_eq!(metadata.len(), 2);
}

// ============================================================================
// Mutation
// ============================================================================

#[test]
fn set_and_remove_reflect_through_views() {
    let mut metadata = from_json(json!({"role": "observer"}));

    metadata.set("role", Some(Value::from("author")));
    metadata.set("visits", Some(Value::Int(2)));

    let native = metadata.to_native();
    assert_eq!(native["role"], json!("author"));
    assert_eq!(native["visits"], json!(2));
    assert_eq!(key_set(&metadata), BTreeSet::from(["role", "visits"]));
    assert_cardinality(&metadata);

    metadata.set("role", None);
    assert!(!metadata.to_native().contains_key("role"));
    assert_eq!(key_set(&metadata), BTreeSet::from(["visits"]));
    assert_cardinality(&metadata);

    metadata.set("visits", None);
    assert!(metadata.to_native().is_empty());
    assert!(metadata.is_empty());
    assert_cardinality(&metadata);
}

#[test]
fn set_returns_previous_binding() {
    let mut metadata = Metadata::new();
    assert_eq!(metadata.set("count", Some(Value::Int(1))), None);
    assert_eq!(metadata.set("count", Some(Value::Int(2))), Some(Value::Int(1)));
    assert_eq!(metadata.remove("count"), Some(Value::Int(2)));
    assert_eq!(metadata.remove("count"), None);
}

#[test]
fn removing_absent_key_is_a_no_op() {
    let mut metadata = from_json(json!({"a": 1}));
    metadata.set("missing", None);
    assert_eq!(metadata.len(), 1);
    assert_cardinality(&metadata);
}

#[test]
fn rebinding_does_not_affect_earlier_copies() {
    let mut metadata = from_json(json!({"title": "Voyager"}));
    let snapshot = metadata.clone();
    metadata.insert("title", "Enterprise");
    assert_eq!(snapshot.get("title"), Some(&Value::from("Voyager")));
    assert_eq!(metadata.get("title"), Some(&Value::from("Enterprise")));
}

#[test]
fn cardinality_holds_across_mixed_operations() {
    let mut metadata = Metadata::new();
    for i in 0..20 {
        metadata.insert(format!("k{i}"), i);
        if i % 3 == 0 {
            metadata.remove(&format!("k{}", i / 2));
        }
        if i % 5 == 0 {
            metadata.set(format!("k{i}"), Some(Value::Null));
        }
        assert_cardinality(&metadata);
    }
}

// ============================================================================
// Null vs absence
// ============================================================================

#[test]
fn explicit_null_stays_present() {
    let mut metadata = Metadata::new();
    metadata.set("notes", Some(Value::Null));

    assert!(metadata.contains_key("notes"));
    let native = metadata.to_native();
    assert!(native.contains_key("notes"));
    assert!(native["notes"].is_null());
}

#[test]
fn removed_key_is_absent() {
    let mut metadata = Metadata::new();
    metadata.set("notes", Some(Value::Null));
    metadata.remove("notes");

    assert!(!metadata.contains_key("notes"));
    assert!(!metadata.to_native().contains_key("notes"));
}

#[test]
fn nested_nulls_surface_in_projection() {
    let mut metadata = Metadata::new();
    metadata.set("explicitNull", Some(Value::Null));
    metadata.insert("fromUnsupported", metabag_core::from_dynamic(&std::time::Instant::now()));
    metadata.insert("nested", from_json(json!({"child": null})));

    let native = metadata.to_native();
    assert!(native["explicitNull"].is_null());
    assert!(native["fromUnsupported"].is_null());
    assert!(native["nested"]["child"].is_null());
    assert!(native["nested"].as_object().unwrap().contains_key("child"));
}

// ============================================================================
// Sharing
// ============================================================================

#[test]
fn types_are_send_and_sync() {
    fn require_send_sync<T: Send + Sync>(_: &T) {}

    let metadata = from_json(json!({"title": "Voyager"}));
    require_send_sync(&metadata);
    require_send_sync(&Value::from(json!({"season": 3})));
}

#[test]
fn metadata_can_be_read_from_many_threads() {
    let metadata = Arc::new(from_json(json!({
        "title": "Voyager",
        "details": {"episode": 7}
    })));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let metadata = Arc::clone(&metadata);
            thread::spawn(move || {
                let episode = metadata
                    .get("details")
                    .and_then(Value::as_object)
                    .and_then(|details| details.get("episode"))
                    .and_then(Value::as_int);
                (metadata.get("title").and_then(Value::as_str).map(str::to_string), episode)
            })
        })
        .collect();

    for handle in handles {
        let (title, episode) = handle.join().expect("reader thread panicked");
        assert_eq!(title.as_deref(), Some("Voyager"));
        assert_eq!(episode, Some(7));
    }
}

#[test]
fn metadata_moves_across_threads() {
    let metadata = from_json(json!({"title": "Voyager"}));
    let result = thread::spawn(move || metadata).join().unwrap();
    assert_eq!(result.get("title").and_then(Value::as_str), Some("Voyager"));
}
