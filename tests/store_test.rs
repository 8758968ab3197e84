//! Store mapping: renames, choice codes, and microsecond timestamps.

use std::sync::Arc;

use docshape::{DocumentType, Field};
use serde_json::{json, Map, Value};

fn doc(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

fn event_model() -> Arc<DocumentType> {
    let actor = DocumentType::builder("Actor")
        .field("name", Field::string())
        .field("seen_at", Field::datetime().store_as("s"))
        .build_shared();

    DocumentType::builder("Event")
        .field("occurred_at", Field::datetime())
        .field(
            "kind",
            Field::string()
                .choice_codes([(json!("click"), json!(0)), (json!("view"), json!(1))])
                .unwrap()
                .store_as("k"),
        )
        .field("actor", Field::document(actor))
        .field(
            "flags",
            Field::list_of(
                Field::string()
                    .choice_codes([(json!("hot"), json!(10)), (json!("cold"), json!(20))])
                    .unwrap(),
            ),
        )
        .build_shared()
}

#[test]
fn test_round_trip_preserves_the_document_exactly() {
    let model = event_model();
    let original = doc(json!({
        "occurred_at": "2015-05-25T10:35:34.353845Z",
        "kind": "view",
        "actor": {"name": "alice", "seen_at": "2025-08-01T00:00:00.000001Z"},
        "flags": ["hot", "cold"],
    }));

    let mut stored = original.clone();
    model.map_to_store(&mut stored).unwrap();
    assert_eq!(
        Value::Object(stored.clone()),
        json!({
            "occurred_at": 1_432_550_134_353_845i64,
            "k": 1,
            "actor": {"name": "alice", "s": 1_754_006_400_000_001i64},
            "flags": [10, 20],
        })
    );

    model.map_from_store(&mut stored).unwrap();
    assert_eq!(stored, original);
}

#[test]
fn test_subsecond_precision_survives_the_round_trip() {
    // a naive float division of this timestamp loses the final digit
    let model = DocumentType::builder("T")
        .field("at", Field::datetime())
        .build();
    let mut document = doc(json!({"at": "2015-05-25T10:35:34.353845Z"}));
    model.map_to_store(&mut document).unwrap();
    model.map_from_store(&mut document).unwrap();
    assert_eq!(document.get("at"), Some(&json!("2015-05-25T10:35:34.353845Z")));
}

#[test]
fn test_offset_datetimes_normalize_to_utc() {
    let model = DocumentType::builder("T")
        .field("at", Field::datetime())
        .build();
    let mut document = doc(json!({"at": "2015-05-25T18:35:34.353845+08:00"}));
    model.map_to_store(&mut document).unwrap();
    assert_eq!(document.get("at"), Some(&json!(1_432_550_134_353_845i64)));
    model.map_from_store(&mut document).unwrap();
    assert_eq!(document.get("at"), Some(&json!("2015-05-25T10:35:34.353845Z")));
}

#[test]
fn test_null_and_absent_values_pass_through() {
    let model = event_model();
    let mut document = doc(json!({"occurred_at": null}));
    model.map_to_store(&mut document).unwrap();
    assert_eq!(Value::Object(document.clone()), json!({"occurred_at": null}));
    model.map_from_store(&mut document).unwrap();
    assert_eq!(Value::Object(document), json!({"occurred_at": null}));
}

#[test]
fn test_null_list_elements_are_left_alone() {
    let model = event_model();
    let mut document = doc(json!({"flags": ["hot", null]}));
    model.map_to_store(&mut document).unwrap();
    assert_eq!(document.get("flags"), Some(&json!([10, null])));
}

#[test]
fn test_value_outside_the_code_mapping_is_an_error() {
    let model = event_model();
    let mut document = doc(json!({"kind": "hover"}));
    let err = model.map_to_store(&mut document).unwrap_err();
    assert_eq!(err.field, "kind");
}

#[test]
fn test_unknown_storage_code_is_an_error() {
    let model = event_model();
    let mut document = doc(json!({"k": 42}));
    let err = model.map_from_store(&mut document).unwrap_err();
    assert_eq!(err.field, "kind");
}

#[test]
fn test_lists_of_documents_are_mapped_elementwise() {
    let entry = DocumentType::builder("Entry")
        .field("at", Field::datetime().store_as("t"))
        .build_shared();
    let model = DocumentType::builder("Log")
        .field("entries", Field::list_of(Field::document(entry)))
        .build();

    let mut document = doc(json!({"entries": [
        {"at": "1970-01-01T00:00:01.500000Z"},
        {"at": "1970-01-01T00:00:02.000000Z"},
    ]}));
    model.map_to_store(&mut document).unwrap();
    assert_eq!(
        Value::Object(document.clone()),
        json!({"entries": [{"t": 1_500_000i64}, {"t": 2_000_000i64}]})
    );
    model.map_from_store(&mut document).unwrap();
    assert_eq!(
        Value::Object(document),
        json!({"entries": [
            {"at": "1970-01-01T00:00:01.500000Z"},
            {"at": "1970-01-01T00:00:02.000000Z"},
        ]})
    );
}

#[test]
fn test_undeclared_keys_are_untouched() {
    let model = event_model();
    let mut document = doc(json!({"kind": "click", "raw": {"ip": "10.0.0.1"}}));
    model.map_to_store(&mut document).unwrap();
    assert_eq!(
        Value::Object(document),
        json!({"k": 0, "raw": {"ip": "10.0.0.1"}})
    );
}

#[test]
fn test_coded_integer_choices_map_both_ways() {
    // codes need not be numbers and values need not be strings
    let model = DocumentType::builder("T")
        .field(
            "level",
            Field::integer()
                .choice_codes([(json!(1), json!("l")), (json!(2), json!("h"))])
                .unwrap(),
        )
        .build();
    let mut document = doc(json!({"level": 2}));
    model.map_to_store(&mut document).unwrap();
    assert_eq!(document.get("level"), Some(&json!("h")));
    model.map_from_store(&mut document).unwrap();
    assert_eq!(document.get("level"), Some(&json!(2)));
}
