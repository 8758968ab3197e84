//! Deep-merge update semantics across field kinds.

use docshape::{DocumentType, Field};
use serde_json::{json, Map, Value};

fn doc(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

#[test]
fn test_scalar_fields_overwrite() {
    let model = DocumentType::builder("T")
        .field("name", Field::string())
        .field("active", Field::boolean())
        .build();
    let mut document = doc(json!({"name": "a", "active": true}));
    model.update(&mut document, &doc(json!({"name": "b", "active": false})));
    assert_eq!(Value::Object(document), json!({"name": "b", "active": false}));
}

#[test]
fn test_nested_documents_merge_instead_of_replacing() {
    let inner = DocumentType::builder("Inner")
        .field("x", Field::integer())
        .field("y", Field::integer())
        .build_shared();
    let model = DocumentType::builder("T")
        .field("a", Field::document(inner))
        .build();

    let mut document = doc(json!({"a": {"x": 1}}));
    model.update(&mut document, &doc(json!({"a": {"y": 2}})));
    assert_eq!(Value::Object(document), json!({"a": {"x": 1, "y": 2}}));
}

#[test]
fn test_nested_document_into_absent_slot_inserts_verbatim() {
    let inner = DocumentType::builder("Inner")
        .field("x", Field::integer())
        .build_shared();
    let model = DocumentType::builder("T")
        .field("a", Field::document(inner))
        .build();

    let mut document = doc(json!({}));
    model.update(&mut document, &doc(json!({"a": {"x": 1}})));
    assert_eq!(Value::Object(document), json!({"a": {"x": 1}}));
}

#[test]
fn test_map_of_documents_merges_per_key() {
    let inner = DocumentType::builder("Inner")
        .field("x", Field::integer())
        .field("y", Field::integer())
        .build_shared();
    let model = DocumentType::builder("T")
        .field("m", Field::map_of(Field::document(inner)))
        .build();

    let mut document = doc(json!({"m": {"k1": {"x": 1}}}));
    model.update(
        &mut document,
        &doc(json!({"m": {"k1": {"y": 2}, "k2": {"x": 9}}})),
    );
    assert_eq!(
        Value::Object(document),
        json!({"m": {"k1": {"x": 1, "y": 2}, "k2": {"x": 9}}})
    );
}

#[test]
fn test_map_null_valued_key_is_replaced_not_merged() {
    let model = DocumentType::builder("T")
        .field("m", Field::map_of(Field::integer()))
        .build();
    let mut document = doc(json!({"m": {"k": null}}));
    model.update(&mut document, &doc(json!({"m": {"k": 3}})));
    assert_eq!(Value::Object(document), json!({"m": {"k": 3}}));
}

#[test]
fn test_lists_replace_wholesale() {
    let model = DocumentType::builder("T")
        .field("tags", Field::list_of(Field::string()))
        .build();
    let mut document = doc(json!({"tags": ["a", "b"]}));
    model.update(&mut document, &doc(json!({"tags": ["c"]})));
    assert_eq!(Value::Object(document), json!({"tags": ["c"]}));
}

#[test]
fn test_float_field_promotes_integer_updates() {
    let model = DocumentType::builder("T")
        .field("score", Field::float())
        .build();
    let mut document = doc(json!({}));
    model.update(&mut document, &doc(json!({"score": 4})));
    assert!(document.get("score").unwrap().is_f64());
}

#[test]
fn test_update_then_validate() {
    let inner = DocumentType::builder("Inner")
        .field("city", Field::string().required())
        .build_shared();
    let model = DocumentType::builder("T")
        .field("name", Field::string().required())
        .field("address", Field::document(inner))
        .build();

    let mut document = model.make_default();
    model.update(
        &mut document,
        &doc(json!({"name": "alice", "address": {"city": "Oslo"}})),
    );
    assert!(model.is_document_valid(&document));
}
