//! Bidirectional mapping between documents and their external-store
//! representation.
//!
//! The store representation differs from the runtime one in three ways,
//! all driven by schema metadata:
//!
//! - fields with a [`store_as`](crate::Field::store_as) key are renamed;
//! - code-mapped choices ([`choice_codes`](crate::Field::choice_codes))
//!   are written as their storage codes;
//! - datetime values are written as integer microsecond timestamps.
//!
//! Both directions transform in place and recurse into nested-document
//! and list-of-nested-document fields. The transforms raise
//! [`ValueError`] for values they cannot transcode; validate first.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::document::DocumentType;
use crate::error::ValueError;
use crate::field::{present, Choices, FieldKind};

/// Microsecond units per second: the fixed precision of stored
/// timestamps.
pub const STORE_TIMESTAMP_PRECISION: i64 = 1_000_000;

impl DocumentType {
    /// Rewrites `document` in place into its store representation.
    ///
    /// # Example
    ///
    /// ```rust
    /// use docshape::{DocumentType, Field};
    /// use serde_json::json;
    ///
    /// let event = DocumentType::builder("Event")
    ///     .field("at", Field::datetime())
    ///     .field("kind", Field::string()
    ///         .choice_codes([(json!("click"), json!(0)), (json!("view"), json!(1))])
    ///         .unwrap()
    ///         .store_as("k"))
    ///     .build();
    ///
    /// let mut document = json!({"at": "2015-05-25T10:35:34.353845Z", "kind": "view"});
    /// event.map_to_store(document.as_object_mut().unwrap()).unwrap();
    /// assert_eq!(document, json!({"at": 1432550134353845i64, "k": 1}));
    /// ```
    pub fn map_to_store(&self, document: &mut Map<String, Value>) -> Result<(), ValueError> {
        for (name, field) in self.declared_fields() {
            if present(document.get(name)).is_none() {
                continue;
            }
            match &field.kind {
                FieldKind::Document { model } => {
                    if let Some(Value::Object(inner)) = document.get_mut(name) {
                        model.map_to_store(inner)?;
                    }
                }
                FieldKind::List {
                    item: Some(item), ..
                } => match &item.kind {
                    FieldKind::Document { model } => {
                        if let Some(Value::Array(items)) = document.get_mut(name) {
                            for element in items.iter_mut() {
                                if let Value::Object(inner) = element {
                                    model.map_to_store(inner)?;
                                }
                            }
                        }
                    }
                    _ => {
                        if let Some(choices) = coded(item.choice_set()) {
                            if let Some(Value::Array(items)) = document.get_mut(name) {
                                for element in items.iter_mut() {
                                    if !element.is_null() {
                                        *element = encode_choice(name, choices, element)?;
                                    }
                                }
                            }
                        }
                    }
                },
                _ => {
                    if let Some(choices) = coded(field.choice_set()) {
                        if let Some(value) = document.get(name) {
                            let code = encode_choice(name, choices, value)?;
                            document.insert(name.clone(), code);
                        }
                    }
                    if matches!(field.kind, FieldKind::DateTime) {
                        if let Some(value) = document.get(name) {
                            let micros = datetime_to_micros(name, value)?;
                            document.insert(name.clone(), Value::from(micros));
                        }
                    }
                }
            }
            if let Some(store_key) = field.store_key() {
                if let Some(value) = document.remove(name) {
                    document.insert(store_key.to_string(), value);
                }
            }
        }
        Ok(())
    }

    /// Rewrites a store-shaped `document` in place back into its runtime
    /// representation. The exact inverse of [`map_to_store`](Self::map_to_store).
    pub fn map_from_store(&self, document: &mut Map<String, Value>) -> Result<(), ValueError> {
        for (name, field) in self.declared_fields() {
            // the rename back happens before the value transform
            if let Some(store_key) = field.store_key() {
                if let Some(value) = document.remove(store_key) {
                    document.insert(name.clone(), value);
                }
            }
            if present(document.get(name)).is_none() {
                continue;
            }
            match &field.kind {
                FieldKind::Document { model } => {
                    if let Some(Value::Object(inner)) = document.get_mut(name) {
                        model.map_from_store(inner)?;
                    }
                }
                FieldKind::List {
                    item: Some(item), ..
                } => match &item.kind {
                    FieldKind::Document { model } => {
                        if let Some(Value::Array(items)) = document.get_mut(name) {
                            for element in items.iter_mut() {
                                if let Value::Object(inner) = element {
                                    model.map_from_store(inner)?;
                                }
                            }
                        }
                    }
                    _ => {
                        if let Some(choices) = coded(item.choice_set()) {
                            if let Some(Value::Array(items)) = document.get_mut(name) {
                                for element in items.iter_mut() {
                                    if !element.is_null() {
                                        *element = decode_choice(name, choices, element)?;
                                    }
                                }
                            }
                        }
                    }
                },
                _ => {
                    if let Some(choices) = coded(field.choice_set()) {
                        if let Some(value) = document.get(name) {
                            let decoded = decode_choice(name, choices, value)?;
                            document.insert(name.clone(), decoded);
                        }
                    }
                    if matches!(field.kind, FieldKind::DateTime) {
                        if let Some(value) = document.get(name) {
                            let instant = micros_to_rfc3339(name, value)?;
                            document.insert(name.clone(), Value::String(instant));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

fn coded(choices: Option<&Choices>) -> Option<&Choices> {
    choices.filter(|c| c.is_coded())
}

fn encode_choice(field: &str, choices: &Choices, value: &Value) -> Result<Value, ValueError> {
    choices
        .code_for(value)
        .cloned()
        .ok_or_else(|| ValueError::new(field, format!("value has no storage code: {}", value)))
}

fn decode_choice(field: &str, choices: &Choices, code: &Value) -> Result<Value, ValueError> {
    choices
        .value_for(code)
        .cloned()
        .ok_or_else(|| ValueError::new(field, format!("unknown storage code: {}", code)))
}

fn datetime_to_micros(field: &str, value: &Value) -> Result<i64, ValueError> {
    let instant = value
        .as_str()
        .ok_or_else(|| ValueError::new(field, "expected an RFC 3339 datetime"))?;
    let parsed = DateTime::parse_from_rfc3339(instant)
        .map_err(|e| ValueError::new(field, format!("unparseable datetime: {}", e)))?;
    Ok(parsed.timestamp_micros())
}

/// Decodes a microsecond timestamp, rebuilding the second and sub-second
/// parts independently so no precision is lost to float rounding.
fn micros_to_rfc3339(field: &str, value: &Value) -> Result<String, ValueError> {
    let micros = value
        .as_i64()
        .ok_or_else(|| ValueError::new(field, "expected an integer microsecond timestamp"))?;
    let seconds = micros.div_euclid(STORE_TIMESTAMP_PRECISION);
    let sub_micros = micros.rem_euclid(STORE_TIMESTAMP_PRECISION) as u32;
    let instant = DateTime::<Utc>::from_timestamp(seconds, sub_micros * 1_000)
        .ok_or_else(|| ValueError::new(field, "timestamp out of range"))?;
    Ok(instant.to_rfc3339_opts(SecondsFormat::Micros, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_micros_codec_preserves_subsecond_precision() {
        // 1432550134353845 / 1e6 rounds badly in f64; the integer split
        // must not
        let encoded = json!(1_432_550_134_353_845i64);
        let decoded = micros_to_rfc3339("at", &encoded).unwrap();
        assert_eq!(decoded, "2015-05-25T10:35:34.353845Z");
        assert_eq!(
            datetime_to_micros("at", &json!(decoded)).unwrap(),
            1_432_550_134_353_845i64
        );
    }

    #[test]
    fn test_micros_codec_handles_pre_epoch_instants() {
        let micros = datetime_to_micros("at", &json!("1969-12-31T23:59:59.250000Z")).unwrap();
        assert_eq!(micros, -750_000);
        let decoded = micros_to_rfc3339("at", &json!(micros)).unwrap();
        assert_eq!(decoded, "1969-12-31T23:59:59.250000Z");
    }

    #[test]
    fn test_non_integer_timestamp_is_a_value_error() {
        let err = micros_to_rfc3339("at", &json!("soon")).unwrap_err();
        assert_eq!(err.field, "at");
    }
}
