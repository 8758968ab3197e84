//! In-place document mutation: cleaning (default-filling) and updating
//! (deep merge).

use serde_json::{Map, Number, Value};

use super::{Field, FieldKind};

/// Switches for the cleaning pass.
///
/// Both switches default to on: absent keys get their defaults and keys
/// not declared in the schema are removed.
#[derive(Debug, Clone, Copy)]
pub struct CleanOptions {
    /// Insert `make_default()` for absent keys.
    pub set_default: bool,
    /// Remove keys not declared in the schema.
    pub remove_undefined: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            set_default: true,
            remove_undefined: true,
        }
    }
}

impl CleanOptions {
    /// Leaves absent keys absent instead of default-filling them.
    pub fn skip_defaults(mut self) -> Self {
        self.set_default = false;
        self
    }

    /// Keeps keys that are not declared in the schema.
    pub fn keep_undefined(mut self) -> Self {
        self.remove_undefined = false;
        self
    }
}

impl Field {
    /// Cleans `document[key]` in place.
    ///
    /// When the key is absent and `options.set_default` is on, inserts
    /// [`Field::make_default`]. List fields then apply their `ensure_list`
    /// and null-stripping switches; document fields recursively clean a
    /// present non-null value.
    pub fn clean(&self, document: &mut Map<String, Value>, key: &str, options: &CleanOptions) {
        if !document.contains_key(key) && options.set_default {
            document.insert(key.to_string(), self.make_default());
        }

        match &self.kind {
            FieldKind::List {
                ensure_list,
                drop_null_items,
                ..
            } => {
                if *ensure_list && document.get(key).is_none_or(Value::is_null) {
                    document.insert(key.to_string(), Value::Array(Vec::new()));
                }
                if *drop_null_items {
                    if let Some(Value::Array(items)) = document.get_mut(key) {
                        items.retain(|item| !item.is_null());
                    }
                }
            }
            FieldKind::Document { model } => {
                if let Some(Value::Object(inner)) = document.get_mut(key) {
                    model.clean_document(inner, options);
                }
            }
            _ => {}
        }
    }

    /// Writes `value` into `document[key]`.
    ///
    /// The base rule is an unconditional overwrite. Float fields promote
    /// integer values to floats first. Document and map fields deep-merge
    /// instead of overwriting; a non-map incoming value is ignored for
    /// those kinds.
    pub fn update(&self, document: &mut Map<String, Value>, key: &str, value: Value) {
        match &self.kind {
            FieldKind::Float { .. } => {
                document.insert(key.to_string(), promote_to_float(value));
            }

            FieldKind::Document { model } => {
                let Value::Object(incoming) = value else {
                    return;
                };
                if matches!(document.get(key), Some(Value::Object(_))) {
                    if let Some(Value::Object(existing)) = document.get_mut(key) {
                        model.update(existing, &incoming);
                    }
                } else {
                    document.insert(key.to_string(), Value::Object(incoming));
                }
            }

            FieldKind::Map { value: value_field } => {
                let Value::Object(incoming) = value else {
                    return;
                };
                if !matches!(document.get(key), Some(Value::Object(_))) {
                    // absent, null, or wrong shape: the merge target starts empty
                    document.insert(key.to_string(), Value::Object(Map::new()));
                }
                if let Some(Value::Object(target)) = document.get_mut(key) {
                    merge_map_entries(value_field, target, incoming);
                }
            }

            _ => {
                document.insert(key.to_string(), value);
            }
        }
    }
}

/// Applies the per-key merge rule of map fields: absent keys are inserted
/// verbatim; present keys recurse through a document value field or
/// delegate to the value field's own update.
fn merge_map_entries(
    value_field: &Field,
    target: &mut Map<String, Value>,
    incoming: Map<String, Value>,
) {
    for (key, value) in incoming {
        let occupied = matches!(target.get(&key), Some(existing) if !existing.is_null());
        if !occupied {
            target.insert(key, value);
            continue;
        }
        if let FieldKind::Document { model } = &value_field.kind {
            if let Value::Object(incoming_inner) = value {
                if let Some(Value::Object(existing)) = target.get_mut(&key) {
                    model.update(existing, &incoming_inner);
                }
            }
        } else {
            value_field.update(target, &key, value);
        }
    }
}

/// Integer-to-float promotion for float field updates.
fn promote_to_float(value: Value) -> Value {
    let Value::Number(ref n) = value else {
        return value;
    };
    if n.is_f64() {
        return value;
    }
    match n.as_f64().and_then(Number::from_f64) {
        Some(float) => Value::Number(float),
        None => value,
    }
}
