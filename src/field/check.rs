//! The recursive validation dispatch for fields.
//!
//! Checking never raises: every failure becomes a [`ValidationError`]
//! pushed into the sink, and the `ControlFlow` return lets a probing sink
//! stop the traversal at the first error.

use std::ops::ControlFlow;

use chrono::DateTime;
use serde_json::Value;

use crate::error::{ErrorKind, ErrorSink, ValidationError};
use crate::path::KeyPath;

use super::{present, Field, FieldKind};

impl Field {
    /// Eagerly materializes every validation error for `value`.
    ///
    /// `Null` counts as absent. Errors carry no key context; document-level
    /// checks supply dotted paths instead.
    pub fn get_errors(&self, value: &Value) -> Vec<ValidationError> {
        let mut sink = ErrorSink::collecting();
        let _ = self.check(present(Some(value)), &KeyPath::root(), &mut sink);
        sink.into_errors()
    }

    /// Returns true iff `value` produces no validation error.
    ///
    /// Stops at the first error instead of materializing the full
    /// sequence.
    pub fn is_valid_value(&self, value: &Value) -> bool {
        let mut sink = ErrorSink::probing();
        let _ = self.check(present(Some(value)), &KeyPath::root(), &mut sink);
        sink.is_clean()
    }

    /// Checks an already-normalized value (`None` = absent or null) and
    /// reports errors into the sink under `path`.
    pub(crate) fn check(
        &self,
        value: Option<&Value>,
        path: &KeyPath,
        sink: &mut ErrorSink,
    ) -> ControlFlow<()> {
        let Some(value) = value else {
            if self.required {
                sink.push(ValidationError::new(
                    ErrorKind::Required,
                    path.clone(),
                    "value is required",
                ))?;
            }
            return ControlFlow::Continue(());
        };

        if let Some(choices) = &self.choices {
            if !choices.contains(value) {
                sink.push(
                    ValidationError::new(
                        ErrorKind::Value,
                        path.clone(),
                        "value is not one of the allowed choices",
                    )
                    .with_value(value),
                )?;
            }
        }

        self.check_kind(value, path, sink)
    }

    fn check_kind(
        &self,
        value: &Value,
        path: &KeyPath,
        sink: &mut ErrorSink,
    ) -> ControlFlow<()> {
        match &self.kind {
            FieldKind::Any => ControlFlow::Continue(()),

            FieldKind::String { pattern } => match value.as_str() {
                None => sink.push(type_error(path, "expected a string", value)),
                Some(s) => {
                    if let Some(regex) = pattern {
                        if !regex.is_match(s) {
                            sink.push(
                                ValidationError::new(
                                    ErrorKind::Value,
                                    path.clone(),
                                    format!("value does not match pattern {}", regex.as_str()),
                                )
                                .with_value(value),
                            )?;
                        }
                    }
                    ControlFlow::Continue(())
                }
            },

            FieldKind::Boolean => {
                if value.is_boolean() {
                    ControlFlow::Continue(())
                } else {
                    sink.push(type_error(path, "expected a boolean", value))
                }
            }

            FieldKind::Integer { min, max } => {
                if !value.is_i64() && !value.is_u64() {
                    return sink.push(type_error(path, "expected an integer", value));
                }
                self.check_bounds(value, *min, *max, path, sink)
            }

            FieldKind::Float { min, max } => {
                if !value.is_number() {
                    return sink.push(type_error(path, "expected a number", value));
                }
                self.check_bounds(value, *min, *max, path, sink)
            }

            FieldKind::DateTime => {
                let parsed = value.as_str().map(DateTime::parse_from_rfc3339);
                match parsed {
                    Some(Ok(_)) => ControlFlow::Continue(()),
                    _ => sink.push(type_error(path, "expected an RFC 3339 datetime", value)),
                }
            }

            FieldKind::List { item, .. } => match value.as_array() {
                None => sink.push(type_error(path, "expected a list", value)),
                Some(items) => {
                    if let Some(item_field) = item {
                        for (index, element) in items.iter().enumerate() {
                            item_field.check(
                                present(Some(element)),
                                &path.push_index(index),
                                sink,
                            )?;
                        }
                    }
                    ControlFlow::Continue(())
                }
            },

            FieldKind::Map { value: value_field } => match value.as_object() {
                None => sink.push(type_error(path, "expected a map", value)),
                Some(entries) => {
                    for (key, entry) in entries {
                        value_field.check(present(Some(entry)), &path.push_key(key), sink)?;
                    }
                    ControlFlow::Continue(())
                }
            },

            FieldKind::Document { model } => match value.as_object() {
                None => sink.push(type_error(path, "expected a document", value)),
                Some(document) => model.check(document, path, sink),
            },
        }
    }

    /// Half-open bounds check, `[min, max)`. Bounds are meaningless when
    /// choices are configured, and only apply to numeric values (a wrong
    /// runtime category already produced a type error).
    fn check_bounds(
        &self,
        value: &Value,
        min: Option<f64>,
        max: Option<f64>,
        path: &KeyPath,
        sink: &mut ErrorSink,
    ) -> ControlFlow<()> {
        if self.choices.is_some() {
            return ControlFlow::Continue(());
        }
        let Some(n) = value.as_f64() else {
            return ControlFlow::Continue(());
        };
        let below = min.is_some_and(|min| n < min);
        let above = max.is_some_and(|max| n >= max);
        if below || above {
            sink.push(
                ValidationError::new(ErrorKind::Value, path.clone(), "value out of bounds")
                    .with_value(value),
            )?;
        }
        ControlFlow::Continue(())
    }
}

fn type_error(path: &KeyPath, message: &str, value: &Value) -> ValidationError {
    ValidationError::new(ErrorKind::Type, path.clone(), message).with_value(value)
}
