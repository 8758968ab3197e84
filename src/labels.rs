//! Label-based field removal.
//!
//! Fields can carry labels (see [`Field::labels`](crate::Field::labels));
//! this extension strips every labeled field matching a requested label
//! set from a document, recursing into nested documents. Typical use is
//! redacting `"private"` or `"internal"` fields before handing a document
//! to an external consumer.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::document::DocumentType;
use crate::field::FieldKind;

impl DocumentType {
    /// Removes every present key whose field's labels intersect `labels`
    /// and are disjoint from `exclude`, recursing into nested-document
    /// fields with a present non-null value. Mutates in place.
    ///
    /// # Example
    ///
    /// ```rust
    /// use docshape::{DocumentType, Field};
    /// use serde_json::json;
    ///
    /// let user = DocumentType::builder("User")
    ///     .field("name", Field::string())
    ///     .field("password", Field::string().labels(["private"]))
    ///     .build();
    ///
    /// let mut document = json!({"name": "alice", "password": "s3cret"});
    /// user.clean_labels(document.as_object_mut().unwrap(), &["private"], &[]);
    /// assert_eq!(document, json!({"name": "alice"}));
    /// ```
    pub fn clean_labels(
        &self,
        document: &mut Map<String, Value>,
        labels: &[&str],
        exclude: &[&str],
    ) {
        let requested: BTreeSet<&str> = labels.iter().copied().collect();
        let excluded: BTreeSet<&str> = exclude.iter().copied().collect();

        for (name, field) in self.declared_fields() {
            if document.contains_key(name) && !field.labels.is_empty() {
                let selected = field.labels.iter().any(|l| requested.contains(l.as_str()));
                let protected = field.labels.iter().any(|l| excluded.contains(l.as_str()));
                if selected && !protected {
                    document.remove(name);
                    continue;
                }
            }
            if let FieldKind::Document { model } = &field.kind {
                if let Some(Value::Object(inner)) = document.get_mut(name) {
                    model.clean_labels(inner, labels, exclude);
                }
            }
        }
    }
}
