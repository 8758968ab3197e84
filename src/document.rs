//! Document types: named, inheritable, ordered field sets.
//!
//! A [`DocumentType`] is assembled once by a [`DocumentTypeBuilder`] and is
//! immutable afterwards, so built types are safe to share across threads
//! behind an `Arc`. Inheritance is an explicit `extend` step: the effective
//! field set is the union of all ancestor schemas with the most-derived
//! declaration winning on a name collision. Mixins attached to a type (or
//! inherited from an ancestor) get a one-time hook over the resolved field
//! set when the type is built.
//!
//! Nested-document fields hold `Arc`s of already-built types, so cyclic
//! schemas cannot be expressed.
//!
//! # Example
//!
//! ```rust
//! use docshape::{DocumentType, Field};
//! use serde_json::json;
//!
//! let user = DocumentType::builder("User")
//!     .field("name", Field::string().required())
//!     .field("age", Field::integer().min(0).max(150))
//!     .build();
//!
//! let document = json!({"name": "alice", "age": 30});
//! assert!(user.is_document_valid(document.as_object().unwrap()));
//! ```

use std::ops::ControlFlow;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{ErrorSink, ValidationError};
use crate::field::{present, CleanOptions, Field};
use crate::path::KeyPath;

/// Auxiliary behavior attached to a document type.
///
/// A mixin's hook runs exactly once per built type, over the resolved
/// field set, before the type is frozen. Mixins attach transitively: a
/// type that extends a parent inherits the parent's mixins and runs their
/// hooks on its own field set too.
///
/// The hook receives the builder-owned field map, so mutating field
/// configuration in place is well-defined; later subtypes re-run hooks on
/// their own copies.
pub trait Mixin: Send + Sync {
    /// Post-processes the resolved field set of a type being built.
    fn apply(&self, model_name: &str, fields: &mut IndexMap<String, Field>);
}

/// A named document schema: an ordered mapping from field name to
/// [`Field`] definition.
pub struct DocumentType {
    name: String,
    fields: IndexMap<String, Field>,
    mixins: Vec<Arc<dyn Mixin>>,
}

impl std::fmt::Debug for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentType")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl DocumentType {
    /// Starts building a new document type with the given name.
    pub fn builder(name: impl Into<String>) -> DocumentTypeBuilder {
        DocumentTypeBuilder {
            name: name.into(),
            fields: IndexMap::new(),
            mixins: Vec::new(),
        }
    }

    /// Returns the type's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    /// Looks up a declared field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Returns true when `name` is a declared field.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub(crate) fn declared_fields(&self) -> &IndexMap<String, Field> {
        &self.fields
    }

    /// Collects every validation error for `document`, in field
    /// declaration order, with dotted key paths.
    ///
    /// An absent key counts as a null value.
    pub fn get_document_errors(&self, document: &Map<String, Value>) -> Vec<ValidationError> {
        let mut sink = ErrorSink::collecting();
        let _ = self.check(document, &KeyPath::root(), &mut sink);
        sink.into_errors()
    }

    /// Returns true iff `document` produces no validation error.
    ///
    /// Stops at the first error instead of materializing the full
    /// sequence.
    pub fn is_document_valid(&self, document: &Map<String, Value>) -> bool {
        let mut sink = ErrorSink::probing();
        let _ = self.check(document, &KeyPath::root(), &mut sink);
        sink.is_clean()
    }

    pub(crate) fn check(
        &self,
        document: &Map<String, Value>,
        parent: &KeyPath,
        sink: &mut ErrorSink,
    ) -> ControlFlow<()> {
        for (name, field) in &self.fields {
            field.check(present(document.get(name)), &parent.push_key(name), sink)?;
        }
        ControlFlow::Continue(())
    }

    /// Constructs a fresh document mapping every declared field name to
    /// that field's default.
    pub fn make_default(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|(name, field)| (name.clone(), field.make_default()))
            .collect()
    }

    /// Cleans `document` in place: default-fills absent keys, applies
    /// per-kind cleaning, and removes undeclared keys (subject to
    /// `options`). Idempotent.
    pub fn clean_document(&self, document: &mut Map<String, Value>, options: &CleanOptions) {
        for (name, field) in &self.fields {
            field.clean(document, name, options);
        }
        if options.remove_undefined {
            document.retain(|key, _| self.fields.contains_key(key));
        }
    }

    /// Deep-merges `new_value` into `document` per field-specific rules.
    ///
    /// Keys of `new_value` that are not declared fields are silently
    /// ignored.
    pub fn update(&self, document: &mut Map<String, Value>, new_value: &Map<String, Value>) {
        for (key, value) in new_value {
            if let Some(field) = self.fields.get(key) {
                field.update(document, key, value.clone());
            }
        }
    }

    pub(crate) fn mixins(&self) -> &[Arc<dyn Mixin>] {
        &self.mixins
    }
}

/// Assembles a [`DocumentType`]: declared fields, inherited fields, and
/// mixins, resolved once at build time.
///
/// Call [`extend`](DocumentTypeBuilder::extend) before declaring the
/// subtype's own fields so inherited fields keep their ancestor positions;
/// a subtype declaration always wins over an inherited field of the same
/// name regardless of call order.
pub struct DocumentTypeBuilder {
    name: String,
    fields: IndexMap<String, Field>,
    mixins: Vec<Arc<dyn Mixin>>,
}

impl DocumentTypeBuilder {
    /// Declares a field. Redeclaring a name replaces the definition but
    /// keeps its original position.
    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    /// Inherits every field and mixin of `parent`.
    ///
    /// Fields already declared on this builder are kept (most-derived
    /// wins); inherited mixins are deduplicated so each hook still runs
    /// once per built type.
    pub fn extend(mut self, parent: &DocumentType) -> Self {
        for (name, field) in &parent.fields {
            if !self.fields.contains_key(name) {
                self.fields.insert(name.clone(), field.clone());
            }
        }
        for mixin in &parent.mixins {
            if !self.mixins.iter().any(|m| Arc::ptr_eq(m, mixin)) {
                self.mixins.push(Arc::clone(mixin));
            }
        }
        self
    }

    /// Attaches a mixin. Its hook runs once when this type is built and
    /// is inherited by types extending this one.
    pub fn mixin(mut self, mixin: Arc<dyn Mixin>) -> Self {
        if !self.mixins.iter().any(|m| Arc::ptr_eq(m, &mixin)) {
            self.mixins.push(mixin);
        }
        self
    }

    /// Resolves the type: runs every mixin hook over the field set, then
    /// freezes it.
    pub fn build(mut self) -> DocumentType {
        for mixin in &self.mixins {
            mixin.apply(&self.name, &mut self.fields);
        }
        DocumentType {
            name: self.name,
            fields: self.fields,
            mixins: self.mixins,
        }
    }

    /// Like [`build`](Self::build), but wrapped in an `Arc` ready for
    /// nested-document fields and registries.
    pub fn build_shared(self) -> Arc<DocumentType> {
        Arc::new(self.build())
    }
}
