//! Field definitions for document schemas.
//!
//! A [`Field`] describes one schema slot: the runtime category a value must
//! belong to, whether it is required, its valid choices, its default, and
//! the extension attributes (labels, storage key) other components consume.
//! Field kinds form a closed set ([`FieldKind`]); every recursive operation
//! (checking, cleaning, updating, store mapping) dispatches over it
//! exhaustively.
//!
//! # Example
//!
//! ```rust
//! use docshape::Field;
//! use serde_json::json;
//!
//! let age = Field::integer().required().min(0).max(150);
//! assert!(age.is_valid_value(&json!(30)));
//! assert!(!age.is_valid_value(&json!(150))); // max is exclusive
//! assert!(!age.is_valid_value(&json!(null))); // required
//! ```

mod check;
mod choices;
mod mutate;

pub use choices::Choices;
pub use mutate::CleanOptions;

use std::collections::BTreeSet;
use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

use crate::document::DocumentType;
use crate::error::DefinitionError;

/// A lazy default producer, invoked with the field it belongs to.
type DefaultFn = Arc<dyn Fn(&Field) -> Value + Send + Sync>;

/// Where a field's default comes from.
#[derive(Clone)]
pub(crate) enum DefaultSource {
    /// A fixed value, returned verbatim.
    Fixed(Value),
    /// A producer invoked lazily each time a default is needed.
    Producer(DefaultFn),
}

/// The closed set of field kinds.
///
/// Kind-specific configuration lives on the variant, so each recursive
/// operation is one exhaustive match rather than scattered type tests.
#[derive(Clone)]
pub enum FieldKind {
    /// Any value is acceptable.
    Any,
    /// A string, optionally constrained by a regex pattern.
    String { pattern: Option<Regex> },
    /// A boolean.
    Boolean,
    /// An integer, optionally bounded by a half-open `[min, max)` interval.
    Integer { min: Option<f64>, max: Option<f64> },
    /// A float; integer values are accepted as number-like. Optionally
    /// bounded by a half-open `[min, max)` interval.
    Float { min: Option<f64>, max: Option<f64> },
    /// An RFC 3339 instant string.
    DateTime,
    /// A list, with an optional element field applied element-wise.
    List {
        item: Option<Box<Field>>,
        ensure_list: bool,
        drop_null_items: bool,
    },
    /// A key-to-value mapping; keys are untyped, every value is checked
    /// against the mandatory value field.
    Map { value: Box<Field> },
    /// A nested document validated against a wrapped document type.
    Document { model: Arc<DocumentType> },
}

impl FieldKind {
    /// Returns the stable name of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Any => "any",
            FieldKind::String { .. } => "string",
            FieldKind::Boolean => "boolean",
            FieldKind::Integer { .. } => "integer",
            FieldKind::Float { .. } => "float",
            FieldKind::DateTime => "datetime",
            FieldKind::List { .. } => "list",
            FieldKind::Map { .. } => "map",
            FieldKind::Document { .. } => "document",
        }
    }
}

/// A schema slot describing validation, defaulting, and update rules for
/// one document attribute.
///
/// Fields are built with the kind constructors ([`Field::string`],
/// [`Field::integer`], [`Field::document`], ...) and configured through
/// chained builder methods. A missing key and an explicit JSON `null` are
/// treated as the same thing everywhere.
///
/// # Example
///
/// ```rust
/// use docshape::Field;
/// use serde_json::json;
///
/// let status = Field::string()
///     .choices([json!("open"), json!("closed")])
///     .unwrap()
///     .default_value("open");
///
/// assert!(status.is_valid_value(&json!("open")));
/// assert!(!status.is_valid_value(&json!("pending")));
/// assert_eq!(status.make_default(), json!("open"));
/// ```
#[derive(Clone)]
pub struct Field {
    pub(crate) kind: FieldKind,
    pub(crate) required: bool,
    pub(crate) choices: Option<Choices>,
    pub(crate) default: Option<DefaultSource>,
    pub(crate) labels: BTreeSet<String>,
    pub(crate) store_field: Option<String>,
}

impl std::fmt::Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("kind", &self.kind.name())
            .field("required", &self.required)
            .field("labels", &self.labels)
            .field("store_field", &self.store_field)
            .finish_non_exhaustive()
    }
}

impl Field {
    fn with_kind(kind: FieldKind) -> Self {
        Self {
            kind,
            required: false,
            choices: None,
            default: None,
            labels: BTreeSet::new(),
            store_field: None,
        }
    }

    /// Creates a field accepting any value.
    pub fn any() -> Self {
        Self::with_kind(FieldKind::Any)
    }

    /// Creates a string field.
    pub fn string() -> Self {
        Self::with_kind(FieldKind::String { pattern: None })
    }

    /// Creates a boolean field.
    pub fn boolean() -> Self {
        Self::with_kind(FieldKind::Boolean)
    }

    /// Creates an integer field.
    pub fn integer() -> Self {
        Self::with_kind(FieldKind::Integer {
            min: None,
            max: None,
        })
    }

    /// Creates a float field. Integer values are accepted as number-like.
    pub fn float() -> Self {
        Self::with_kind(FieldKind::Float {
            min: None,
            max: None,
        })
    }

    /// Creates a datetime field. Values must be RFC 3339 instant strings.
    pub fn datetime() -> Self {
        Self::with_kind(FieldKind::DateTime)
    }

    /// Creates a list field with untyped elements.
    ///
    /// By default, cleaning coerces a null/absent value to an empty list
    /// and strips null elements; see [`Field::allow_null_list`] and
    /// [`Field::keep_null_items`].
    pub fn list() -> Self {
        Self::with_kind(FieldKind::List {
            item: None,
            ensure_list: true,
            drop_null_items: true,
        })
    }

    /// Creates a list field whose elements are checked against `item`.
    pub fn list_of(item: Field) -> Self {
        Self::with_kind(FieldKind::List {
            item: Some(Box::new(item)),
            ensure_list: true,
            drop_null_items: true,
        })
    }

    /// Creates a map field whose values are checked against `value`.
    /// Map keys are untyped.
    pub fn map_of(value: Field) -> Self {
        Self::with_kind(FieldKind::Map {
            value: Box::new(value),
        })
    }

    /// Creates a nested-document field validated against `model`.
    pub fn document(model: Arc<DocumentType>) -> Self {
        Self::with_kind(FieldKind::Document { model })
    }

    /// Marks the field as required: a null or absent value is an error.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets a fixed default value.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultSource::Fixed(value.into()));
        self
    }

    /// Sets a lazy default producer, invoked with the field each time a
    /// default is needed.
    pub fn default_with<F>(mut self, producer: F) -> Self
    where
        F: Fn(&Field) -> Value + Send + Sync + 'static,
    {
        self.default = Some(DefaultSource::Producer(Arc::new(producer)));
        self
    }

    /// Restricts valid values to the given set.
    ///
    /// Configuring choices clears any numeric bounds. Returns an error on
    /// map and document fields, or when the set contains duplicates.
    pub fn choices<I, V>(self, values: I) -> Result<Self, DefinitionError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.set_choices(Choices::values(values)?)
    }

    /// Restricts valid values to the keys of a bijective value-to-code
    /// mapping. The reverse mapping is derived once, here; a duplicate
    /// value or code is rejected.
    ///
    /// The codes are what the store adapter writes in place of the values.
    pub fn choice_codes<I>(self, pairs: I) -> Result<Self, DefinitionError>
    where
        I: IntoIterator<Item = (Value, Value)>,
    {
        self.set_choices(Choices::codes(pairs.into_iter().collect())?)
    }

    fn set_choices(mut self, choices: Choices) -> Result<Self, DefinitionError> {
        match &mut self.kind {
            FieldKind::Map { .. } | FieldKind::Document { .. } => {
                return Err(DefinitionError::ChoicesNotAllowed(self.kind.name()));
            }
            // choices and bounds are mutually exclusive; choices win
            FieldKind::Integer { min, max } | FieldKind::Float { min, max } => {
                *min = None;
                *max = None;
            }
            _ => {}
        }
        self.choices = Some(choices);
        Ok(self)
    }

    /// Adds a regex pattern constraint to a string field.
    ///
    /// Returns an error when the pattern is invalid or the field is not a
    /// string field.
    pub fn pattern(mut self, pattern: &str) -> Result<Self, DefinitionError> {
        let regex = Regex::new(pattern)?;
        match &mut self.kind {
            FieldKind::String { pattern } => {
                *pattern = Some(regex);
                Ok(self)
            }
            _ => Err(DefinitionError::PatternNotAllowed),
        }
    }

    /// Sets the inclusive lower bound of a numeric field.
    ///
    /// Bounds only apply to integer and float fields and have no effect
    /// when choices are configured.
    pub fn min(mut self, bound: impl Into<f64>) -> Self {
        if self.choices.is_none() {
            if let FieldKind::Integer { min, .. } | FieldKind::Float { min, .. } = &mut self.kind {
                *min = Some(bound.into());
            }
        }
        self
    }

    /// Sets the exclusive upper bound of a numeric field.
    ///
    /// Bounds only apply to integer and float fields and have no effect
    /// when choices are configured.
    pub fn max(mut self, bound: impl Into<f64>) -> Self {
        if self.choices.is_none() {
            if let FieldKind::Integer { max, .. } | FieldKind::Float { max, .. } = &mut self.kind {
                *max = Some(bound.into());
            }
        }
        self
    }

    /// Attaches labels consumed by the label-filtering extension.
    pub fn labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels.extend(labels.into_iter().map(Into::into));
        self
    }

    /// Sets the alternate key name used by the store adapter.
    pub fn store_as(mut self, name: impl Into<String>) -> Self {
        self.store_field = Some(name.into());
        self
    }

    /// On a list field, leaves a null/absent value as-is instead of
    /// coercing it to an empty list on cleaning.
    pub fn allow_null_list(mut self) -> Self {
        if let FieldKind::List { ensure_list, .. } = &mut self.kind {
            *ensure_list = false;
        }
        self
    }

    /// On a list field, keeps null elements instead of stripping them on
    /// cleaning.
    pub fn keep_null_items(mut self) -> Self {
        if let FieldKind::List {
            drop_null_items, ..
        } = &mut self.kind
        {
            *drop_null_items = false;
        }
        self
    }

    /// Returns this field's kind.
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Returns true when a null or absent value is an error.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the configured choices, if any.
    pub fn choice_set(&self) -> Option<&Choices> {
        self.choices.as_ref()
    }

    /// Returns the labels attached to this field.
    pub fn label_set(&self) -> &BTreeSet<String> {
        &self.labels
    }

    /// Returns the alternate storage key name, if any.
    pub fn store_key(&self) -> Option<&str> {
        self.store_field.as_deref()
    }

    /// Produces this field's default value.
    ///
    /// Returns `Null` when no default is configured, except for document
    /// fields, which defer to the wrapped document type's full default
    /// document. A lazy producer is invoked with the field instance.
    pub fn make_default(&self) -> Value {
        match &self.default {
            Some(DefaultSource::Fixed(value)) => value.clone(),
            Some(DefaultSource::Producer(producer)) => producer(self),
            None => match &self.kind {
                FieldKind::Document { model } => Value::Object(model.make_default()),
                _ => Value::Null,
            },
        }
    }
}

/// Normalizes the missing-key / explicit-null equivalence: an explicit
/// `null` is treated the same as an absent value.
pub(crate) fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_names() {
        assert_eq!(Field::any().kind().name(), "any");
        assert_eq!(Field::string().kind().name(), "string");
        assert_eq!(Field::map_of(Field::any()).kind().name(), "map");
    }

    #[test]
    fn test_make_default_unconfigured_is_null() {
        assert_eq!(Field::string().make_default(), Value::Null);
    }

    #[test]
    fn test_make_default_fixed() {
        let field = Field::integer().default_value(7);
        assert_eq!(field.make_default(), json!(7));
    }

    #[test]
    fn test_make_default_producer_receives_field() {
        let field = Field::string()
            .labels(["seed"])
            .default_with(|f| json!(f.label_set().len()));
        assert_eq!(field.make_default(), json!(1));
    }

    #[test]
    fn test_choices_rejected_on_map_and_document() {
        let err = Field::map_of(Field::any()).choices([json!(1)]).unwrap_err();
        assert!(matches!(err, DefinitionError::ChoicesNotAllowed("map")));
    }

    #[test]
    fn test_choices_clear_bounds() {
        let field = Field::integer()
            .min(0)
            .max(10)
            .choices([json!(99)])
            .unwrap();
        // 99 is outside the old bounds but valid: choices replaced them
        assert!(field.is_valid_value(&json!(99)));
    }

    #[test]
    fn test_duplicate_choice_code_rejected() {
        let err = Field::string()
            .choice_codes([(json!("a"), json!(1)), (json!("b"), json!(1))])
            .unwrap_err();
        assert!(matches!(err, DefinitionError::DuplicateChoiceCode(_)));
    }

    #[test]
    fn test_pattern_rejected_on_non_string() {
        let err = Field::integer().pattern(r"^\d+$").unwrap_err();
        assert!(matches!(err, DefinitionError::PatternNotAllowed));
    }

    #[test]
    fn test_present_treats_null_as_absent() {
        let null = Value::Null;
        let one = json!(1);
        assert!(present(Some(&null)).is_none());
        assert!(present(None).is_none());
        assert_eq!(present(Some(&one)), Some(&one));
    }
}
