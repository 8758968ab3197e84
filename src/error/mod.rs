//! Error types for validation failures and schema misconfiguration.
//!
//! Two very different things can go wrong in this crate, and they are kept
//! strictly apart:
//!
//! - **Data invalidity** is reported as plain data: an ordered sequence of
//!   [`ValidationError`] records. It is never raised; callers decide what is
//!   fatal.
//! - **Schema misconfiguration** is a programming error and is raised as
//!   [`DefinitionError`] at schema-definition time. [`ValueError`] is a
//!   raised kind reserved for extensions such as the store adapter.

mod validation;

pub use validation::{ErrorKind, ValidationError};

pub(crate) use validation::ErrorSink;

use serde_json::Value;

/// A fatal error raised when a field is constructed with an invalid
/// configuration.
///
/// These always indicate a bug in the schema declaration, not in the data
/// being validated, and they surface as soon as the field is built.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    /// `choices` was configured on a field kind that cannot carry it
    /// (map and document fields).
    #[error("choices are not allowed on {0} fields")]
    ChoicesNotAllowed(&'static str),

    /// The same value appears twice in a choice set or code mapping.
    #[error("duplicate choice value: {0}")]
    DuplicateChoice(Value),

    /// A choice code mapping is not a bijection: two values map to the
    /// same storage code.
    #[error("choice mapping is not a bijection: duplicate code {0}")]
    DuplicateChoiceCode(Value),

    /// A regex pattern was configured on a non-string field.
    #[error("a pattern is only valid on string fields")]
    PatternNotAllowed,

    /// The regex pattern itself failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// A raised error for values that cannot be transformed.
///
/// The core validation path never raises this; it reports invalid data as
/// [`ValidationError`] records instead. Extensions that must transform
/// values in place (the store adapter) raise it when a value cannot be
/// transcoded.
#[derive(Debug, thiserror::Error)]
#[error("invalid value for field '{field}': {message}")]
pub struct ValueError {
    /// The declared field name the value belongs to.
    pub field: String,
    /// What could not be done with the value.
    pub message: String,
}

impl ValueError {
    /// Creates a new value error for the given field.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
