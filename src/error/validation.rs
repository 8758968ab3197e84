//! Validation error records and the error-collection sink.
//!
//! Validation failures are data, not control flow: every check produces
//! [`ValidationError`] records pushed into an [`ErrorSink`]. The sink either
//! collects the whole ordered sequence or stops the traversal at the first
//! error, which is how `is_valid` style queries avoid over-computing.

use std::fmt::{self, Display};
use std::ops::ControlFlow;

use serde_json::Value;

use crate::path::KeyPath;

/// The kind of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required value was null or absent.
    Required,
    /// A value had the wrong runtime category for its field kind.
    Type,
    /// A value violated a constraint (choices, bounds, pattern).
    Value,
}

impl ErrorKind {
    /// Returns the stable string tag for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Required => "required",
            ErrorKind::Type => "type",
            ErrorKind::Value => "value",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation error with full context.
///
/// `ValidationError` captures where in the document the failure occurred
/// (a dotted [`KeyPath`], empty when the value was checked without key
/// context), what went wrong, and optionally the offending value.
///
/// # Example
///
/// ```rust
/// use docshape::{ErrorKind, KeyPath, ValidationError};
///
/// let error = ValidationError::new(
///     ErrorKind::Value,
///     KeyPath::root().push_key("age"),
///     "value out of bounds",
/// );
/// assert_eq!(error.kind, ErrorKind::Value);
/// assert_eq!(error.path.to_string(), "age");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// The kind of failure.
    pub kind: ErrorKind,
    /// The dotted path to the value that failed validation.
    pub path: KeyPath,
    /// Human-readable description of the failure.
    pub message: String,
    /// The offending value, when one was present.
    pub value: Option<Value>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(kind: ErrorKind, path: KeyPath, message: impl Into<String>) -> Self {
        Self {
            kind,
            path,
            message: message.into(),
            value: None,
        }
    }

    /// Attaches the offending value and returns self for chaining.
    pub fn with_value(mut self, value: &Value) -> Self {
        self.value = Some(value.clone());
        self
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "[{}] {}", self.kind, self.message)?;
        } else {
            write!(f, "{}: [{}] {}", self.path, self.kind, self.message)?;
        }
        if let Some(ref value) = self.value {
            write!(f, " (got: {})", value)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Collects validation errors during a recursive check.
///
/// A collecting sink accumulates every error in traversal order. A probing
/// sink breaks the traversal at the first error, so validity queries never
/// drain the full error sequence.
pub(crate) struct ErrorSink {
    errors: Vec<ValidationError>,
    stop_at_first: bool,
}

impl ErrorSink {
    /// A sink that accumulates every error.
    pub(crate) fn collecting() -> Self {
        Self {
            errors: Vec::new(),
            stop_at_first: false,
        }
    }

    /// A sink that stops the traversal at the first error.
    pub(crate) fn probing() -> Self {
        Self {
            errors: Vec::new(),
            stop_at_first: true,
        }
    }

    /// Records an error; breaks the traversal when probing.
    pub(crate) fn push(&mut self, error: ValidationError) -> ControlFlow<()> {
        self.errors.push(error);
        if self.stop_at_first {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    /// True iff no error was recorded.
    pub(crate) fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Consumes the sink and returns the ordered errors.
    pub(crate) fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}
