//! Choice sets and bijective value-to-code mappings.

use serde_json::Value;

use crate::error::DefinitionError;

/// An enumerated restriction on a field's valid values.
///
/// A plain set restricts membership. A code mapping additionally assigns
/// each value a storage code; the mapping must be a bijection, checked at
/// construction, so the reverse lookup is always unambiguous.
#[derive(Clone, Debug)]
pub enum Choices {
    /// A plain set of valid values.
    Values(Vec<Value>),
    /// A bijective value-to-code mapping, stored as `(value, code)` pairs.
    Codes(Vec<(Value, Value)>),
}

impl Choices {
    /// Builds a plain choice set, rejecting duplicate values.
    pub(crate) fn values(values: Vec<Value>) -> Result<Self, DefinitionError> {
        for (i, value) in values.iter().enumerate() {
            if values[..i].contains(value) {
                return Err(DefinitionError::DuplicateChoice(value.clone()));
            }
        }
        Ok(Choices::Values(values))
    }

    /// Builds a code mapping, rejecting duplicate values and duplicate
    /// codes (a non-bijective mapping has no usable reverse).
    pub(crate) fn codes(pairs: Vec<(Value, Value)>) -> Result<Self, DefinitionError> {
        for (i, (value, code)) in pairs.iter().enumerate() {
            if pairs[..i].iter().any(|(v, _)| v == value) {
                return Err(DefinitionError::DuplicateChoice(value.clone()));
            }
            if pairs[..i].iter().any(|(_, c)| c == code) {
                return Err(DefinitionError::DuplicateChoiceCode(code.clone()));
            }
        }
        Ok(Choices::Codes(pairs))
    }

    /// Returns true when `value` is one of the valid choices.
    pub fn contains(&self, value: &Value) -> bool {
        match self {
            Choices::Values(values) => values.contains(value),
            Choices::Codes(pairs) => pairs.iter().any(|(v, _)| v == value),
        }
    }

    /// Returns the storage code for a value, for code mappings.
    pub fn code_for(&self, value: &Value) -> Option<&Value> {
        match self {
            Choices::Values(_) => None,
            Choices::Codes(pairs) => pairs.iter().find(|(v, _)| v == value).map(|(_, c)| c),
        }
    }

    /// Returns the value for a storage code, for code mappings. This is
    /// the reverse mapping derived at construction.
    pub fn value_for(&self, code: &Value) -> Option<&Value> {
        match self {
            Choices::Values(_) => None,
            Choices::Codes(pairs) => pairs.iter().find(|(_, c)| c == code).map(|(v, _)| v),
        }
    }

    /// Returns true when this is a code mapping rather than a plain set.
    pub fn is_coded(&self) -> bool {
        matches!(self, Choices::Codes(_))
    }
}
