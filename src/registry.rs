//! A registry for storing and retrieving built document types by name.
//!
//! Type definitions are immutable once built, so the registry hands out
//! shared `Arc`s. Registration is serialized behind a write lock; lookups
//! from concurrent validators only need read access.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::document::DocumentType;

/// A thread-safe registry of named document types.
///
/// # Example
///
/// ```rust
/// use docshape::{DocumentType, Field, ModelRegistry};
///
/// let registry = ModelRegistry::new();
/// let user = DocumentType::builder("User")
///     .field("name", Field::string().required())
///     .build_shared();
///
/// registry.register(user).unwrap();
/// assert!(registry.get("User").is_some());
///
/// // Duplicate registration fails
/// let again = DocumentType::builder("User").build_shared();
/// assert!(registry.register(again).is_err());
/// ```
#[derive(Default)]
pub struct ModelRegistry {
    models: RwLock<HashMap<String, Arc<DocumentType>>>,
}

impl ModelRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a built document type under its own name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if the name is already
    /// registered.
    pub fn register(&self, model: Arc<DocumentType>) -> Result<(), RegistryError> {
        let mut models = self.models.write();
        let name = model.name().to_string();
        if models.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }
        models.insert(name, model);
        Ok(())
    }

    /// Retrieves a document type by name, or `None` when unregistered.
    pub fn get(&self, name: &str) -> Option<Arc<DocumentType>> {
        self.models.read().get(name).cloned()
    }

    /// Retrieves a document type by name, failing when unregistered.
    pub fn lookup(&self, name: &str) -> Result<Arc<DocumentType>, RegistryError> {
        self.get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// Returns the registered type names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.models.read().keys().cloned().collect();
        names.sort();
        names
    }
}

/// Errors that can occur during registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Attempted to register a type with a name that already exists.
    #[error("model '{0}' already registered")]
    DuplicateName(String),

    /// Attempted to look up a type name that doesn't exist.
    #[error("model '{0}' not found")]
    NotFound(String),
}
