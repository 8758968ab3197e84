//! # Docshape
//!
//! Declarative schemas for nested dictionary documents: validation,
//! defaulting, deep-merge updates, and store transcoding, all driven by
//! one schema declaration.
//!
//! ## Overview
//!
//! A document here is a `serde_json::Map<String, Value>`. A
//! [`DocumentType`] names an ordered set of [`Field`] definitions and
//! derives every document operation from them:
//!
//! - **validation**: [`DocumentType::get_document_errors`] collects every
//!   error with a dotted key path; [`DocumentType::is_document_valid`]
//!   stops at the first one;
//! - **defaulting**: [`DocumentType::make_default`] builds a fresh
//!   document, [`DocumentType::clean_document`] default-fills and prunes
//!   an existing one;
//! - **updating**: [`DocumentType::update`] deep-merges a partial
//!   document per field-specific rules;
//! - **extensions**: label-based redaction
//!   ([`DocumentType::clean_labels`]) and a bidirectional store mapping
//!   ([`DocumentType::map_to_store`] / [`DocumentType::map_from_store`]).
//!
//! Everywhere, an absent key and an explicit JSON `null` mean the same
//! thing.
//!
//! ## Core Types
//!
//! - [`Field`]: one schema slot (kind, required, choices, default,
//!   labels, storage key)
//! - [`FieldKind`]: the closed set of field kinds
//! - [`DocumentType`]: a named, ordered field set built by
//!   [`DocumentTypeBuilder`], with inheritance and [`Mixin`] hooks
//! - [`ValidationError`]: a single reported error with its [`KeyPath`]
//! - [`ModelRegistry`]: a thread-safe name-to-type registry
//!
//! ## Example
//!
//! ```rust
//! use docshape::{DocumentType, Field};
//! use serde_json::json;
//!
//! let address = DocumentType::builder("Address")
//!     .field("city", Field::string().required())
//!     .field("zip", Field::string().pattern(r"^\d{5}$").unwrap())
//!     .build_shared();
//!
//! let user = DocumentType::builder("User")
//!     .field("name", Field::string().required())
//!     .field("address", Field::document(address))
//!     .build();
//!
//! let document = json!({"name": "alice", "address": {"city": "Oslo", "zip": "bad"}});
//! let errors = user.get_document_errors(document.as_object().unwrap());
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors[0].path.to_string(), "address.zip");
//! ```

pub mod document;
pub mod error;
pub mod field;
pub mod labels;
pub mod path;
pub mod registry;
pub mod store;

pub use document::{DocumentType, DocumentTypeBuilder, Mixin};
pub use error::{DefinitionError, ErrorKind, ValidationError, ValueError};
pub use field::{Choices, CleanOptions, Field, FieldKind};
pub use path::{KeyPath, PathSegment};
pub use registry::{ModelRegistry, RegistryError};
pub use store::STORE_TIMESTAMP_PRECISION;
