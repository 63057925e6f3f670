//! Document module.
//!
//! This module provides the backend-ready representation of one entity:
//! the [`FieldValue`] type system and the [`Document`] container assembled
//! by an indexer and consumed by the search backend.

pub mod document;
pub mod field_value;

pub use document::Document;
pub use field_value::FieldValue;
