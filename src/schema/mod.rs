//! Schema module for Liana.
//!
//! This module translates relational field kinds into search-engine index
//! schemas: scalar converters and the field-kind lookup table live in
//! [`field`], ordered schema composition and mapping-body emission live in
//! [`schema`].

pub mod field;
#[allow(clippy::module_inception)]
pub mod schema;

// Re-export commonly used types
pub use field::{
    FieldMapping, FieldType, SourcePath, field_type_for_kind, mapping_for_kind,
};
pub use schema::{DynamicMapping, IndexSchema, compose_fields};
