//! # Liana
//!
//! A bridge that keeps a relational entity store and a full-text search
//! index consistent, and runs search queries that return live entities
//! ranked by relevance.
//!
//! ## Features
//!
//! - Relational field-kind to index-schema type mapping
//! - Inheritance-aware schema composition
//! - Document assembly with to-one / to-many relation traversal
//! - Idempotent index and mapping registration
//! - Cross-type search with score-ranked entity reconstruction

pub mod backend;
pub mod config;
pub mod document;
pub mod entity;
pub mod error;
pub mod indexer;
pub mod schema;
pub mod search;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
