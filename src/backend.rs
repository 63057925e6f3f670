//! Search-backend collaborator interfaces.
//!
//! The search backend is an external collaborator; this module specifies
//! the client surface the bridge requires: index and mapping existence
//! checks with idempotent creation, document upsert/delete with immediate
//! read-after-write visibility, and query execution returning ordered,
//! scored hits.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::config::ConnectionConfig;
use crate::document::Document;
use crate::document::field_value::FieldValue;
use crate::error::Result;

/// A full-text search request: a match query over all indexed text plus
/// exact-match term filters ANDed into the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// The query string matched against the textual contents of documents.
    pub query: String,
    /// Exact-match (field, value) filters.
    pub filters: Vec<(String, FieldValue)>,
}

impl SearchRequest {
    /// Create a new request with no filters.
    pub fn new<S: Into<String>>(query: S) -> Self {
        SearchRequest {
            query: query.into(),
            filters: Vec::new(),
        }
    }

    /// AND an exact-term filter on a field into the query.
    pub fn filter<S: Into<String>>(mut self, field: S, value: FieldValue) -> Self {
        self.filters.push((field.into(), value));
        self
    }
}

/// One result row from a search query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// The document-type name the hit belongs to.
    pub doc_type: String,
    /// The hit's fields, including the primary key.
    pub fields: HashMap<String, FieldValue>,
    /// The relevance score.
    pub score: f32,
}

/// The backend's response to a document upsert.
///
/// All fields are `None` when no backend call was made because no entity
/// instance was bound.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexResponse {
    /// The document-type name.
    #[serde(rename = "_type")]
    pub doc_type: Option<String>,
    /// Whether the document was created (as opposed to updated).
    pub created: Option<bool>,
    /// The document version after the write.
    #[serde(rename = "_version")]
    pub version: Option<i64>,
    /// The index written to.
    #[serde(rename = "_index")]
    pub index: Option<String>,
    /// The document id.
    #[serde(rename = "_id")]
    pub id: Option<FieldValue>,
}

/// The backend's response to a document delete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Whether the document existed.
    pub found: Option<bool>,
    /// The document-type name.
    #[serde(rename = "_type")]
    pub doc_type: Option<String>,
    /// The document version after the delete.
    #[serde(rename = "_version")]
    pub version: Option<i64>,
    /// The index deleted from.
    #[serde(rename = "_index")]
    pub index: Option<String>,
    /// The document id.
    #[serde(rename = "_id")]
    pub id: Option<FieldValue>,
}

/// The search-backend client surface.
///
/// Every call blocks until the backend responds; timeout policy belongs to
/// the implementation. Communication failures are not intercepted by the
/// bridge and propagate to the caller of the triggering operation.
pub trait SearchBackend: Send + Sync {
    /// Check whether an index exists.
    fn index_exists(&self, index: &str) -> Result<bool>;

    /// Create an index. Must tolerate idempotent creation under concurrent
    /// first-time construction.
    fn create_index(&self, index: &str) -> Result<()>;

    /// Check whether a document type's mapping is registered on an index.
    fn mapping_exists(&self, index: &str, doc_type: &str) -> Result<bool>;

    /// Register a document type's mapping on an index.
    fn put_mapping(&self, index: &str, doc_type: &str, mapping: &JsonValue) -> Result<()>;

    /// Upsert a document at the given id. `refresh` requests immediate
    /// read-after-write visibility.
    fn index_document(
        &self,
        index: &str,
        doc_type: &str,
        document: &Document,
        id: &FieldValue,
        refresh: bool,
    ) -> Result<IndexResponse>;

    /// Delete the document with the given id. `refresh` requests immediate
    /// visibility.
    fn delete_document(
        &self,
        index: &str,
        doc_type: &str,
        id: &FieldValue,
        refresh: bool,
    ) -> Result<DeleteResponse>;

    /// Execute a search, optionally restricted to one document type, and
    /// return the ordered hits.
    fn search(
        &self,
        index: &str,
        doc_type: Option<&str>,
        request: &SearchRequest,
    ) -> Result<Vec<SearchHit>>;
}

/// Builds backend connections from process-wide connection configuration.
///
/// How a host list, transport selector, and extra client options become a
/// live client is the collaborator's concern; the bridge only resolves which
/// configuration applies.
pub trait BackendConnector: Send + Sync {
    /// Open a connection described by the given configuration.
    fn connect(&self, connection: &ConnectionConfig) -> Result<Arc<dyn SearchBackend>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_filters() {
        let request = SearchRequest::new("foo")
            .filter("status", FieldValue::Text("published".to_string()))
            .filter("year", FieldValue::Integer(2024));

        assert_eq!(request.query, "foo");
        assert_eq!(request.filters.len(), 2);
        assert_eq!(request.filters[0].0, "status");
    }

    #[test]
    fn test_empty_response_shapes() {
        let index = IndexResponse::default();
        assert!(index.doc_type.is_none());
        assert!(index.created.is_none());
        assert!(index.version.is_none());
        assert!(index.index.is_none());
        assert!(index.id.is_none());

        let delete = DeleteResponse::default();
        assert!(delete.found.is_none());
        assert!(delete.id.is_none());
    }

    #[test]
    fn test_response_wire_names() {
        let response = IndexResponse {
            doc_type: Some("blog.article".to_string()),
            created: Some(true),
            version: Some(1),
            index: Some("main".to_string()),
            id: Some(FieldValue::Integer(7)),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["_type"], "blog.article");
        assert_eq!(json["created"], true);
        assert_eq!(json["_version"], 1);
        assert_eq!(json["_index"], "main");
    }
}
