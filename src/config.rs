//! Configuration for indexers and searchers.
//!
//! Configuration is explicit: the process-wide defaults are a value the
//! caller threads into construction, and per-entity-type overrides are a
//! structured [`IndexerConfig`] with named optional fields. This layer never
//! performs ambient global lookups.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::backend::SearchBackend;
use crate::entity::EntityType;
use crate::schema::schema::DynamicMapping;

/// Connection information for the search backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConnectionConfig {
    /// Backend host list.
    pub hosts: Vec<String>,
    /// Optional transport selector.
    pub transport: Option<String>,
    /// Extra client options passed through to the connector.
    #[serde(default)]
    pub options: HashMap<String, JsonValue>,
}

impl ConnectionConfig {
    /// Create a connection configuration from a host list.
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ConnectionConfig {
            hosts: hosts.into_iter().map(Into::into).collect(),
            transport: None,
            options: HashMap::new(),
        }
    }

    /// Set the transport selector.
    pub fn transport<S: Into<String>>(mut self, transport: S) -> Self {
        self.transport = Some(transport.into());
        self
    }

    /// Add an extra client option.
    pub fn option<S: Into<String>>(mut self, key: S, value: JsonValue) -> Self {
        self.options.insert(key.into(), value);
        self
    }
}

/// Process-wide configuration, read-only from this layer's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GlobalConfig {
    /// Default connection information, used when an indexer carries no
    /// explicit connection override.
    pub connection: Option<ConnectionConfig>,
    /// Default index name, used when an indexer or searcher carries no
    /// explicit index name.
    pub default_index: Option<String>,
}

/// Per-entity-type configuration for one indexer.
///
/// Every field is optional; explicit values take precedence over the
/// process-wide defaults in [`GlobalConfig`].
#[derive(Clone, Default)]
pub struct IndexerConfig {
    /// Explicit backend connection handle.
    pub connection: Option<Arc<dyn SearchBackend>>,
    /// Explicit index name.
    pub index: Option<String>,
    /// Explicit document-type name.
    pub doc_type: Option<String>,
    /// Explicit dynamic-mapping mode.
    pub dynamic: Option<DynamicMapping>,
    /// The bound entity type.
    pub entity_type: Option<Arc<dyn EntityType>>,
}

impl IndexerConfig {
    /// Create a builder for constructing indexer configuration.
    pub fn builder() -> IndexerConfigBuilder {
        IndexerConfigBuilder::default()
    }
}

impl std::fmt::Debug for IndexerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexerConfig")
            .field("connection", &self.connection.as_ref().map(|_| "<backend>"))
            .field("index", &self.index)
            .field("doc_type", &self.doc_type)
            .field("dynamic", &self.dynamic)
            .field(
                "entity_type",
                &self.entity_type.as_ref().map(|t| t.name().to_string()),
            )
            .finish()
    }
}

/// A builder for constructing indexer configuration in a fluent manner.
#[derive(Default)]
pub struct IndexerConfigBuilder {
    config: IndexerConfig,
}

impl IndexerConfigBuilder {
    /// Set an explicit backend connection handle.
    pub fn connection(mut self, connection: Arc<dyn SearchBackend>) -> Self {
        self.config.connection = Some(connection);
        self
    }

    /// Set an explicit index name.
    pub fn index<S: Into<String>>(mut self, index: S) -> Self {
        self.config.index = Some(index.into());
        self
    }

    /// Set an explicit document-type name.
    pub fn doc_type<S: Into<String>>(mut self, doc_type: S) -> Self {
        self.config.doc_type = Some(doc_type.into());
        self
    }

    /// Set an explicit dynamic-mapping mode.
    pub fn dynamic(mut self, dynamic: DynamicMapping) -> Self {
        self.config.dynamic = Some(dynamic);
        self
    }

    /// Bind the entity type this indexer owns.
    pub fn entity_type(mut self, entity_type: Arc<dyn EntityType>) -> Self {
        self.config.entity_type = Some(entity_type);
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> IndexerConfig {
        self.config
    }
}
