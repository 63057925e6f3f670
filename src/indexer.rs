//! Document indexer: one entity type's binding to the search backend.

use std::sync::Arc;

use crate::backend::{BackendConnector, DeleteResponse, IndexResponse, SearchBackend};
use crate::config::{GlobalConfig, IndexerConfig};
use crate::document::Document;
use crate::document::field_value::FieldValue;
use crate::entity::{Cardinality, Entity, EntityStore, EntityType, Related};
use crate::error::{LianaError, Result};
use crate::schema::field::{FieldMapping, SourcePath, field_type_for_kind};
use crate::schema::schema::IndexSchema;

/// Owns one entity type's binding to the search backend.
///
/// Construction resolves the connection, index name, document-type name,
/// primary key, and index schema, in that order, raising a fatal
/// [`LianaError::Configuration`] the first time a required value is absent
/// or invalid. After resolution the indexer idempotently ensures the backend
/// index exists and the document-type mapping is registered. The resolved
/// state is immutable for the indexer's lifetime; only the bound entity
/// instance changes between calls.
pub struct DocumentIndexer {
    backend: Arc<dyn SearchBackend>,
    index_name: String,
    doc_type: String,
    entity_type: Arc<dyn EntityType>,
    schema: IndexSchema,
    instance: Option<Box<dyn Entity>>,
}

impl DocumentIndexer {
    /// Create a new indexer from declared field mappings and explicit
    /// configuration.
    ///
    /// `fields` is the entity type's composed field-mapping table (see
    /// [`crate::schema::compose_fields`] for inheritance). Configuration
    /// precedence: explicit values in `config` win over `global` defaults.
    pub fn new(
        fields: Vec<FieldMapping>,
        config: IndexerConfig,
        global: &GlobalConfig,
        connector: &dyn BackendConnector,
        store: &dyn EntityStore,
    ) -> Result<Self> {
        let backend = Self::resolve_connection(&config, global, connector)?;
        let index_name = Self::resolve_index_name(&config, global)?;
        let doc_type = Self::resolve_doc_type(&config, store)?;
        let entity_type = Self::resolve_entity_type(&config, store)?;
        let schema = Self::resolve_schema(fields, &config, entity_type.as_ref())?;

        // Make sure the index and the document-type mapping exist.
        if !backend.index_exists(&index_name)? {
            backend.create_index(&index_name)?;
        }
        if !backend.mapping_exists(&index_name, &doc_type)? {
            backend.put_mapping(&index_name, &doc_type, &schema.mapping_body())?;
        }

        Ok(DocumentIndexer {
            backend,
            index_name,
            doc_type,
            entity_type,
            schema,
            instance: None,
        })
    }

    /// Bind the entity instance subsequent index/delete calls operate on.
    pub fn bind(&mut self, instance: Box<dyn Entity>) {
        self.instance = Some(instance);
    }

    /// Unbind the current entity instance.
    pub fn unbind(&mut self) {
        self.instance = None;
    }

    /// Get the resolved backend connection.
    pub fn backend(&self) -> &Arc<dyn SearchBackend> {
        &self.backend
    }

    /// Get the resolved index name.
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Get the resolved document-type name.
    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    /// Get the bound entity type.
    pub fn entity_type(&self) -> &Arc<dyn EntityType> {
        &self.entity_type
    }

    /// Get the resolved index schema.
    pub fn schema(&self) -> &IndexSchema {
        &self.schema
    }

    /// Upsert the bound entity's document into the backend with immediate
    /// read-after-write visibility.
    ///
    /// Returns the backend's response record, or the all-`None` shape
    /// without issuing a backend call when no entity instance is bound.
    pub fn index(&self) -> Result<IndexResponse> {
        let document = self.make_document();
        if !document.is_empty() {
            let id = self.document_id(&document);
            let response =
                self.backend
                    .index_document(&self.index_name, &self.doc_type, &document, &id, true)?;
            log::debug!("index result: {response:?}");
            return Ok(response);
        }
        log::debug!("index result: none, there is no document");
        Ok(IndexResponse::default())
    }

    /// Delete the bound entity's document from the backend with immediate
    /// visibility.
    ///
    /// Returns the backend's response record, or the all-`None` shape
    /// without issuing a backend call when no entity instance is bound.
    pub fn delete(&self) -> Result<DeleteResponse> {
        let document = self.make_document();
        if !document.is_empty() {
            let id = self.document_id(&document);
            let response =
                self.backend
                    .delete_document(&self.index_name, &self.doc_type, &id, true)?;
            log::debug!("delete result: {response:?}");
            return Ok(response);
        }
        log::debug!("delete result: none, there is no document");
        Ok(DeleteResponse::default())
    }

    /// Assemble the document for the currently bound entity instance.
    ///
    /// Assembly is lenient: unresolvable attribute paths, absent relations,
    /// and unsupported relation kinds degrade to null; an empty to-many
    /// collection yields an empty string. The primary-key value is set last,
    /// overwriting any same-named mapped field. Without a bound instance the
    /// document is empty.
    pub fn make_document(&self) -> Document {
        let mut document = Document::new();
        let Some(instance) = self.instance.as_deref() else {
            return document;
        };

        for mapping in self.schema.fields() {
            let value = match mapping.source() {
                SourcePath::Attribute(name) => {
                    let value = instance.attribute(name).unwrap_or(FieldValue::Null);
                    mapping.field_type().to_backend(&value)
                }
                SourcePath::Relation {
                    relation,
                    attribute,
                } => Self::traverse_relation(instance, relation, attribute, mapping),
            };
            document.add_field(mapping.name(), value);
        }

        let pk_name = self.schema.primary_key_name();
        let pk_value = instance.attribute(pk_name).unwrap_or(FieldValue::Null);
        document.add_field(pk_name, self.schema.primary_key_type().to_backend(&pk_value));

        log::debug!("document created: {document:?}");
        document
    }

    /// Read a relation field value off the bound instance, dispatching on
    /// the cardinality stored on the mapping at schema-composition time.
    fn traverse_relation(
        instance: &dyn Entity,
        relation: &str,
        attribute: &str,
        mapping: &FieldMapping,
    ) -> FieldValue {
        let Some(related) = instance.related(relation) else {
            return FieldValue::Null;
        };
        match (mapping.cardinality(), related) {
            (Some(Cardinality::ToOne), Related::One(object)) => {
                let value = object.attribute(attribute).unwrap_or(FieldValue::Null);
                mapping.field_type().to_backend(&value)
            }
            (Some(Cardinality::ToMany), Related::Many(objects)) => {
                // Already backend-ready text; the converter is not applied.
                let joined = objects
                    .iter()
                    .map(|object| {
                        object
                            .attribute(attribute)
                            .unwrap_or(FieldValue::Null)
                            .to_string()
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                FieldValue::Text(joined)
            }
            _ => FieldValue::Null,
        }
    }

    fn document_id(&self, document: &Document) -> FieldValue {
        document
            .get_field(self.schema.primary_key_name())
            .cloned()
            .unwrap_or(FieldValue::Null)
    }

    fn resolve_connection(
        config: &IndexerConfig,
        global: &GlobalConfig,
        connector: &dyn BackendConnector,
    ) -> Result<Arc<dyn SearchBackend>> {
        if let Some(backend) = &config.connection {
            log::debug!("connecting to backend from explicit connection override");
            return Ok(Arc::clone(backend));
        }
        if let Some(connection) = &global.connection {
            log::debug!("connecting to backend from process-wide configuration");
            return connector.connect(connection);
        }
        log::error!("no backend connection information found");
        Err(LianaError::configuration(
            "No backend connection information found",
        ))
    }

    fn resolve_index_name(config: &IndexerConfig, global: &GlobalConfig) -> Result<String> {
        if let Some(index) = &config.index {
            log::debug!("using index {index}");
            return Ok(index.clone());
        }
        if let Some(index) = &global.default_index {
            log::debug!("using index {index}");
            return Ok(index.clone());
        }
        log::error!("no index name information found");
        Err(LianaError::configuration("No index name information found"))
    }

    fn resolve_doc_type(config: &IndexerConfig, store: &dyn EntityStore) -> Result<String> {
        if let Some(doc_type) = &config.doc_type {
            log::debug!("using document type {doc_type}");
            return Ok(doc_type.clone());
        }
        if config.entity_type.is_some() {
            let entity_type = Self::resolve_entity_type(config, store)?;
            let name = entity_type.name().to_string();
            log::debug!("created document type name {name}");
            return Ok(name);
        }
        log::error!("no document type name information found");
        Err(LianaError::configuration(
            "No document type name information found",
        ))
    }

    fn resolve_entity_type(
        config: &IndexerConfig,
        store: &dyn EntityStore,
    ) -> Result<Arc<dyn EntityType>> {
        let Some(entity_type) = &config.entity_type else {
            log::error!("no entity type information found");
            return Err(LianaError::configuration(
                "No entity type information found",
            ));
        };
        if store.entity_type(entity_type.name()).is_none() {
            log::error!(
                "configured entity type {} is not recognized by the entity store",
                entity_type.name()
            );
            return Err(LianaError::configuration(format!(
                "Entity type '{}' is not recognized by the entity store",
                entity_type.name()
            )));
        }
        Ok(Arc::clone(entity_type))
    }

    fn resolve_schema(
        mut fields: Vec<FieldMapping>,
        config: &IndexerConfig,
        entity_type: &dyn EntityType,
    ) -> Result<IndexSchema> {
        let (pk_name, pk_kind) = entity_type.primary_key();
        let pk_name = pk_name.to_string();
        log::debug!("entity primary key: {pk_name}, {pk_kind}");

        let Some(pk_type) = field_type_for_kind(pk_kind) else {
            log::error!("primary key field-kind {pk_kind} is not indexable");
            return Err(LianaError::configuration(format!(
                "Primary key field-kind '{pk_kind}' is not indexable"
            )));
        };

        // Relation cardinality is resolved once here; document assembly
        // dispatches on the stored classification.
        for mapping in &mut fields {
            let relation = match mapping.source() {
                SourcePath::Relation { relation, .. } => Some(relation.clone()),
                SourcePath::Attribute(_) => None,
            };
            if let Some(relation) = relation {
                let cardinality = entity_type
                    .relation_kind(&relation)
                    .and_then(|kind| kind.cardinality());
                mapping.set_cardinality(cardinality);
            }
        }

        let dynamic = config.dynamic.clone().unwrap_or_default();
        let schema = IndexSchema::new(fields, pk_name, pk_type, dynamic);
        log::debug!("mapping created: {}", schema.mapping_body());
        Ok(schema)
    }
}

impl std::fmt::Debug for DocumentIndexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentIndexer")
            .field("index_name", &self.index_name)
            .field("doc_type", &self.doc_type)
            .field("entity_type", &self.entity_type.name().to_string())
            .field("bound", &self.instance.is_some())
            .finish()
    }
}
