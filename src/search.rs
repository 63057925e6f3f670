//! Search orchestration: query execution and ranked entity reconstruction.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::backend::{SearchBackend, SearchRequest};
use crate::config::GlobalConfig;
use crate::document::field_value::FieldValue;
use crate::entity::{Entity, EntityStore, EntityType};
use crate::error::{LianaError, Result};
use crate::indexer::DocumentIndexer;

/// A fetched entity with its relevance score attached.
pub struct ScoredEntity {
    /// The reconstructed entity.
    pub entity: Box<dyn Entity>,
    /// The entity's type descriptor.
    pub entity_type: Arc<dyn EntityType>,
    /// The relevance score from the search hit.
    pub score: f32,
}

impl std::fmt::Debug for ScoredEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoredEntity")
            .field("entity_type", &self.entity_type.name().to_string())
            .field("score", &self.score)
            .finish()
    }
}

/// Per-type accumulation of hits before entities are fetched.
struct HitGroup {
    entity_type: Arc<dyn EntityType>,
    /// Primary-key values with their scores, in first-hit order. A duplicate
    /// key keeps the later hit's score.
    scores: Vec<(FieldValue, f32)>,
}

/// Executes full-text queries and reconstructs ranked entities from hits.
///
/// Two operating modes share one algorithm: unscoped searches cover the
/// whole index and may return any indexed entity type; scoped searches are
/// restricted to one indexer's document type. Each call is a single
/// synchronous request/response cycle with no state across calls.
pub struct SearchOrchestrator {
    backend: Arc<dyn SearchBackend>,
    store: Arc<dyn EntityStore>,
    index_name: String,
    doc_type: Option<String>,
}

impl std::fmt::Debug for SearchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchOrchestrator")
            .field("index_name", &self.index_name)
            .field("doc_type", &self.doc_type)
            .finish_non_exhaustive()
    }
}

impl SearchOrchestrator {
    /// Create an orchestrator searching the whole index.
    ///
    /// The index name comes from the explicit override if given, else the
    /// process-wide default; absent both, a configuration error is raised.
    pub fn unscoped(
        backend: Arc<dyn SearchBackend>,
        store: Arc<dyn EntityStore>,
        index_name: Option<String>,
        global: &GlobalConfig,
    ) -> Result<Self> {
        let index_name = match index_name.or_else(|| global.default_index.clone()) {
            Some(name) => name,
            None => {
                log::error!("no index name information found");
                return Err(LianaError::configuration("No index name information found"));
            }
        };
        Ok(SearchOrchestrator {
            backend,
            store,
            index_name,
            doc_type: None,
        })
    }

    /// Create an orchestrator restricted to one indexer's document type,
    /// sharing its backend connection and index.
    pub fn scoped(indexer: &DocumentIndexer, store: Arc<dyn EntityStore>) -> Self {
        SearchOrchestrator {
            backend: Arc::clone(indexer.backend()),
            store,
            index_name: indexer.index_name().to_string(),
            doc_type: Some(indexer.doc_type().to_string()),
        }
    }

    /// Run a full-text query and return live entities ranked by descending
    /// relevance score.
    ///
    /// `filters` are exact-match (field, value) pairs ANDed into the query.
    /// Hits are grouped by entity type, entities are batch-fetched per type,
    /// scores are attached, and the concatenation is sorted by descending
    /// score. The sort is stable: equal scores keep per-type fetch order. A
    /// hit whose document type cannot be resolved to a known entity type is
    /// a fatal error, not skipped.
    pub fn search(
        &self,
        query: &str,
        filters: &[(String, FieldValue)],
    ) -> Result<Vec<ScoredEntity>> {
        let mut request = SearchRequest::new(query);
        for (field, value) in filters {
            request = request.filter(field.clone(), value.clone());
        }

        let hits = self
            .backend
            .search(&self.index_name, self.doc_type.as_deref(), &request)?;

        // Group hits by resolved entity type, remembering each primary-key
        // value's score.
        let mut groups: Vec<HitGroup> = Vec::new();
        for hit in hits {
            let entity_type = self.store.entity_type(&hit.doc_type).ok_or_else(|| {
                LianaError::search(format!(
                    "Hit document type '{}' does not resolve to a known entity type",
                    hit.doc_type
                ))
            })?;
            let (pk_name, _) = entity_type.primary_key();
            let pk = hit.fields.get(pk_name).cloned().ok_or_else(|| {
                LianaError::search(format!(
                    "Hit of document type '{}' is missing its primary key field '{}'",
                    hit.doc_type, pk_name
                ))
            })?;

            let group = match groups
                .iter_mut()
                .find(|g| g.entity_type.name() == entity_type.name())
            {
                Some(group) => group,
                None => {
                    groups.push(HitGroup {
                        entity_type,
                        scores: Vec::new(),
                    });
                    groups.last_mut().unwrap()
                }
            };
            match group.scores.iter_mut().find(|(key, _)| *key == pk) {
                Some((_, score)) => *score = hit.score,
                None => group.scores.push((pk, hit.score)),
            }
        }

        // Batch-fetch entities per type and attach scores.
        let mut ranked = Vec::new();
        for group in &groups {
            let keys: Vec<FieldValue> = group.scores.iter().map(|(key, _)| key.clone()).collect();
            let entities = self.store.fetch_by_keys(group.entity_type.as_ref(), &keys)?;
            let (pk_name, _) = group.entity_type.primary_key();
            for entity in entities {
                let pk = entity.attribute(pk_name).unwrap_or(FieldValue::Null);
                let score = group
                    .scores
                    .iter()
                    .find(|(key, _)| *key == pk)
                    .map(|(_, score)| *score)
                    .unwrap_or(0.0);
                ranked.push(ScoredEntity {
                    entity,
                    entity_type: Arc::clone(&group.entity_type),
                    score,
                });
            }
        }

        // Order by descending score; the stable sort keeps fetch order for
        // ties.
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
        });

        log::debug!(
            "{} hits for search (query={query}, filters={filters:?})",
            ranked.len()
        );
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::backend::{DeleteResponse, IndexResponse, SearchHit};
    use crate::document::Document;
    use crate::entity::{Related, RelationKind};
    use crate::error::Result;
    use serde_json::Value as JsonValue;

    #[derive(Debug)]
    struct TestEntityType {
        name: String,
    }

    impl EntityType for TestEntityType {
        fn name(&self) -> &str {
            &self.name
        }

        fn primary_key(&self) -> (&str, &str) {
            ("id", "auto")
        }

        fn relation_kind(&self, _relation: &str) -> Option<RelationKind> {
            None
        }
    }

    #[derive(Debug, Clone)]
    struct TestEntity {
        attrs: HashMap<String, FieldValue>,
    }

    impl TestEntity {
        fn with_id(id: i64) -> Self {
            let mut attrs = HashMap::new();
            attrs.insert("id".to_string(), FieldValue::Integer(id));
            TestEntity { attrs }
        }
    }

    impl Entity for TestEntity {
        fn attribute(&self, name: &str) -> Option<FieldValue> {
            self.attrs.get(name).cloned()
        }

        fn related(&self, _name: &str) -> Option<Related<'_>> {
            None
        }
    }

    /// Entity store with a fixed set of types, each holding entities by id.
    struct TestStore {
        entities: HashMap<String, Vec<TestEntity>>,
    }

    impl TestStore {
        fn new(types: &[(&str, &[i64])]) -> Self {
            let mut entities = HashMap::new();
            for (name, ids) in types {
                entities.insert(
                    name.to_string(),
                    ids.iter().map(|id| TestEntity::with_id(*id)).collect(),
                );
            }
            TestStore { entities }
        }
    }

    impl EntityStore for TestStore {
        fn entity_type(&self, doc_type: &str) -> Option<Arc<dyn EntityType>> {
            self.entities.get(doc_type).map(|_| {
                Arc::new(TestEntityType {
                    name: doc_type.to_string(),
                }) as Arc<dyn EntityType>
            })
        }

        fn fetch_by_keys(
            &self,
            entity_type: &dyn EntityType,
            keys: &[FieldValue],
        ) -> Result<Vec<Box<dyn Entity>>> {
            let entities = self.entities.get(entity_type.name()).cloned().unwrap_or_default();
            Ok(entities
                .into_iter()
                .filter(|e| keys.contains(&e.attribute("id").unwrap()))
                .map(|e| Box::new(e) as Box<dyn Entity>)
                .collect())
        }
    }

    /// Backend returning a canned hit list.
    struct HitBackend {
        hits: Vec<SearchHit>,
    }

    fn hit(doc_type: &str, id: i64, score: f32) -> SearchHit {
        let mut fields = HashMap::new();
        fields.insert("id".to_string(), FieldValue::Integer(id));
        SearchHit {
            doc_type: doc_type.to_string(),
            fields,
            score,
        }
    }

    impl SearchBackend for HitBackend {
        fn index_exists(&self, _index: &str) -> Result<bool> {
            Ok(true)
        }

        fn create_index(&self, _index: &str) -> Result<()> {
            Ok(())
        }

        fn mapping_exists(&self, _index: &str, _doc_type: &str) -> Result<bool> {
            Ok(true)
        }

        fn put_mapping(
            &self,
            _index: &str,
            _doc_type: &str,
            _mapping: &JsonValue,
        ) -> Result<()> {
            Ok(())
        }

        fn index_document(
            &self,
            _index: &str,
            _doc_type: &str,
            _document: &Document,
            _id: &FieldValue,
            _refresh: bool,
        ) -> Result<IndexResponse> {
            Ok(IndexResponse::default())
        }

        fn delete_document(
            &self,
            _index: &str,
            _doc_type: &str,
            _id: &FieldValue,
            _refresh: bool,
        ) -> Result<DeleteResponse> {
            Ok(DeleteResponse::default())
        }

        fn search(
            &self,
            _index: &str,
            doc_type: Option<&str>,
            _request: &SearchRequest,
        ) -> Result<Vec<SearchHit>> {
            Ok(self
                .hits
                .iter()
                .filter(|hit| doc_type.is_none_or(|t| t == hit.doc_type))
                .cloned()
                .collect())
        }
    }

    fn orchestrator(
        hits: Vec<SearchHit>,
        store: TestStore,
    ) -> SearchOrchestrator {
        SearchOrchestrator::unscoped(
            Arc::new(HitBackend { hits }),
            Arc::new(store),
            Some("main".to_string()),
            &GlobalConfig::default(),
        )
        .unwrap()
    }

    fn entity_id(scored: &ScoredEntity) -> i64 {
        scored.entity.attribute("id").unwrap().as_integer().unwrap()
    }

    #[test]
    fn test_unscoped_requires_index_name() {
        let err = SearchOrchestrator::unscoped(
            Arc::new(HitBackend { hits: Vec::new() }),
            Arc::new(TestStore::new(&[])),
            None,
            &GlobalConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, LianaError::Configuration(_)));
    }

    #[test]
    fn test_unscoped_falls_back_to_default_index() {
        let global = GlobalConfig {
            connection: None,
            default_index: Some("main".to_string()),
        };
        let orchestrator = SearchOrchestrator::unscoped(
            Arc::new(HitBackend { hits: Vec::new() }),
            Arc::new(TestStore::new(&[])),
            None,
            &global,
        )
        .unwrap();
        assert!(orchestrator.search("foo", &[]).unwrap().is_empty());
    }

    #[test]
    fn test_search_ranks_by_descending_score() {
        let orchestrator = orchestrator(
            vec![hit("blog.article", 1, 0.9), hit("blog.article", 2, 0.5)],
            TestStore::new(&[("blog.article", &[1, 2])]),
        );
        let results = orchestrator.search("foo", &[]).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(entity_id(&results[0]), 1);
        assert_eq!(entity_id(&results[1]), 2);
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn test_search_merges_multiple_entity_types() {
        let orchestrator = orchestrator(
            vec![hit("blog.article", 5, 0.8), hit("shop.order", 9, 0.95)],
            TestStore::new(&[("blog.article", &[5]), ("shop.order", &[9])]),
        );
        let results = orchestrator.search("foo", &[]).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].entity_type.name(), "shop.order");
        assert_eq!(entity_id(&results[0]), 9);
        assert_eq!(results[1].entity_type.name(), "blog.article");
        assert_eq!(entity_id(&results[1]), 5);
    }

    #[test]
    fn test_unresolvable_document_type_is_fatal() {
        let orchestrator = orchestrator(
            vec![hit("ghost.type", 1, 0.5)],
            TestStore::new(&[("blog.article", &[1])]),
        );
        let err = orchestrator.search("foo", &[]).unwrap_err();
        assert!(matches!(err, LianaError::Search(_)));
        assert!(err.to_string().contains("ghost.type"));
    }

    #[test]
    fn test_hit_missing_primary_key_is_fatal() {
        let bare_hit = SearchHit {
            doc_type: "blog.article".to_string(),
            fields: HashMap::new(),
            score: 0.5,
        };
        let orchestrator = orchestrator(
            vec![bare_hit],
            TestStore::new(&[("blog.article", &[1])]),
        );
        let err = orchestrator.search("foo", &[]).unwrap_err();
        assert!(matches!(err, LianaError::Search(_)));
        assert!(err.to_string().contains("primary key"));
    }

    #[test]
    fn test_duplicate_hit_keeps_later_score() {
        let orchestrator = orchestrator(
            vec![hit("blog.article", 1, 0.2), hit("blog.article", 1, 0.7)],
            TestStore::new(&[("blog.article", &[1])]),
        );
        let results = orchestrator.search("foo", &[]).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, 0.7);
    }

    #[test]
    fn test_filters_are_passed_to_backend() {
        // The canned backend ignores filters; this exercises the request
        // construction path.
        let orchestrator = orchestrator(
            vec![hit("blog.article", 1, 0.4)],
            TestStore::new(&[("blog.article", &[1])]),
        );
        let filters = vec![(
            "status".to_string(),
            FieldValue::Text("published".to_string()),
        )];
        let results = orchestrator.search("foo", &filters).unwrap();
        assert_eq!(results.len(), 1);
    }
}
