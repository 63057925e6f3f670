//! Entity-store collaborator interfaces.
//!
//! The relational entity store itself is an external collaborator; this
//! module specifies the seam the bridge talks to it through: reading
//! attributes and relations off entity instances, describing entity types
//! (primary key, relation kinds), resolving a document-type name back to an
//! entity type, and batch-fetching entities by primary key.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::document::field_value::FieldValue;
use crate::error::Result;

/// The kind of a named relation between entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationKind {
    /// A foreign key to another entity type.
    ForeignKey,
    /// A one-to-one link.
    OneToOne,
    /// The reverse side of a foreign key.
    ManyToOne,
    /// The reverse side of a one-to-one link.
    OneToOneReverse,
    /// A many-to-many link.
    ManyToMany,
    /// The reverse side of a many-to-many link.
    ManyToManyReverse,
    /// Any other relation kind; unsupported for document assembly.
    Generic,
}

/// Relation cardinality used to drive document assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinality {
    /// The relation resolves to at most one related object.
    ToOne,
    /// The relation resolves to a collection of related objects.
    ToMany,
}

impl RelationKind {
    /// Classify this relation kind into a cardinality.
    ///
    /// Foreign-key and one-to-one relations in either direction are to-one;
    /// many-to-many relations in either direction are to-many; anything else
    /// is unsupported and yields `None`.
    pub fn cardinality(&self) -> Option<Cardinality> {
        match self {
            RelationKind::ForeignKey
            | RelationKind::OneToOne
            | RelationKind::ManyToOne
            | RelationKind::OneToOneReverse => Some(Cardinality::ToOne),
            RelationKind::ManyToMany | RelationKind::ManyToManyReverse => {
                Some(Cardinality::ToMany)
            }
            RelationKind::Generic => None,
        }
    }
}

/// The object(s) reached by following a relation off an entity instance.
pub enum Related<'a> {
    /// A single related entity.
    One(&'a dyn Entity),
    /// A collection of related entities, in the store's iteration order.
    Many(Vec<&'a dyn Entity>),
}

/// An instance of a relationally-stored record type.
pub trait Entity: Send + Sync {
    /// Read a named attribute. `None` when the attribute does not exist.
    fn attribute(&self, name: &str) -> Option<FieldValue>;

    /// Read a named relation and the related object(s). `None` when the
    /// relation is absent or unset.
    fn related(&self, name: &str) -> Option<Related<'_>>;
}

/// The descriptor of an entity type: its name, primary key, and relation
/// metadata.
pub trait EntityType: Send + Sync {
    /// The fully-qualified entity-type name; doubles as the default
    /// document-type name.
    fn name(&self) -> &str;

    /// The primary-key field name and its relational field-kind.
    fn primary_key(&self) -> (&str, &str);

    /// The kind of a named relation, or `None` when the name is not a
    /// relation on this type.
    fn relation_kind(&self, relation: &str) -> Option<RelationKind>;
}

/// The entity store the bridge reconstructs entities from.
pub trait EntityStore: Send + Sync {
    /// Resolve an entity type by its document-type name.
    fn entity_type(&self, doc_type: &str) -> Option<Arc<dyn EntityType>>;

    /// Batch-fetch entities of a type whose primary key is within the given
    /// set of values.
    fn fetch_by_keys(
        &self,
        entity_type: &dyn EntityType,
        keys: &[FieldValue],
    ) -> Result<Vec<Box<dyn Entity>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_kind_classification() {
        assert_eq!(
            RelationKind::ForeignKey.cardinality(),
            Some(Cardinality::ToOne)
        );
        assert_eq!(
            RelationKind::OneToOne.cardinality(),
            Some(Cardinality::ToOne)
        );
        assert_eq!(
            RelationKind::ManyToOne.cardinality(),
            Some(Cardinality::ToOne)
        );
        assert_eq!(
            RelationKind::OneToOneReverse.cardinality(),
            Some(Cardinality::ToOne)
        );
        assert_eq!(
            RelationKind::ManyToMany.cardinality(),
            Some(Cardinality::ToMany)
        );
        assert_eq!(
            RelationKind::ManyToManyReverse.cardinality(),
            Some(Cardinality::ToMany)
        );
        assert_eq!(RelationKind::Generic.cardinality(), None);
    }
}
