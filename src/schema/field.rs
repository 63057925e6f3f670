//! Field types and the relational field-kind registry.
//!
//! This module owns the scalar converters that translate values between
//! their native form (read off entity instances) and their backend form
//! (stored in the index), the lookup table mapping relational field-kind
//! names to a converter, and the [`FieldMapping`] declaration that ties a
//! target index field to a source attribute path.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};

use crate::document::field_value::FieldValue;
use crate::entity::Cardinality;

/// Format used for datetime values crossing the backend boundary.
///
/// Matches ISO-8601 with microsecond precision and an explicit UTC offset,
/// e.g. `2020-01-02T03:04:05.000000+00:00`.
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f%:z";

/// A scalar converter between native and backend value representations.
///
/// Each variant carries a canonical type tag emitted into mapping
/// definitions. Both conversion directions are total over
/// [`FieldValue::Null`], which always passes through unchanged; values that
/// cannot be cast degrade to `Null` rather than raising.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    /// Text values, stringified on the way in.
    String,
    /// 64-bit signed integers.
    Integer,
    /// 64-bit floats.
    Float,
    /// Dates and datetimes, formatted as ISO-8601 text in the backend.
    Date,
}

impl FieldType {
    /// The canonical type tag emitted into mapping definitions.
    pub fn type_tag(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Date => "date",
        }
    }

    /// Convert a native value to its backend representation.
    pub fn to_backend(&self, value: &FieldValue) -> FieldValue {
        if value.is_null() {
            return FieldValue::Null;
        }
        match self {
            FieldType::String => FieldValue::Text(value.to_string()),
            FieldType::Integer => match value {
                FieldValue::Integer(i) => FieldValue::Integer(*i),
                FieldValue::Float(f) => FieldValue::Integer(*f as i64),
                FieldValue::Text(s) => s
                    .trim()
                    .parse::<i64>()
                    .map(FieldValue::Integer)
                    .unwrap_or(FieldValue::Null),
                _ => FieldValue::Null,
            },
            FieldType::Float => match value {
                FieldValue::Float(f) => FieldValue::Float(*f),
                FieldValue::Integer(i) => FieldValue::Float(*i as f64),
                FieldValue::Text(s) => s
                    .trim()
                    .parse::<f64>()
                    .map(FieldValue::Float)
                    .unwrap_or(FieldValue::Null),
                _ => FieldValue::Null,
            },
            FieldType::Date => match value {
                FieldValue::Date(_) | FieldValue::DateTime(_) => {
                    FieldValue::Text(value.to_string())
                }
                other => FieldValue::Text(other.to_string()),
            },
        }
    }

    /// Convert a backend value back to its native representation.
    pub fn to_native(&self, value: &FieldValue) -> FieldValue {
        if value.is_null() {
            return FieldValue::Null;
        }
        match self {
            FieldType::String => FieldValue::Text(value.to_string()),
            FieldType::Integer | FieldType::Float => self.to_backend(value),
            FieldType::Date => match value {
                FieldValue::Text(s) => DateTime::parse_from_str(s, DATETIME_FORMAT)
                    .map(|dt| FieldValue::DateTime(dt.with_timezone(&Utc)))
                    .unwrap_or(FieldValue::Null),
                FieldValue::Date(d) => FieldValue::Date(*d),
                FieldValue::DateTime(dt) => FieldValue::DateTime(*dt),
                other => FieldValue::Text(other.to_string()),
            },
        }
    }

    /// Build an index field mapping definition: the type tag plus any
    /// declared extra attributes.
    pub fn define_mapping(&self, attrs: &BTreeMap<String, JsonValue>) -> JsonValue {
        let mut definition = json!({ "type": self.type_tag() });
        let map = definition.as_object_mut().unwrap();
        for (key, value) in attrs {
            map.insert(key.clone(), value.clone());
        }
        definition
    }
}

lazy_static! {
    /// Lookup table mapping relational field-kind names to converters.
    static ref FIELD_KIND_TYPES: HashMap<&'static str, FieldType> = {
        let mut table = HashMap::new();
        table.insert("auto", FieldType::Integer);
        table.insert("big_integer", FieldType::Integer);
        table.insert("char", FieldType::String);
        table.insert("date", FieldType::Date);
        table.insert("datetime", FieldType::Date);
        table.insert("decimal", FieldType::Float);
        table.insert("email", FieldType::String);
        table.insert("float", FieldType::Float);
        table.insert("integer", FieldType::Integer);
        table.insert("ip_address", FieldType::String);
        table.insert("generic_ip_address", FieldType::String);
        table.insert("positive_integer", FieldType::Integer);
        table.insert("positive_small_integer", FieldType::Integer);
        table.insert("slug", FieldType::String);
        table.insert("small_integer", FieldType::Integer);
        table.insert("text", FieldType::String);
        table.insert("url", FieldType::String);
        table
    };
}

/// Look up the converter for a relational field-kind name.
///
/// Returns `None` for an unknown kind; the caller must treat such a field as
/// not indexable.
pub fn field_type_for_kind(kind: &str) -> Option<FieldType> {
    FIELD_KIND_TYPES.get(kind).copied()
}

/// Build a mapping definition for a relational field-kind name, or `None`
/// if the kind is not indexable.
pub fn mapping_for_kind(kind: &str) -> Option<JsonValue> {
    field_type_for_kind(kind).map(|field_type| field_type.define_mapping(&BTreeMap::new()))
}

/// The source attribute path a field mapping reads its value from.
///
/// A simple name reads directly off the bound entity. A two-segment dotted
/// path `relation.attribute` traverses a relation and reads the attribute
/// off the related object(s).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourcePath {
    /// A direct attribute on the entity.
    Attribute(String),
    /// An attribute reached through a named relation.
    Relation {
        /// The relation attribute on the entity.
        relation: String,
        /// The attribute read off the related object(s).
        attribute: String,
    },
}

impl SourcePath {
    /// Parse a source path from its string form.
    ///
    /// Only the first two dotted segments are significant.
    pub fn parse(source: &str) -> Self {
        match source.split_once('.') {
            Some((relation, rest)) => SourcePath::Relation {
                relation: relation.to_string(),
                attribute: rest.split('.').next().unwrap_or(rest).to_string(),
            },
            None => SourcePath::Attribute(source.to_string()),
        }
    }
}

/// A named field in an index schema.
///
/// Ties a target field name to a source attribute path and a converter,
/// plus any extra declared mapping attributes merged into the emitted
/// schema fragment. For relation paths the cardinality is resolved once at
/// schema-composition time and stored here, so document assembly dispatches
/// on the stored classification instead of re-querying relation metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMapping {
    name: String,
    source: SourcePath,
    field_type: FieldType,
    attrs: BTreeMap<String, JsonValue>,
    cardinality: Option<Cardinality>,
}

impl FieldMapping {
    /// Create a new field mapping. The source path is parsed from its
    /// string form.
    pub fn new<S: Into<String>>(name: S, source: &str, field_type: FieldType) -> Self {
        FieldMapping {
            name: name.into(),
            source: SourcePath::parse(source),
            field_type,
            attrs: BTreeMap::new(),
            cardinality: None,
        }
    }

    /// Attach an extra mapping attribute merged into the emitted schema
    /// fragment.
    pub fn with_attr<S: Into<String>>(mut self, key: S, value: JsonValue) -> Self {
        self.attrs.insert(key.into(), value);
        self
    }

    /// Get the target field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the property name used in the emitted mapping body: the first
    /// dotted segment of the target name.
    pub fn property_name(&self) -> &str {
        self.name.split('.').next().unwrap_or(&self.name)
    }

    /// Get the source attribute path.
    pub fn source(&self) -> &SourcePath {
        &self.source
    }

    /// Get the converter for this field.
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Get the extra mapping attributes.
    pub fn attrs(&self) -> &BTreeMap<String, JsonValue> {
        &self.attrs
    }

    /// Get the resolved relation cardinality, if this mapping traverses a
    /// relation and the relation kind is supported.
    pub fn cardinality(&self) -> Option<Cardinality> {
        self.cardinality
    }

    /// Store the resolved relation cardinality.
    pub fn set_cardinality(&mut self, cardinality: Option<Cardinality>) {
        self.cardinality = cardinality;
    }

    /// Build this field's mapping definition.
    pub fn define_mapping(&self) -> JsonValue {
        self.field_type.define_mapping(&self.attrs)
    }
}
