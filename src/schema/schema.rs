//! Index schema composition and mapping-body emission.

use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};

use crate::schema::field::{FieldMapping, FieldType};

/// Policy for how the backend treats fields not declared in the mapping.
///
/// The modes are mutually exclusive: at most one of `strict`, a custom mode,
/// or the default (automatic date detection disabled) applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DynamicMapping {
    /// Undeclared fields are rejected.
    Strict,
    /// A backend-specific mode string.
    Custom(String),
    /// Default: undeclared fields are allowed, automatic date detection is
    /// disabled.
    #[default]
    DateDetectionDisabled,
}

/// Compose an entity type's declared field mappings with its parent's
/// already-composed table.
///
/// The result starts from the parent's entries in the parent's order; own
/// entries follow in declaration order. A name redeclared by the child
/// replaces the inherited definition in place, so an overridden field keeps
/// its original position and names stay unique within the schema.
pub fn compose_fields(
    parent: Option<&[FieldMapping]>,
    own: Vec<FieldMapping>,
) -> Vec<FieldMapping> {
    let mut composed: Vec<FieldMapping> = parent.map(<[_]>::to_vec).unwrap_or_default();
    for mapping in own {
        match composed.iter().position(|f| f.name() == mapping.name()) {
            Some(index) => composed[index] = mapping,
            None => composed.push(mapping),
        }
    }
    composed
}

/// An ordered, name-keyed index schema for one document type.
///
/// Computed once when a [`crate::indexer::DocumentIndexer`] is constructed
/// and immutable for its lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSchema {
    /// Field mappings in schema order.
    fields: Vec<FieldMapping>,
    /// Primary-key field name.
    pk_name: String,
    /// Primary-key converter.
    pk_type: FieldType,
    /// Dynamic-mapping mode.
    dynamic: DynamicMapping,
}

impl IndexSchema {
    /// Create a new index schema from composed field mappings.
    pub fn new<S: Into<String>>(
        fields: Vec<FieldMapping>,
        pk_name: S,
        pk_type: FieldType,
        dynamic: DynamicMapping,
    ) -> Self {
        IndexSchema {
            fields,
            pk_name: pk_name.into(),
            pk_type,
            dynamic,
        }
    }

    /// Get the field mappings in schema order.
    pub fn fields(&self) -> &[FieldMapping] {
        &self.fields
    }

    /// Look up a field mapping by target name.
    pub fn get(&self, name: &str) -> Option<&FieldMapping> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Get the primary-key field name.
    pub fn primary_key_name(&self) -> &str {
        &self.pk_name
    }

    /// Get the primary-key converter.
    pub fn primary_key_type(&self) -> FieldType {
        self.pk_type
    }

    /// Get the dynamic-mapping mode.
    pub fn dynamic(&self) -> &DynamicMapping {
        &self.dynamic
    }

    /// Build the mapping body registered with the backend.
    ///
    /// Shape: `{_id: {path: <pk>}, properties: {<field>: {type, ...attrs}},
    /// [dynamic: "strict"|<mode>] | [date_detection: false]}`. Dotted target
    /// names contribute only their first segment as the property key.
    pub fn mapping_body(&self) -> JsonValue {
        let mut properties = serde_json::Map::new();
        for mapping in &self.fields {
            properties.insert(mapping.property_name().to_string(), mapping.define_mapping());
        }
        properties.insert(
            self.pk_name.clone(),
            self.pk_type.define_mapping(&Default::default()),
        );

        let mut body = json!({
            "_id": { "path": self.pk_name },
            "properties": properties,
        });
        let map = body.as_object_mut().unwrap();
        match &self.dynamic {
            DynamicMapping::Strict => {
                map.insert("dynamic".to_string(), json!("strict"));
            }
            DynamicMapping::Custom(mode) => {
                map.insert("dynamic".to_string(), json!(mode));
            }
            DynamicMapping::DateDetectionDisabled => {
                map.insert("date_detection".to_string(), json!(false));
            }
        }
        body
    }
}
