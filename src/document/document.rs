//! Document structure assembled from entity instances.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::document::field_value::FieldValue;

/// A document represents the backend-ready, flattened form of one entity.
///
/// Documents are recomputed fresh on every index/delete call from the
/// currently bound entity instance. A document assembled without a bound
/// instance is empty. A non-empty document always carries the primary-key
/// value under the primary-key field name.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Document {
    /// The field values for this document
    fields: HashMap<String, FieldValue>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Document {
            fields: HashMap::new(),
        }
    }

    /// Add a field value to the document.
    pub fn add_field<S: Into<String>>(&mut self, name: S, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    /// Get a field value from the document.
    pub fn get_field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Check if the document has a field.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Get all field names.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(|s| s.as_str()).collect()
    }

    /// Get all field values.
    pub fn fields(&self) -> &HashMap<String, FieldValue> {
        &self.fields
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_fields() {
        let mut document = Document::new();
        assert!(document.is_empty());

        document.add_field("title", FieldValue::Text("Rust".to_string()));
        document.add_field("year", FieldValue::Integer(2024));

        assert_eq!(document.len(), 2);
        assert!(document.has_field("title"));
        assert_eq!(
            document.get_field("title"),
            Some(&FieldValue::Text("Rust".to_string()))
        );
        assert_eq!(document.get_field("missing"), None);
    }

    #[test]
    fn test_document_overwrite() {
        let mut document = Document::new();
        document.add_field("id", FieldValue::Integer(1));
        document.add_field("id", FieldValue::Integer(2));

        assert_eq!(document.len(), 1);
        assert_eq!(document.get_field("id"), Some(&FieldValue::Integer(2)));
    }
}
