//! Field value types for documents.
//!
//! This module defines the [`FieldValue`] enum which represents all possible
//! types of values that can appear in an assembled document or be read off an
//! entity instance.
//!
//! # Supported Types
//!
//! - **Text** - String data for full-text search
//! - **Integer** - 64-bit signed integers
//! - **Float** - 64-bit floating-point numbers
//! - **Date** - Calendar dates without a time component
//! - **DateTime** - UTC timestamps
//! - **Null** - Explicit null values
//!
//! # Type Conversion
//!
//! The `FieldValue` enum provides conversion methods for extracting typed
//! values:
//!
//! ```
//! use liana::document::field_value::FieldValue;
//!
//! let text_value = FieldValue::Text("hello".to_string());
//! assert_eq!(text_value.as_text(), Some("hello"));
//!
//! let int_value = FieldValue::Integer(42);
//! assert_eq!(int_value.as_integer(), Some(42));
//! ```

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Represents a value for a field in a document.
///
/// Values flow in two directions: native values read off entity instances on
/// the way into the index, and backend values carried by search hits on the
/// way out. The scalar converters in [`crate::schema::field`] translate
/// between the two forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Text value
    Text(String),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// Calendar date value
    Date(NaiveDate),
    /// UTC timestamp value
    DateTime(DateTime<Utc>),
    /// Null value
    Null,
}

impl FieldValue {
    /// Convert to text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to an integer if this is an integer value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Convert to a float if this is a numeric value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            FieldValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Convert to a UTC timestamp if this is a temporal value.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::DateTime(dt) => Some(*dt),
            FieldValue::Date(d) => d
                .and_hms_opt(0, 0, 0)
                .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc)),
            _ => None,
        }
    }

    /// Check if this is the null value.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl fmt::Display for FieldValue {
    /// Null renders as the empty string so that joined to-many values never
    /// carry a placeholder token.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FieldValue::DateTime(dt) => {
                write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.6f%:z"))
            }
            FieldValue::Null => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_accessors() {
        assert_eq!(FieldValue::Text("abc".to_string()).as_text(), Some("abc"));
        assert_eq!(FieldValue::Integer(7).as_integer(), Some(7));
        assert_eq!(FieldValue::Integer(7).as_float(), Some(7.0));
        assert_eq!(FieldValue::Float(1.5).as_float(), Some(1.5));
        assert!(FieldValue::Null.is_null());
        assert_eq!(FieldValue::Null.as_text(), None);
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(FieldValue::Text("x".to_string()).to_string(), "x");
        assert_eq!(FieldValue::Integer(42).to_string(), "42");
        assert_eq!(FieldValue::Null.to_string(), "");

        let date = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        assert_eq!(FieldValue::Date(date).to_string(), "2020-01-02");

        let dt = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(
            FieldValue::DateTime(dt).to_string(),
            "2020-01-02T03:04:05.000000+00:00"
        );
    }

    #[test]
    fn test_date_as_datetime() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        let dt = FieldValue::Date(date).as_datetime().unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap());
    }
}
