//! Field value types for documents.
//!
//! A schema declares each field as either a string or an integer property;
//! [`FieldValue`] mirrors those two types.
//!
//! ```
//! use localsearch::document::field_value::FieldValue;
//!
//! let text = FieldValue::from("Buy fresh fruit");
//! assert_eq!(text.as_text(), Some("Buy fresh fruit"));
//!
//! let number = FieldValue::from(42_i64);
//! assert_eq!(number.as_integer(), Some(42));
//! assert_eq!(number.type_name(), "integer");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::field::PropertyType;

/// Represents a value for a field in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Text value
    Text(String),
    /// Integer value
    Integer(i64),
}

impl FieldValue {
    /// Get the value as text, if it is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Integer(_) => None,
        }
    }

    /// Get the value as an integer, if it is an integer value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(value) => Some(*value),
            FieldValue::Text(_) => None,
        }
    }

    /// The schema property type this value satisfies.
    pub fn property_type(&self) -> PropertyType {
        match self {
            FieldValue::Text(_) => PropertyType::String,
            FieldValue::Integer(_) => PropertyType::Integer,
        }
    }

    /// Get a human-readable type name.
    pub fn type_name(&self) -> &'static str {
        self.property_type().name()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => write!(f, "{text}"),
            FieldValue::Integer(value) => write!(f, "{value}"),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let text = FieldValue::Text("fruit".to_string());
        assert_eq!(text.as_text(), Some("fruit"));
        assert_eq!(text.as_integer(), None);
        assert_eq!(text.property_type(), PropertyType::String);

        let number = FieldValue::Integer(-7);
        assert_eq!(number.as_text(), None);
        assert_eq!(number.as_integer(), Some(-7));
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldValue::from("a b").to_string(), "a b");
        assert_eq!(FieldValue::from(10_i64).to_string(), "10");
    }
}
