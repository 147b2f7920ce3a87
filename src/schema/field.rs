//! Field definitions for schemas.

use serde::{Deserialize, Serialize};

use crate::error::{LocalSearchError, Result};

/// The value type a field accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    String,
    Integer,
}

impl PropertyType {
    /// Get the name of this property type.
    pub fn name(&self) -> &'static str {
        match self {
            PropertyType::String => "string",
            PropertyType::Integer => "integer",
        }
    }
}

/// How a field's tokens are made searchable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexingMode {
    /// Stored only; never matched by queries.
    #[default]
    None,
    /// Tokens match only a query token equal to them.
    Exact,
    /// Tokens match any query token that is a non-empty prefix of them.
    Prefix,
}

/// Whether a document must carry a value for the field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinality {
    #[default]
    Optional,
    Required,
}

/// A single field definition within a schema.
///
/// ```
/// use localsearch::schema::field::{FieldDefinition, IndexingMode};
///
/// let field = FieldDefinition::string("text").indexing(IndexingMode::Prefix).required();
/// assert!(field.is_indexed());
/// assert!(field.is_required());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    name: String,
    property_type: PropertyType,
    indexing: IndexingMode,
    cardinality: Cardinality,
}

impl FieldDefinition {
    /// Create a field definition of the given type (optional, not indexed).
    pub fn new<S: Into<String>>(name: S, property_type: PropertyType) -> Self {
        FieldDefinition {
            name: name.into(),
            property_type,
            indexing: IndexingMode::None,
            cardinality: Cardinality::Optional,
        }
    }

    /// Create a string field definition.
    pub fn string<S: Into<String>>(name: S) -> Self {
        Self::new(name, PropertyType::String)
    }

    /// Create an integer field definition.
    pub fn integer<S: Into<String>>(name: S) -> Self {
        Self::new(name, PropertyType::Integer)
    }

    /// Set the indexing mode.
    pub fn indexing(mut self, indexing: IndexingMode) -> Self {
        self.indexing = indexing;
        self
    }

    /// Set the cardinality.
    pub fn cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    /// Mark the field as required.
    pub fn required(self) -> Self {
        self.cardinality(Cardinality::Required)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn property_type(&self) -> PropertyType {
        self.property_type
    }

    pub fn indexing_mode(&self) -> IndexingMode {
        self.indexing
    }

    pub fn cardinality_mode(&self) -> Cardinality {
        self.cardinality
    }

    /// Check if this field contributes postings to the index.
    pub fn is_indexed(&self) -> bool {
        self.indexing != IndexingMode::None
    }

    /// Check if documents must carry a value for this field.
    pub fn is_required(&self) -> bool {
        self.cardinality == Cardinality::Required
    }

    /// Check that the definition itself is well formed.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LocalSearchError::schema("Field name cannot be empty"));
        }

        if self.property_type == PropertyType::Integer && self.indexing == IndexingMode::Prefix {
            return Err(LocalSearchError::schema(format!(
                "Integer field '{}' cannot be prefix-indexed",
                self.name
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_defaults() {
        let field = FieldDefinition::string("text");
        assert_eq!(field.name(), "text");
        assert_eq!(field.property_type(), PropertyType::String);
        assert_eq!(field.indexing_mode(), IndexingMode::None);
        assert_eq!(field.cardinality_mode(), Cardinality::Optional);
        assert!(!field.is_indexed());
        assert!(!field.is_required());
    }

    #[test]
    fn test_field_validation() {
        assert!(FieldDefinition::string("text").validate().is_ok());
        assert!(
            FieldDefinition::integer("count")
                .indexing(IndexingMode::Exact)
                .validate()
                .is_ok()
        );

        let err = FieldDefinition::string("  ").validate().unwrap_err();
        assert!(matches!(err, LocalSearchError::Schema(_)));

        let err = FieldDefinition::integer("count")
            .indexing(IndexingMode::Prefix)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("cannot be prefix-indexed"));
    }
}
