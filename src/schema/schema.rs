//! Schema definition and document validation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::{LocalSearchError, Result};
use crate::schema::field::FieldDefinition;

/// A schema defines the typed fields a document type may carry.
///
/// Field order is preserved; validation reports the first offending field
/// in that order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    name: String,
    fields: Vec<FieldDefinition>,
}

impl Schema {
    /// Create a builder for a schema with the given name.
    pub fn builder<S: Into<String>>(name: S) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// The schema (document type) name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field definitions in declaration order.
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Get a field definition by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Check if a field exists.
    pub fn has_field(&self, name: &str) -> bool {
        self.get_field(name).is_some()
    }

    /// Fields that contribute postings to the index.
    pub fn indexed_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|field| field.is_indexed())
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check that the schema definition is well formed.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LocalSearchError::schema("Schema name cannot be empty"));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            field.validate()?;
            if !seen.insert(field.name()) {
                return Err(LocalSearchError::schema(format!(
                    "Field '{}' already exists in schema '{}'",
                    field.name(),
                    self.name
                )));
            }
        }

        Ok(())
    }

    /// Validate a document against this schema.
    ///
    /// Required fields are checked in declaration order, then every value
    /// the document carries must be declared with a matching type.
    pub fn validate_document(&self, document: &Document) -> Result<()> {
        for field in &self.fields {
            match document.get_field(field.name()) {
                None if field.is_required() => {
                    return Err(LocalSearchError::validation(
                        field.name(),
                        "required field is missing",
                    ));
                }
                Some(value) if value.property_type() != field.property_type() => {
                    return Err(LocalSearchError::validation(
                        field.name(),
                        format!(
                            "expected {}, found {}",
                            field.property_type().name(),
                            value.type_name()
                        ),
                    ));
                }
                _ => {}
            }
        }

        if let Some(unknown) = document.fields().keys().find(|name| !self.has_field(name)) {
            return Err(LocalSearchError::validation(
                unknown.as_str(),
                format!("field is not declared in schema '{}'", self.name),
            ));
        }

        Ok(())
    }

    /// Check whether `self` can replace `existing` without invalidating
    /// documents that were valid under `existing`.
    pub fn check_compatible_with(&self, existing: &Schema) -> Result<()> {
        for old in existing.fields() {
            let Some(new) = self.get_field(old.name()) else {
                return Err(LocalSearchError::schema(format!(
                    "Incompatible schema '{}': field '{}' was removed",
                    self.name,
                    old.name()
                )));
            };

            if new.property_type() != old.property_type() {
                return Err(LocalSearchError::schema(format!(
                    "Incompatible schema '{}': field '{}' changed type from {} to {}",
                    self.name,
                    old.name(),
                    old.property_type().name(),
                    new.property_type().name()
                )));
            }

            if new.is_required() && !old.is_required() {
                return Err(LocalSearchError::schema(format!(
                    "Incompatible schema '{}': field '{}' became required",
                    self.name,
                    old.name()
                )));
            }
        }

        if let Some(added) = self
            .fields
            .iter()
            .find(|field| field.is_required() && !existing.has_field(field.name()))
        {
            return Err(LocalSearchError::schema(format!(
                "Incompatible schema '{}': new field '{}' cannot be required",
                self.name,
                added.name()
            )));
        }

        Ok(())
    }

    /// Whether any field changed its indexing mode relative to `existing`.
    pub fn indexing_differs_from(&self, existing: &Schema) -> bool {
        self.fields.iter().any(|field| {
            existing
                .get_field(field.name())
                .map(|old| old.indexing_mode() != field.indexing_mode())
                .unwrap_or(false)
        })
    }
}

/// A builder for constructing schemas in a fluent manner.
#[derive(Debug)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    /// Create a new schema builder.
    pub fn new<S: Into<String>>(name: S) -> Self {
        SchemaBuilder {
            schema: Schema {
                name: name.into(),
                fields: Vec::new(),
            },
        }
    }

    /// Add a field to the schema being built.
    pub fn add_field(mut self, field: FieldDefinition) -> Result<Self> {
        field.validate()?;
        if self.schema.has_field(field.name()) {
            return Err(LocalSearchError::schema(format!(
                "Field '{}' already exists",
                field.name()
            )));
        }

        self.schema.fields.push(field);
        Ok(self)
    }

    /// Build the final schema.
    pub fn build(self) -> Result<Schema> {
        self.schema.validate()?;
        Ok(self.schema)
    }
}
