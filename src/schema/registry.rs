//! Registry of schemas known to a session.

use std::collections::HashMap;
use std::sync::Arc;

use crate::document::Document;
use crate::error::{LocalSearchError, Result};
use crate::schema::schema::Schema;

/// Outcome of registering a schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaChange {
    /// No schema with this name existed.
    Created,
    /// An identical schema was already registered.
    Unchanged,
    /// A compatible new version replaced the old one. `reindex` is set when
    /// some field changed its indexing mode.
    Updated { reindex: bool },
}

/// Holds the schemas documents are validated against, keyed by name.
#[derive(Clone, Debug, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Arc<Schema>>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from persisted schemas.
    pub fn from_schemas(schemas: Vec<Schema>) -> Self {
        SchemaRegistry {
            schemas: schemas
                .into_iter()
                .map(|schema| (schema.name().to_string(), Arc::new(schema)))
                .collect(),
        }
    }

    /// Check whether `schema` could be registered, without changing the
    /// registry.
    pub fn check(&self, schema: &Schema) -> Result<SchemaChange> {
        schema.validate()?;

        match self.schemas.get(schema.name()) {
            None => Ok(SchemaChange::Created),
            Some(existing) if existing.as_ref() == schema => Ok(SchemaChange::Unchanged),
            Some(existing) => {
                schema.check_compatible_with(existing)?;
                Ok(SchemaChange::Updated {
                    reindex: schema.indexing_differs_from(existing),
                })
            }
        }
    }

    /// Register a schema, making it the validation target for future puts.
    pub fn register(&mut self, schema: Schema) -> Result<SchemaChange> {
        let change = self.check(&schema)?;
        if change != SchemaChange::Unchanged {
            self.schemas
                .insert(schema.name().to_string(), Arc::new(schema));
        }
        Ok(change)
    }

    /// Get a schema by name.
    pub fn get(&self, name: &str) -> Option<Arc<Schema>> {
        self.schemas.get(name).cloned()
    }

    /// All registered schemas, sorted by name.
    pub fn schemas(&self) -> Vec<Arc<Schema>> {
        let mut schemas: Vec<_> = self.schemas.values().cloned().collect();
        schemas.sort_by(|a, b| a.name().cmp(b.name()));
        schemas
    }

    /// Validate a document against its registered schema.
    ///
    /// Returns the schema so callers can drive indexing from it.
    pub fn validate(&self, document: &Document) -> Result<Arc<Schema>> {
        if document.namespace().is_empty() {
            return Err(LocalSearchError::validation(
                "namespace",
                "namespace cannot be empty",
            ));
        }
        if document.id().is_empty() {
            return Err(LocalSearchError::validation("id", "id cannot be empty"));
        }

        let schema = self.get(document.schema_type()).ok_or_else(|| {
            LocalSearchError::validation(
                "schema",
                format!("schema '{}' is not registered", document.schema_type()),
            )
        })?;
        schema.validate_document(document)?;
        Ok(schema)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
