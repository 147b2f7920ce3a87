//! Document structure.

use std::collections::BTreeMap;
use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::document::field_value::FieldValue;

/// Identity of a document: `(namespace, id)`.
///
/// Keys order by namespace first, then id; the query engine relies on this
/// ordering to break score ties deterministically.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentKey {
    pub namespace: String,
    pub id: String,
}

impl DocumentKey {
    /// Create a new document key.
    pub fn new<N: Into<String>, I: Into<String>>(namespace: N, id: I) -> Self {
        DocumentKey {
            namespace: namespace.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.id)
    }
}

/// A document represents a single item to be stored and indexed.
///
/// The latest version put under a given [`DocumentKey`] replaces any earlier
/// version wholesale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    key: DocumentKey,
    schema_type: String,
    score: u32,
    creation_timestamp_millis: i64,
    fields: BTreeMap<String, FieldValue>,
}

impl Document {
    /// Start building a document of the given schema type.
    pub fn builder<N, I, S>(namespace: N, id: I, schema_type: S) -> DocumentBuilder
    where
        N: Into<String>,
        I: Into<String>,
        S: Into<String>,
    {
        DocumentBuilder::new(DocumentKey::new(namespace, id), schema_type)
    }

    /// The document key.
    pub fn key(&self) -> &DocumentKey {
        &self.key
    }

    /// The namespace the document lives in.
    pub fn namespace(&self) -> &str {
        &self.key.namespace
    }

    /// The document id, unique within its namespace.
    pub fn id(&self) -> &str {
        &self.key.id
    }

    /// Name of the schema this document conforms to.
    pub fn schema_type(&self) -> &str {
        &self.schema_type
    }

    /// Ranking score; higher scores rank first by default.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Creation time in milliseconds since the Unix epoch.
    pub fn creation_timestamp_millis(&self) -> i64 {
        self.creation_timestamp_millis
    }

    /// Get a field value from the document.
    pub fn get_field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Get a text field value.
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.get_field(name).and_then(FieldValue::as_text)
    }

    /// Get an integer field value.
    pub fn get_integer(&self, name: &str) -> Option<i64> {
        self.get_field(name).and_then(FieldValue::as_integer)
    }

    /// Check if the document has a field.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// All field values, sorted by field name.
    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    /// Get the number of fields in the document.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A builder for constructing documents in a fluent manner.
#[derive(Debug)]
pub struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    fn new<S: Into<String>>(key: DocumentKey, schema_type: S) -> Self {
        DocumentBuilder {
            document: Document {
                key,
                schema_type: schema_type.into(),
                score: 0,
                creation_timestamp_millis: Utc::now().timestamp_millis(),
                fields: BTreeMap::new(),
            },
        }
    }

    /// Set the ranking score.
    pub fn score(mut self, score: u32) -> Self {
        self.document.score = score;
        self
    }

    /// Override the creation timestamp.
    pub fn creation_timestamp_millis(mut self, millis: i64) -> Self {
        self.document.creation_timestamp_millis = millis;
        self
    }

    /// Add a text field to the document.
    pub fn add_text<S: Into<String>, T: Into<String>>(self, name: S, value: T) -> Self {
        self.add_field(name, FieldValue::Text(value.into()))
    }

    /// Add an integer field to the document.
    pub fn add_integer<S: Into<String>>(self, name: S, value: i64) -> Self {
        self.add_field(name, FieldValue::Integer(value))
    }

    /// Add a field value, replacing any earlier value for the same name.
    pub fn add_field<S: Into<String>>(mut self, name: S, value: FieldValue) -> Self {
        self.document.fields.insert(name.into(), value);
        self
    }

    /// Build the document.
    pub fn build(self) -> Document {
        self.document
    }
}
