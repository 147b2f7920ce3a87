//! In-memory document table keyed by `(namespace, id)`.

use std::collections::BTreeSet;
use std::sync::Arc;

use ahash::AHashMap;

use crate::document::{Document, DocumentKey};

/// Result of a delete: whether a document was actually removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// Nothing was stored under the key; the delete was a no-op.
    Absent,
}

impl DeleteOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted)
    }
}

/// Latest version of every document, shared by reference with readers.
///
/// The store holds no index state; callers keep the inverted index in step
/// using the prior documents returned by [`put`](Self::put) and
/// [`delete`](Self::delete).
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: AHashMap<DocumentKey, Arc<Document>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a document, returning the version it replaced.
    pub fn put(&mut self, document: Document) -> Option<Arc<Document>> {
        self.documents
            .insert(document.key().clone(), Arc::new(document))
    }

    /// Get the current version of a document.
    pub fn get(&self, key: &DocumentKey) -> Option<Arc<Document>> {
        self.documents.get(key).cloned()
    }

    pub fn contains(&self, key: &DocumentKey) -> bool {
        self.documents.contains_key(key)
    }

    /// Remove a document, returning it if it existed.
    pub fn delete(&mut self, key: &DocumentKey) -> Option<Arc<Document>> {
        self.documents.remove(key)
    }

    /// Distinct namespaces that currently hold documents, sorted.
    pub fn namespaces(&self) -> Vec<String> {
        self.documents
            .keys()
            .map(|key| key.namespace.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Iterate over all stored documents in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Document>> {
        self.documents.values()
    }

    /// Documents of one schema type.
    pub fn documents_of_type<'a>(
        &'a self,
        schema_type: &'a str,
    ) -> impl Iterator<Item = &'a Arc<Document>> + 'a {
        self.iter()
            .filter(move |doc| doc.schema_type() == schema_type)
    }

    /// All documents sorted by key, for snapshots.
    pub fn sorted_documents(&self) -> Vec<Document> {
        let mut documents: Vec<Document> =
            self.iter().map(|doc| doc.as_ref().clone()).collect();
        documents.sort_by(|a, b| a.key().cmp(b.key()));
        documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn clear(&mut self) {
        self.documents.clear();
    }
}
