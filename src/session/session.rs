//! Asynchronous search session.
//!
//! This module provides the `SearchSession` handle applications use for
//! every operation. Each call runs as one blocking unit of work on the
//! tokio runtime and completes independently of any other call.

use std::sync::Arc;

use crate::document::{Document, DocumentKey};
use crate::error::{LocalSearchError, Result};
use crate::query::results::SearchResults;
use crate::query::spec::SearchSpec;
use crate::schema::{Schema, SchemaChange};
use crate::session::batch::BatchResult;
use crate::session::config::SessionConfig;
use crate::session::core::{SessionCore, StorageInfo};
use crate::storage::Storage;
use crate::store::DeleteOutcome;

/// Run `op` against the core on tokio's blocking pool.
pub(crate) async fn run_blocking<T, F>(core: &Arc<SessionCore>, op: F) -> Result<T>
where
    F: FnOnce(&SessionCore) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let core = Arc::clone(core);
    tokio::task::spawn_blocking(move || op(&core))
        .await
        .map_err(|e| LocalSearchError::internal(format!("session task failed: {e}")))?
}

/// Handle to an open local search database.
///
/// Handles are cheap to clone and share one database; closing through any
/// handle closes it for all of them. Dropping every handle without calling
/// [`close`](Self::close) is like a crash: nothing acknowledged is lost,
/// and the next open replays the write-ahead log.
///
/// # Examples
///
/// ```no_run
/// use localsearch::document::Document;
/// use localsearch::query::SearchSpec;
/// use localsearch::schema::{FieldDefinition, IndexingMode, Schema};
/// use localsearch::session::{SearchSession, SessionConfig};
///
/// # async fn example() -> localsearch::error::Result<()> {
/// let session = SearchSession::open(SessionConfig::new("notes_app")).await?;
///
/// let schema = Schema::builder("Note")
///     .add_field(FieldDefinition::string("text").indexing(IndexingMode::Prefix))?
///     .build()?;
/// session.register_schema(schema).await?;
///
/// let note = Document::builder("user1", "noteId", "Note")
///     .score(10)
///     .add_text("text", "Buy fresh fruit")
///     .build();
/// session.put(note).await?;
///
/// let spec = SearchSpec::new().add_namespace("user1");
/// let page = session.search("fr", spec)?.next_page().await?;
/// assert_eq!(page.len(), 1);
///
/// session.close().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct SearchSession {
    core: Arc<SessionCore>,
}

impl SearchSession {
    /// Open a session on the database described by `config`.
    ///
    /// # Arguments
    ///
    /// * `config` - Database name, location and tuning options
    ///
    /// # Returns
    ///
    /// A session with all persisted schemas and documents recovered. If
    /// recovery fails, nothing stays open.
    pub async fn open(config: SessionConfig) -> Result<Self> {
        let core = tokio::task::spawn_blocking(move || SessionCore::open(config))
            .await
            .map_err(|e| LocalSearchError::internal(format!("session open failed: {e}")))??;
        Ok(SearchSession {
            core: Arc::new(core),
        })
    }

    /// Open a session over a caller-supplied storage backend.
    ///
    /// `config.root_dir` is ignored; all files go to `storage`.
    pub async fn open_with_storage(
        config: SessionConfig,
        storage: Arc<dyn Storage>,
    ) -> Result<Self> {
        let core =
            tokio::task::spawn_blocking(move || SessionCore::open_with_storage(config, storage))
                .await
                .map_err(|e| LocalSearchError::internal(format!("session open failed: {e}")))??;
        Ok(SearchSession {
            core: Arc::new(core),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        self.core.config()
    }

    pub fn is_closed(&self) -> bool {
        self.core.is_closed()
    }

    /// Register a schema, or update it compatibly.
    ///
    /// # Returns
    ///
    /// What changed. When a field's indexing mode changed, existing
    /// documents of the type have already been re-indexed.
    pub async fn register_schema(&self, schema: Schema) -> Result<SchemaChange> {
        run_blocking(&self.core, move |core| core.register_schema(schema)).await
    }

    /// Insert or replace a document.
    ///
    /// # Returns
    ///
    /// The version this put replaced, if any.
    pub async fn put(&self, document: Document) -> Result<Option<Document>> {
        run_blocking(&self.core, move |core| core.put(document)).await
    }

    /// Put several documents; each succeeds or fails on its own.
    pub async fn put_documents(
        &self,
        documents: Vec<Document>,
    ) -> Result<BatchResult<DocumentKey, ()>> {
        run_blocking(&self.core, move |core| core.put_documents(documents)).await
    }

    /// Get the current version of a document. `None` is a normal miss.
    pub async fn get_by_id(&self, namespace: &str, id: &str) -> Result<Option<Document>> {
        let key = DocumentKey::new(namespace, id);
        run_blocking(&self.core, move |core| core.get(&key)).await
    }

    /// Get several documents of one namespace.
    pub async fn get_by_ids<I, S>(
        &self,
        namespace: &str,
        ids: I,
    ) -> Result<BatchResult<String, Document>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let namespace = namespace.to_string();
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        run_blocking(&self.core, move |core| core.get_by_ids(&namespace, &ids)).await
    }

    /// Delete a document. Deleting a missing id is not an error.
    pub async fn delete(&self, namespace: &str, id: &str) -> Result<DeleteOutcome> {
        let key = DocumentKey::new(namespace, id);
        run_blocking(&self.core, move |core| core.delete(&key)).await
    }

    /// Start a search. Nothing runs until the first page is requested.
    pub fn search(&self, query: &str, spec: SearchSpec) -> Result<SearchResults> {
        self.core.ensure_open()?;
        spec.validate()?;

        let page_size = spec.page_size_or(self.core.config().default_page_size);
        Ok(SearchResults::new(
            Arc::clone(&self.core),
            query.to_string(),
            spec,
            page_size,
        ))
    }

    /// Delete every document matching a search.
    ///
    /// # Returns
    ///
    /// The number of documents removed.
    pub async fn remove_by_query(&self, query: &str, spec: SearchSpec) -> Result<usize> {
        let query = query.to_string();
        run_blocking(&self.core, move |core| core.remove_by_query(&query, &spec)).await
    }

    /// Registered schemas, sorted by name.
    pub async fn schemas(&self) -> Result<Vec<Schema>> {
        run_blocking(&self.core, |core| core.schemas()).await
    }

    /// Namespaces holding at least one document, sorted.
    pub async fn namespaces(&self) -> Result<Vec<String>> {
        run_blocking(&self.core, |core| core.namespaces()).await
    }

    pub async fn storage_info(&self) -> Result<StorageInfo> {
        run_blocking(&self.core, |core| core.storage_info()).await
    }

    /// Write a snapshot and truncate the write-ahead log.
    pub async fn flush(&self) -> Result<()> {
        run_blocking(&self.core, |core| core.flush()).await
    }

    /// Flush and close the session.
    ///
    /// Operations still queued when the session closes, and every later
    /// operation, fail with `SessionClosed`. Closing twice is a no-op.
    pub async fn close(&self) -> Result<()> {
        let core = Arc::clone(&self.core);
        tokio::task::spawn_blocking(move || core.close())
            .await
            .map_err(|e| LocalSearchError::internal(format!("session close failed: {e}")))?
    }
}
