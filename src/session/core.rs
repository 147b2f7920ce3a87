//! Synchronous session core: schemas, documents, index and WAL behind one
//! lock.
//!
//! Every mutation follows the same order: validate, analyze, append to the
//! WAL, then apply to memory. Anything that can fail happens before the
//! in-memory state is touched, so a failed operation leaves no trace.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, warn};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::document::{Document, DocumentKey};
use crate::error::{LocalSearchError, Result};
use crate::index::{InvertedIndex, PreparedDocument};
use crate::query::engine::{QueryEngine, ScoredDocument};
use crate::query::spec::SearchSpec;
use crate::schema::{Schema, SchemaChange, SchemaRegistry};
use crate::session::batch::BatchResult;
use crate::session::config::SessionConfig;
use crate::storage::{FileStorage, MemoryStorage, Storage};
use crate::store::{
    DeleteOutcome, DocumentStore, SNAPSHOT_FILE_NAME, SeqNumber, Snapshot, WAL_FILE_NAME,
    WalEntry, WalManager,
};

/// Point-in-time statistics about a session's store and index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageInfo {
    pub document_count: usize,
    pub namespace_count: usize,
    pub schema_count: usize,
    pub term_count: usize,
    pub posting_count: usize,
    /// Records appended since the last checkpoint.
    pub wal_records: usize,
    pub wal_bytes: u64,
    /// Whether the data outlives the session: a database directory or a
    /// caller-supplied storage backend.
    pub persistent: bool,
}

/// Mutable state guarded by the session lock.
#[derive(Debug)]
struct CoreState {
    storage: Arc<dyn Storage>,
    registry: SchemaRegistry,
    store: DocumentStore,
    index: InvertedIndex,
    wal: WalManager,
    /// Highest WAL sequence number covered by the persisted snapshot.
    snapshot_seq: SeqNumber,
    /// Set when the WAL may end in a rejected or partial record and the
    /// immediate checkpoint failed; the next append must checkpoint first.
    needs_checkpoint: bool,
}

impl CoreState {
    /// Rebuild state from the snapshot and the WAL records after it.
    fn recover(storage: Arc<dyn Storage>) -> Result<Self> {
        let mut state = CoreState {
            storage: Arc::clone(&storage),
            registry: SchemaRegistry::new(),
            store: DocumentStore::new(),
            index: InvertedIndex::new(),
            wal: WalManager::new(Arc::clone(&storage), WAL_FILE_NAME),
            snapshot_seq: 0,
            needs_checkpoint: false,
        };

        if let Some(snapshot) = Snapshot::load(storage.as_ref(), SNAPSHOT_FILE_NAME)? {
            state.registry = SchemaRegistry::from_schemas(snapshot.schemas);
            for document in snapshot.documents {
                state.store.put(document);
            }
            state.snapshot_seq = snapshot.last_wal_seq;
        }

        state.wal.set_next_seq(state.snapshot_seq + 1);
        let mut replayed = 0;
        for record in state.wal.read_all()? {
            if record.seq <= state.snapshot_seq {
                continue;
            }
            state.replay(record.entry)?;
            replayed += 1;
        }
        state.rebuild_index()?;

        if state.wal.has_torn_tail() {
            warn!("wal ends in a partial record, checkpointing before accepting writes");
            state.checkpoint()?;
        }

        info!(
            "recovered {} schemas and {} documents ({} wal records replayed)",
            state.registry.len(),
            state.store.len(),
            replayed
        );
        Ok(state)
    }

    fn replay(&mut self, entry: WalEntry) -> Result<()> {
        match entry {
            WalEntry::RegisterSchema { schema } => {
                self.registry.register(schema)?;
            }
            WalEntry::Put { document } => {
                self.store.put(document);
            }
            WalEntry::Delete { key } => {
                self.store.delete(&key);
            }
            WalEntry::DeleteBatch { keys } => {
                for key in &keys {
                    self.store.delete(key);
                }
            }
        }
        Ok(())
    }

    fn rebuild_index(&mut self) -> Result<()> {
        self.index.clear();
        for document in self.store.iter() {
            match self.registry.get(document.schema_type()) {
                Some(schema) => {
                    self.index.index(document, &schema)?;
                }
                None => warn!(
                    "document {} references unknown schema '{}', not indexed",
                    document.key(),
                    document.schema_type()
                ),
            }
        }
        Ok(())
    }

    /// Persist a snapshot of the current state and clear the WAL.
    fn checkpoint(&mut self) -> Result<()> {
        let last_seq = self.wal.last_seq();
        let schemas = self
            .registry
            .schemas()
            .iter()
            .map(|schema| schema.as_ref().clone())
            .collect();
        let snapshot = Snapshot::new(last_seq, schemas, self.store.sorted_documents());

        snapshot.write_atomic(self.storage.as_ref(), SNAPSHOT_FILE_NAME)?;
        self.snapshot_seq = last_seq;
        self.wal.truncate()?;
        self.needs_checkpoint = false;

        debug!(
            "checkpoint at seq {last_seq}: {} documents",
            self.store.len()
        );
        Ok(())
    }

    fn append(&mut self, entry: WalEntry) -> Result<SeqNumber> {
        if self.needs_checkpoint {
            self.checkpoint()?;
        }

        self.wal.append(entry).inspect_err(|e| {
            warn!("wal append failed, state left unchanged: {e}");
            if self.wal.has_torn_tail() {
                self.checkpoint_after_failed_append();
            }
        })
    }

    // The log may still end in the rejected record; checkpointing the
    // unchanged state truncates it.
    fn checkpoint_after_failed_append(&mut self) {
        if let Err(e) = self.checkpoint() {
            warn!("checkpoint after failed append failed, retrying on the next write: {e}");
            self.needs_checkpoint = true;
        }
    }

    fn maybe_compact(&mut self, threshold: usize) {
        if self.wal.len() >= threshold
            && let Err(e) = self.checkpoint()
        {
            warn!("wal compaction failed, will retry on the next write: {e}");
        }
    }

    fn register_schema(&mut self, schema: Schema) -> Result<SchemaChange> {
        let change = self.registry.check(&schema)?;
        let reindex = match change {
            SchemaChange::Unchanged => return Ok(change),
            SchemaChange::Created | SchemaChange::Updated { reindex: false } => Vec::new(),
            SchemaChange::Updated { reindex: true } => self
                .store
                .documents_of_type(schema.name())
                .map(|document| self.index.prepare(document, &schema))
                .collect::<Result<Vec<PreparedDocument>>>()?,
        };

        self.append(WalEntry::RegisterSchema {
            schema: schema.clone(),
        })?;
        let name = schema.name().to_string();
        self.registry.register(schema)?;
        let reindexed = reindex.len();
        for prepared in reindex {
            self.index.apply(prepared);
        }

        info!("schema '{name}' registered ({change:?}, {reindexed} documents reindexed)");
        Ok(change)
    }

    fn put(&mut self, document: Document) -> Result<Option<Arc<Document>>> {
        let schema = self.registry.validate(&document)?;
        let prepared = self.index.prepare(&document, &schema)?;

        self.append(WalEntry::Put {
            document: document.clone(),
        })?;
        let prior = self.store.put(document);
        self.index.apply(prepared);

        Ok(prior)
    }

    fn delete(&mut self, key: &DocumentKey) -> Result<DeleteOutcome> {
        if !self.store.contains(key) {
            return Ok(DeleteOutcome::Absent);
        }

        self.append(WalEntry::Delete { key: key.clone() })?;
        self.store.delete(key);
        self.index.retract(key);
        Ok(DeleteOutcome::Deleted)
    }

    fn delete_batch(&mut self, keys: Vec<DocumentKey>) -> Result<usize> {
        if keys.is_empty() {
            return Ok(0);
        }

        self.append(WalEntry::DeleteBatch { keys: keys.clone() })?;
        for key in &keys {
            self.store.delete(key);
            self.index.retract(key);
        }
        Ok(keys.len())
    }

    fn search(&self, query: &str, spec: &SearchSpec) -> Result<Vec<ScoredDocument>> {
        QueryEngine::new(&self.store, &self.index).execute(query, spec)
    }
}

/// The lock-guarded heart of a [`SearchSession`](crate::session::SearchSession).
///
/// Writers are serialized by the lock; readers share it and always observe
/// a document together with exactly the postings derived from it.
#[derive(Debug)]
pub struct SessionCore {
    config: SessionConfig,
    persistent: bool,
    state: RwLock<CoreState>,
    closed: AtomicBool,
}

impl SessionCore {
    /// Open the database described by `config`.
    pub fn open(config: SessionConfig) -> Result<Self> {
        config.validate()?;

        let storage: Arc<dyn Storage> = match config.database_dir() {
            Some(dir) => Arc::new(FileStorage::new(dir, config.storage.clone())?),
            None => Arc::new(MemoryStorage::new(config.storage.clone())),
        };
        let persistent = config.root_dir.is_some();
        Self::open_inner(config, storage, persistent)
    }

    /// Open a database over an explicit storage backend.
    pub fn open_with_storage(config: SessionConfig, storage: Arc<dyn Storage>) -> Result<Self> {
        config.validate()?;
        Self::open_inner(config, storage, true)
    }

    fn open_inner(
        config: SessionConfig,
        storage: Arc<dyn Storage>,
        persistent: bool,
    ) -> Result<Self> {
        let state = CoreState::recover(storage)?;
        info!("opened database '{}'", config.database_name);

        Ok(SessionCore {
            config,
            persistent,
            state: RwLock::new(state),
            closed: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            Err(LocalSearchError::SessionClosed)
        } else {
            Ok(())
        }
    }

    // The closed flag is checked again once the lock is held, so an
    // operation queued behind `close` fails instead of running.
    fn read(&self) -> Result<RwLockReadGuard<'_, CoreState>> {
        self.ensure_open()?;
        let guard = self.state.read();
        self.ensure_open()?;
        Ok(guard)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, CoreState>> {
        self.ensure_open()?;
        let guard = self.state.write();
        self.ensure_open()?;
        Ok(guard)
    }

    pub fn register_schema(&self, schema: Schema) -> Result<SchemaChange> {
        let mut state = self.write()?;
        let change = state.register_schema(schema)?;
        state.maybe_compact(self.config.wal_compaction_threshold);
        Ok(change)
    }

    /// Insert or replace a document, returning the version it replaced.
    pub fn put(&self, document: Document) -> Result<Option<Document>> {
        let mut state = self.write()?;
        let prior = state.put(document)?;
        state.maybe_compact(self.config.wal_compaction_threshold);
        Ok(prior.map(|doc| doc.as_ref().clone()))
    }

    /// Put each document independently, reporting a result per key.
    pub fn put_documents(
        &self,
        documents: Vec<Document>,
    ) -> Result<BatchResult<DocumentKey, ()>> {
        let mut state = self.write()?;
        let mut batch = BatchResult::new();
        for document in documents {
            let key = document.key().clone();
            match state.put(document) {
                Ok(_) => batch.set_success(key, ()),
                Err(e) => batch.set_failure(key, e),
            }
        }
        state.maybe_compact(self.config.wal_compaction_threshold);
        Ok(batch)
    }

    pub fn get(&self, key: &DocumentKey) -> Result<Option<Document>> {
        let state = self.read()?;
        Ok(state.store.get(key).map(|doc| doc.as_ref().clone()))
    }

    /// Fetch several ids from one namespace; misses are reported as
    /// `NotFound` failures.
    pub fn get_by_ids(
        &self,
        namespace: &str,
        ids: &[String],
    ) -> Result<BatchResult<String, Document>> {
        let state = self.read()?;
        let mut batch = BatchResult::new();
        for id in ids {
            let key = DocumentKey::new(namespace, id.as_str());
            match state.store.get(&key) {
                Some(doc) => batch.set_success(id.clone(), doc.as_ref().clone()),
                None => batch.set_failure(
                    id.clone(),
                    LocalSearchError::not_found(format!("document {key}")),
                ),
            }
        }
        Ok(batch)
    }

    pub fn delete(&self, key: &DocumentKey) -> Result<DeleteOutcome> {
        let mut state = self.write()?;
        let outcome = state.delete(key)?;
        state.maybe_compact(self.config.wal_compaction_threshold);
        Ok(outcome)
    }

    /// Run a search and return every ranked match.
    pub fn search(&self, query: &str, spec: &SearchSpec) -> Result<Vec<ScoredDocument>> {
        let state = self.read()?;
        state.search(query, spec)
    }

    /// Delete every document matching the query. Returns how many were
    /// removed.
    pub fn remove_by_query(&self, query: &str, spec: &SearchSpec) -> Result<usize> {
        let mut state = self.write()?;
        let keys = state
            .search(query, spec)?
            .into_iter()
            .map(|result| result.document.key().clone())
            .collect();
        let removed = state.delete_batch(keys)?;
        state.maybe_compact(self.config.wal_compaction_threshold);
        Ok(removed)
    }

    pub fn schemas(&self) -> Result<Vec<Schema>> {
        let state = self.read()?;
        Ok(state
            .registry
            .schemas()
            .iter()
            .map(|schema| schema.as_ref().clone())
            .collect())
    }

    pub fn namespaces(&self) -> Result<Vec<String>> {
        Ok(self.read()?.store.namespaces())
    }

    pub fn storage_info(&self) -> Result<StorageInfo> {
        let state = self.read()?;
        Ok(StorageInfo {
            document_count: state.store.len(),
            namespace_count: state.store.namespaces().len(),
            schema_count: state.registry.len(),
            term_count: state.index.term_count(),
            posting_count: state.index.posting_count(),
            wal_records: state.wal.len(),
            wal_bytes: state.wal.size_bytes(),
            persistent: self.persistent,
        })
    }

    /// Snapshot the current state and truncate the WAL.
    pub fn flush(&self) -> Result<()> {
        self.write()?.checkpoint()
    }

    /// Flush and mark the session closed. Closing twice is a no-op.
    ///
    /// An in-memory session skips the flush and drops its contents.
    ///
    /// The session counts as closed even if the final flush fails; the
    /// WAL still holds every acknowledged write in that case.
    pub fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        let mut state = self.state.write();
        if !self.persistent {
            state.store.clear();
            state.index.clear();
            info!("closed in-memory database '{}'", self.config.database_name);
            return Ok(());
        }

        let result = state.checkpoint();
        match &result {
            Ok(()) => info!("closed database '{}'", self.config.database_name),
            Err(e) => warn!(
                "closing database '{}' without a final snapshot: {e}",
                self.config.database_name
            ),
        }
        result
    }
}
