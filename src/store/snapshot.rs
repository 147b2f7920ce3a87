//! Point-in-time snapshots of a session's schemas and documents.

use std::io::{Read, Write};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::{LocalSearchError, Result};
use crate::schema::Schema;
use crate::storage::Storage;
use crate::store::wal::SeqNumber;

/// Default file name of the snapshot inside a session's storage.
pub const SNAPSHOT_FILE_NAME: &str = "snapshot.json";

/// Current on-disk snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Everything needed to rebuild a session without replaying the WAL from
/// the beginning. WAL records up to and including `last_wal_seq` are
/// already reflected here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    #[serde(default)]
    pub last_wal_seq: SeqNumber,
    #[serde(default)]
    pub schemas: Vec<Schema>,
    #[serde(default)]
    pub documents: Vec<Document>,
}

impl Snapshot {
    pub fn new(last_wal_seq: SeqNumber, schemas: Vec<Schema>, documents: Vec<Document>) -> Self {
        Snapshot {
            version: SNAPSHOT_VERSION,
            last_wal_seq,
            schemas,
            documents,
        }
    }

    /// Load the snapshot stored under `name`, if there is one.
    pub fn load(storage: &dyn Storage, name: &str) -> Result<Option<Snapshot>> {
        if !storage.file_exists(name) {
            return Ok(None);
        }

        let mut input = storage.open_input(name)?;
        let mut buffer = Vec::new();
        input.read_to_end(&mut buffer)?;
        if buffer.is_empty() {
            return Ok(None);
        }

        let snapshot: Snapshot = serde_json::from_slice(&buffer)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(LocalSearchError::invalid_config(format!(
                "snapshot version mismatch: expected {}, found {}",
                SNAPSHOT_VERSION, snapshot.version
            )));
        }

        debug!(
            "snapshot {name}: loaded {} schemas and {} documents at seq {}",
            snapshot.schemas.len(),
            snapshot.documents.len(),
            snapshot.last_wal_seq
        );
        Ok(Some(snapshot))
    }

    /// Write the snapshot to a temporary file and rename it over `name`, so
    /// readers only ever see a complete snapshot.
    pub fn write_atomic(&self, storage: &dyn Storage, name: &str) -> Result<()> {
        let serialized = serde_json::to_vec(self)?;
        let tmp_name = format!("{name}.tmp");

        let mut output = storage.create_output(&tmp_name)?;
        output.write_all(&serialized)?;
        output.flush_and_sync()?;
        output.close()?;

        storage.rename_file(&tmp_name, name)?;
        storage.sync()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDefinition, IndexingMode};
    use crate::storage::MemoryStorage;

    fn sample() -> Snapshot {
        let schema = Schema::builder("Note")
            .add_field(FieldDefinition::string("text").indexing(IndexingMode::Prefix))
            .unwrap()
            .build()
            .unwrap();
        let doc = Document::builder("user1", "noteId", "Note")
            .add_text("text", "Buy fresh fruit")
            .build();
        Snapshot::new(7, vec![schema], vec![doc])
    }

    #[test]
    fn test_write_and_load() {
        let storage = MemoryStorage::default();
        let snapshot = sample();

        snapshot.write_atomic(&storage, SNAPSHOT_FILE_NAME).unwrap();
        assert!(!storage.file_exists("snapshot.json.tmp"));

        let loaded = Snapshot::load(&storage, SNAPSHOT_FILE_NAME)
            .unwrap()
            .unwrap();
        assert_eq!(loaded, snapshot);
        assert_eq!(loaded.last_wal_seq, 7);
    }

    #[test]
    fn test_missing_snapshot() {
        let storage = MemoryStorage::default();
        assert!(Snapshot::load(&storage, SNAPSHOT_FILE_NAME).unwrap().is_none());
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let storage = MemoryStorage::default();
        let mut snapshot = sample();
        snapshot.version = SNAPSHOT_VERSION + 1;
        snapshot.write_atomic(&storage, SNAPSHOT_FILE_NAME).unwrap();

        let err = Snapshot::load(&storage, SNAPSHOT_FILE_NAME).unwrap_err();
        assert!(err.to_string().contains("snapshot version mismatch"));
    }
}
