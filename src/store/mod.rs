//! Document persistence: the in-memory document table, its write-ahead log
//! and snapshots.

pub mod document_store;
pub mod snapshot;
pub mod wal;

pub use document_store::{DeleteOutcome, DocumentStore};
pub use snapshot::{SNAPSHOT_FILE_NAME, Snapshot};
pub use wal::{SeqNumber, WAL_FILE_NAME, WalEntry, WalManager, WalRecord};
