//! Write-Ahead Log (WAL) for document store mutations.
//!
//! Every mutation is logged before it is applied to the in-memory state so
//! the state can be rebuilt after a crash. Records are framed as
//!
//! ```text
//! [len: u32 LE][crc32: u32 LE][payload: len bytes of JSON]
//! ```
//!
//! Replay stops at the first short or corrupt frame; everything before it
//! is trusted.

use std::io::{Cursor, Read, Write};
use std::sync::Arc;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::document::{Document, DocumentKey};
use crate::error::{LocalSearchError, Result};
use crate::schema::Schema;
use crate::storage::{Storage, StorageOutput};

/// Default file name of the log inside a session's storage.
pub const WAL_FILE_NAME: &str = "wal.log";

const FRAME_HEADER_LEN: usize = 8;

pub type SeqNumber = u64;

/// A single operation in the Write-Ahead Log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WalEntry {
    /// Register or update a schema.
    RegisterSchema { schema: Schema },
    /// Insert or replace a document.
    Put { document: Document },
    /// Delete a document.
    Delete { key: DocumentKey },
    /// Delete several documents as one unit.
    DeleteBatch { keys: Vec<DocumentKey> },
}

/// A WAL entry together with its sequence number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalRecord {
    pub seq: SeqNumber,
    pub entry: WalEntry,
}

/// Manages the Write-Ahead Log.
#[derive(Debug)]
pub struct WalManager {
    storage: Arc<dyn Storage>,
    path: String,
    writer: Option<Box<dyn StorageOutput>>,
    next_seq: SeqNumber,
    records_since_truncate: usize,
    torn_tail: bool,
}

impl WalManager {
    /// Create a new WAL manager. Nothing is opened until the first append.
    pub fn new(storage: Arc<dyn Storage>, path: &str) -> Self {
        WalManager {
            storage,
            path: path.to_string(),
            writer: None,
            next_seq: 1,
            records_since_truncate: 0,
            torn_tail: false,
        }
    }

    /// Set the next sequence number (e.g. after loading a snapshot).
    pub fn set_next_seq(&mut self, seq: SeqNumber) {
        self.next_seq = seq;
    }

    /// Get the last used sequence number.
    pub fn last_seq(&self) -> SeqNumber {
        self.next_seq.saturating_sub(1)
    }

    /// Number of records in the log since it was last truncated.
    pub fn len(&self) -> usize {
        self.records_since_truncate
    }

    pub fn is_empty(&self) -> bool {
        self.records_since_truncate == 0
    }

    /// Whether the log may hold bytes past the last acknowledged record:
    /// a partial frame found by [`read_all`](Self::read_all), or a failed
    /// append that could not be rolled back. Appending after such a tail
    /// would hide the new records from replay, so the log must be
    /// truncated first.
    pub fn has_torn_tail(&self) -> bool {
        self.torn_tail
    }

    /// Size of the log file in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.storage.file_size(&self.path).unwrap_or(0)
    }

    fn writer(&mut self) -> Result<&mut Box<dyn StorageOutput>> {
        let writer = match self.writer.take() {
            Some(writer) => writer,
            None => self.storage.create_output_append(&self.path)?,
        };
        Ok(self.writer.insert(writer))
    }

    /// Encode one record into its on-disk frame.
    fn encode_frame(record: &WalRecord) -> Result<Vec<u8>> {
        let payload = serde_json::to_vec(record)?;
        let mut frame = Vec::with_capacity(FRAME_HEADER_LEN + payload.len());
        frame.write_u32::<LittleEndian>(payload.len() as u32)?;
        frame.write_u32::<LittleEndian>(crc32fast::hash(&payload))?;
        frame.extend_from_slice(&payload);
        Ok(frame)
    }

    /// Append an entry and sync it to storage.
    ///
    /// Returns the assigned sequence number. On failure the sequence number
    /// is not consumed, the writer is dropped so the next append reopens the
    /// file, and the log is cut back to its length before the append. If
    /// that cut fails too, [`has_torn_tail`](Self::has_torn_tail) reports
    /// it and the caller must truncate the log before relying on it.
    pub fn append(&mut self, entry: WalEntry) -> Result<SeqNumber> {
        let seq = self.next_seq;
        let frame = Self::encode_frame(&WalRecord { seq, entry })?;

        let writer = self.writer()?;
        let start = writer.position()?;
        let result = writer
            .write_all(&frame)
            .map_err(LocalSearchError::from)
            .and_then(|()| writer.flush_and_sync());
        if let Err(e) = result {
            self.writer = None;
            self.rollback(start);
            return Err(e);
        }

        self.next_seq += 1;
        self.records_since_truncate += 1;
        debug!("wal: appended record {seq} ({} bytes)", frame.len());
        Ok(seq)
    }

    fn rollback(&mut self, len: u64) {
        match self.storage.truncate_file(&self.path, len) {
            Ok(()) => debug!("wal: rolled back failed append to {len} bytes"),
            Err(e) => {
                warn!("wal: could not roll back failed append: {e}");
                self.torn_tail = true;
            }
        }
    }

    /// Read every intact record from the log.
    ///
    /// Also advances the next sequence number past the highest one read.
    pub fn read_all(&mut self) -> Result<Vec<WalRecord>> {
        if !self.storage.file_exists(&self.path) {
            return Ok(Vec::new());
        }

        let mut bytes = Vec::new();
        self.storage
            .open_input(&self.path)?
            .read_to_end(&mut bytes)?;

        let (records, valid_len) = decode_frames(&bytes, &self.path);
        self.torn_tail = valid_len < bytes.len();
        if let Some(last) = records.last()
            && last.seq >= self.next_seq
        {
            self.next_seq = last.seq + 1;
        }
        self.records_since_truncate = records.len();

        Ok(records)
    }

    /// Clear the log. Called once its records are covered by a snapshot.
    pub fn truncate(&mut self) -> Result<()> {
        self.writer = None;

        let mut writer = self.storage.create_output(&self.path)?;
        writer.flush_and_sync()?;
        writer.close()?;

        self.records_since_truncate = 0;
        self.torn_tail = false;
        Ok(())
    }
}

/// Decode intact frames, returning them with the number of bytes they span.
fn decode_frames(bytes: &[u8], path: &str) -> (Vec<WalRecord>, usize) {
    let mut cursor = Cursor::new(bytes);
    let mut records = Vec::new();
    let mut valid_len = 0;

    while (cursor.position() as usize) < bytes.len() {
        let offset = cursor.position();
        let header = (
            cursor.read_u32::<LittleEndian>(),
            cursor.read_u32::<LittleEndian>(),
        );
        let (Ok(len), Ok(expected_crc)) = header else {
            warn!("wal {path}: truncated frame header at offset {offset}, ignoring tail");
            break;
        };

        let start = cursor.position() as usize;
        let Some(payload) = bytes.get(start..start + len as usize) else {
            warn!("wal {path}: truncated record at offset {offset}, ignoring tail");
            break;
        };
        if crc32fast::hash(payload) != expected_crc {
            warn!("wal {path}: checksum mismatch at offset {offset}, ignoring tail");
            break;
        }

        match serde_json::from_slice::<WalRecord>(payload) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!("wal {path}: undecodable record at offset {offset}: {e}");
                break;
            }
        }
        cursor.set_position((start + len as usize) as u64);
        valid_len = start + len as usize;
    }

    (records, valid_len)
}
