//! Session configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LocalSearchError, Result};
use crate::query::spec::DEFAULT_RESULT_COUNT_PER_PAGE;
use crate::storage::StorageConfig;

/// Default number of WAL records kept before the session checkpoints.
pub const DEFAULT_WAL_COMPACTION_THRESHOLD: usize = 1000;

/// Configuration for opening a [`SearchSession`](crate::session::SearchSession).
///
/// With a `root_dir` the database lives in `<root_dir>/<database_name>`;
/// without one it is kept in memory and discarded on close.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub database_name: String,
    #[serde(default)]
    pub root_dir: Option<PathBuf>,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default = "SessionConfig::default_wal_compaction_threshold")]
    pub wal_compaction_threshold: usize,
    #[serde(default = "SessionConfig::default_result_count")]
    pub default_page_size: usize,
}

impl SessionConfig {
    /// In-memory configuration for the named database.
    pub fn new<S: Into<String>>(database_name: S) -> Self {
        SessionConfig {
            database_name: database_name.into(),
            root_dir: None,
            storage: StorageConfig::default(),
            wal_compaction_threshold: DEFAULT_WAL_COMPACTION_THRESHOLD,
            default_page_size: DEFAULT_RESULT_COUNT_PER_PAGE,
        }
    }

    /// Persist the database under `root_dir`.
    pub fn root_dir<P: AsRef<Path>>(mut self, root_dir: P) -> Self {
        self.root_dir = Some(root_dir.as_ref().to_path_buf());
        self
    }

    pub fn storage(mut self, storage: StorageConfig) -> Self {
        self.storage = storage;
        self
    }

    pub fn wal_compaction_threshold(mut self, threshold: usize) -> Self {
        self.wal_compaction_threshold = threshold;
        self
    }

    pub fn default_page_size(mut self, page_size: usize) -> Self {
        self.default_page_size = page_size;
        self
    }

    /// Directory holding the database files, if persistent.
    pub fn database_dir(&self) -> Option<PathBuf> {
        self.root_dir
            .as_ref()
            .map(|root| root.join(&self.database_name))
    }

    fn default_wal_compaction_threshold() -> usize {
        DEFAULT_WAL_COMPACTION_THRESHOLD
    }

    fn default_result_count() -> usize {
        DEFAULT_RESULT_COUNT_PER_PAGE
    }

    pub fn validate(&self) -> Result<()> {
        let name = self.database_name.as_str();
        if name.trim().is_empty() {
            return Err(LocalSearchError::invalid_config(
                "database name cannot be empty",
            ));
        }
        if name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(LocalSearchError::invalid_config(format!(
                "database name '{name}' must be a single path component"
            )));
        }
        if self.wal_compaction_threshold == 0 {
            return Err(LocalSearchError::invalid_config(
                "wal_compaction_threshold must be at least 1",
            ));
        }
        if self.default_page_size == 0 {
            return Err(LocalSearchError::invalid_config(
                "default_page_size must be at least 1",
            ));
        }
        if self.storage.buffer_size == 0 {
            return Err(LocalSearchError::invalid_config(
                "storage buffer_size must be at least 1",
            ));
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new("default")
    }
}
