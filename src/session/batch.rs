//! Per-item outcomes of batch operations.

use std::collections::BTreeMap;

use crate::error::LocalSearchError;

/// Outcome of a batch operation, one entry per requested key.
///
/// A batch never fails as a whole because of one item; each key lands in
/// either the successes or the failures.
#[derive(Debug)]
pub struct BatchResult<K: Ord, V> {
    successes: BTreeMap<K, V>,
    failures: BTreeMap<K, LocalSearchError>,
}

impl<K: Ord, V> BatchResult<K, V> {
    pub fn new() -> Self {
        BatchResult {
            successes: BTreeMap::new(),
            failures: BTreeMap::new(),
        }
    }

    pub fn set_success(&mut self, key: K, value: V) {
        self.failures.remove(&key);
        self.successes.insert(key, value);
    }

    pub fn set_failure(&mut self, key: K, error: LocalSearchError) {
        self.successes.remove(&key);
        self.failures.insert(key, error);
    }

    /// Whether every item succeeded.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn successes(&self) -> &BTreeMap<K, V> {
        &self.successes
    }

    pub fn failures(&self) -> &BTreeMap<K, LocalSearchError> {
        &self.failures
    }

    pub fn into_successes(self) -> BTreeMap<K, V> {
        self.successes
    }

    /// Number of items in the batch.
    pub fn len(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Ord, V> Default for BatchResult<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
