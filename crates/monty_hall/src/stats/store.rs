//! Key-value persistence contract for statistics.

use std::collections::HashMap;

use derive_more::{Display, Error};
use tracing::{debug, instrument};

/// Integer key-value store scoped to the application.
///
/// Failures are reported but never fatal: callers fall back to in-memory
/// counters.
pub trait StatsStore {
    /// Reads a value. `Ok(None)` means the key has never been written.
    fn get(&self, key: &str) -> Result<Option<i64>, StoreError>;

    /// Writes a value, replacing any previous one.
    fn set(&mut self, key: &str, value: i64) -> Result<(), StoreError>;
}

impl<S: StatsStore + ?Sized> StatsStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<i64>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: i64) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// Store error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Store error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Process-local store. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, i64>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys written so far.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl StatsStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<i64>, StoreError> {
        Ok(self.values.get(key).copied())
    }

    #[instrument(skip(self))]
    fn set(&mut self, key: &str, value: i64) -> Result<(), StoreError> {
        debug!("Storing value in memory");
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}
