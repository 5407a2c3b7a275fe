//! Storage layer for qarecords.
//!
//! Records are persisted as a single JSON array under one key of a
//! synchronous key-value store. Every save rewrites the whole collection.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use tracing::{debug, error};

use crate::error::Result;
use crate::record::Record;

/// Default key the record collection is stored under.
pub const DEFAULT_KEY: &str = "qaRecords";

/// A synchronous string key-value store.
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Persists a record collection into a [`KeyValueStore`].
///
/// Persistence is best-effort: read and write failures are logged and do
/// not reach the caller.
#[derive(Debug)]
pub struct RecordStore<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Create a record store using [`DEFAULT_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_KEY)
    }

    /// Create a record store that uses a custom key.
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The key the collection is stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying key-value store.
    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Load the stored collection.
    ///
    /// Returns an empty collection when nothing is stored or the stored
    /// data cannot be read.
    pub fn load(&self) -> Vec<Record> {
        match self.try_load() {
            Ok(records) => {
                debug!(key = %self.key, count = records.len(), "Loaded records");
                records
            }
            Err(e) => {
                error!(key = %self.key, "Failed to load records: {e}");
                Vec::new()
            }
        }
    }

    /// Save the whole collection, logging on failure.
    pub fn save(&mut self, records: &[Record]) {
        match self.try_save(records) {
            Ok(()) => debug!(key = %self.key, count = records.len(), "Saved records"),
            Err(e) => error!(key = %self.key, "Failed to save records: {e}"),
        }
    }

    fn try_load(&self) -> Result<Vec<Record>> {
        match self.store.get_item(&self.key)? {
            Some(data) => Ok(serde_json::from_str(&data)?),
            None => Ok(Vec::new()),
        }
    }

    fn try_save(&mut self, records: &[Record]) -> Result<()> {
        let data = serde_json::to_string(records)?;
        self.store.set_item(&self.key, &data)
    }
}
