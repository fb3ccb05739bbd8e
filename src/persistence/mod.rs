//! Record list persistence
//!
//! Features:
//! - Whole list serialized as one JSON array under a single key
//! - Wholesale replace on save (no append, no versioning)
//! - Soft load: missing or corrupt slots start an empty list

pub mod slot;

pub use slot::{FileSlot, MemorySlot, SlotStorage};

#[cfg(target_arch = "wasm32")]
pub use slot::LocalStorageSlot;

use thiserror::Error;

use crate::consts::STORAGE_KEY;
use crate::record::Record;

/// Failure reading or writing the durable slot
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage read failed: {0}")]
    Read(String),

    #[error("storage write failed: {0}")]
    Write(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode records: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode records: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Loads and saves the record list through a [`SlotStorage`]
#[derive(Debug)]
pub struct RecordRepository<S> {
    slot: S,
    key: String,
}

impl<S: SlotStorage> RecordRepository<S> {
    /// Repository on the default key
    pub fn new(slot: S) -> Self {
        Self::with_key(slot, STORAGE_KEY)
    }

    pub fn with_key(slot: S, key: impl Into<String>) -> Self {
        Self {
            slot,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// Read the stored list. A never-written slot is an empty list.
    pub fn try_load(&self) -> Result<Vec<Record>, PersistenceError> {
        match self.slot.get_item(&self.key)? {
            Some(json) => serde_json::from_str(&json).map_err(PersistenceError::Decode),
            None => Ok(Vec::new()),
        }
    }

    /// Read the stored list, falling back to empty on any failure
    pub fn load(&self) -> Vec<Record> {
        match self.try_load() {
            Ok(records) => {
                log::info!("Loaded {} records from '{}'", records.len(), self.key);
                records
            }
            Err(e) => {
                log::warn!("Could not load '{}', starting empty: {}", self.key, e);
                Vec::new()
            }
        }
    }

    /// Replace the stored list with `records`
    pub fn save(&mut self, records: &[Record]) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(records).map_err(PersistenceError::Encode)?;
        self.slot.set_item(&self.key, &json)?;
        log::debug!("Saved {} records to '{}'", records.len(), self.key);
        Ok(())
    }

    /// Remove the slot entirely
    pub fn clear(&mut self) -> Result<(), PersistenceError> {
        self.slot.remove_item(&self.key)?;
        log::info!("Cleared '{}'", self.key);
        Ok(())
    }
}
