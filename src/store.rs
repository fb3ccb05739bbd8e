//! Record store
//!
//! Owns the ordered record list and the editing cursor. Every successful
//! mutation is flushed to the repository before returning.

use thiserror::Error;

use crate::clock::{Clock, SystemClock};
use crate::persistence::{PersistenceError, RecordRepository, SlotStorage};
use crate::record::{Candidate, Record};
use crate::stats::{Stats, summarize};
use crate::validate::{ValidationErrors, validate};

/// Rejected store operation. The store is left untouched.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("index {index} out of range ({len} records)")]
    InvalidIndex { index: usize, len: usize },

    #[error("record {index} is not open for editing")]
    NotEditing { index: usize },
}

/// Result of a successful create or update
#[derive(Debug)]
#[must_use]
pub struct Committed {
    /// Index of the written record
    pub index: usize,
    /// Set when the mutation applied in memory but could not be persisted
    pub warning: Option<PersistenceError>,
}

/// Result of a successful delete
#[derive(Debug)]
#[must_use]
pub struct Deleted {
    pub record: Record,
    /// The deleted record was being edited; the form must be reset
    pub edit_cancelled: bool,
    pub warning: Option<PersistenceError>,
}

/// Ordered record list with a single editing cursor
pub struct RecordStore<S> {
    records: Vec<Record>,
    editing: Option<usize>,
    repo: RecordRepository<S>,
    clock: Box<dyn Clock>,
}

impl<S: SlotStorage> RecordStore<S> {
    /// Open the store on the default key, loading whatever the slot holds
    pub fn open(slot: S) -> Self {
        Self::from_repository(RecordRepository::new(slot))
    }

    pub fn open_with_key(slot: S, key: impl Into<String>) -> Self {
        Self::from_repository(RecordRepository::with_key(slot, key))
    }

    pub fn from_repository(repo: RecordRepository<S>) -> Self {
        let records = repo.load();
        Self {
            records,
            editing: None,
            repo,
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the date source used for validation
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Records in insertion order
    pub fn list(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index of the record open for editing
    pub fn editing_index(&self) -> Option<usize> {
        self.editing
    }

    pub fn stats(&self) -> Stats {
        summarize(&self.records)
    }

    pub fn repository(&self) -> &RecordRepository<S> {
        &self.repo
    }

    /// Create when no record is being edited, otherwise update the edited one
    pub fn submit(&mut self, candidate: Candidate) -> Result<Committed, StoreError> {
        match self.editing {
            None => self.create(candidate),
            Some(index) => self.update(index, candidate),
        }
    }

    /// Append a validated record
    pub fn create(&mut self, candidate: Candidate) -> Result<Committed, StoreError> {
        validate(&candidate, self.clock.today())?;

        self.records.push(candidate.into_record());
        let index = self.records.len() - 1;
        log::info!("Added record {} ('{}')", index, self.records[index].name);

        Ok(Committed {
            index,
            warning: self.flush(),
        })
    }

    /// Replace the record at `index`, which must be the one being edited.
    ///
    /// Leaves edit mode on success.
    pub fn update(&mut self, index: usize, candidate: Candidate) -> Result<Committed, StoreError> {
        self.check_index(index)?;
        if self.editing != Some(index) {
            return Err(StoreError::NotEditing { index });
        }
        validate(&candidate, self.clock.today())?;

        self.records[index] = candidate.into_record();
        self.editing = None;
        log::info!("Updated record {} ('{}')", index, self.records[index].name);

        Ok(Committed {
            index,
            warning: self.flush(),
        })
    }

    /// Remove the record at `index`, shifting later records down.
    ///
    /// The cursor keeps following the same logical record: cleared if it
    /// pointed at the removed one, decremented if it pointed past it.
    pub fn delete(&mut self, index: usize) -> Result<Deleted, StoreError> {
        self.check_index(index)?;

        let record = self.records.remove(index);
        let mut edit_cancelled = false;
        self.editing = match self.editing {
            Some(e) if e == index => {
                edit_cancelled = true;
                None
            }
            Some(e) if e > index => Some(e - 1),
            other => other,
        };
        log::info!("Deleted record {} ('{}')", index, record.name);

        Ok(Deleted {
            record,
            edit_cancelled,
            warning: self.flush(),
        })
    }

    /// Open the record at `index` for editing and return its current fields
    pub fn begin_edit(&mut self, index: usize) -> Result<&Record, StoreError> {
        self.check_index(index)?;
        self.editing = Some(index);
        Ok(&self.records[index])
    }

    /// Leave edit mode. Idempotent.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    fn check_index(&self, index: usize) -> Result<(), StoreError> {
        if index < self.records.len() {
            Ok(())
        } else {
            Err(StoreError::InvalidIndex {
                index,
                len: self.records.len(),
            })
        }
    }

    /// Persist the full list; a failure is returned, never rolled back
    fn flush(&mut self) -> Option<PersistenceError> {
        match self.repo.save(&self.records) {
            Ok(()) => None,
            Err(e) => {
                log::error!("Failed to persist {} records: {}", self.records.len(), e);
                Some(e)
            }
        }
    }
}
