//! Aquarium Tracker - keep tabs on tanks and water changes
//!
//! Core modules:
//! - `record`: Tank records and raw form candidates
//! - `validate`: Field rules for candidates
//! - `store`: Ordered record list with an editing cursor
//! - `persistence`: JSON slot storage (LocalStorage on web, files on native)
//! - `stats`: Count and average tank size
//! - `tracker`: Facade the page drives from user events

pub mod clock;
pub mod format;
pub mod persistence;
pub mod record;
pub mod stats;
pub mod store;
pub mod tracker;
pub mod validate;

pub use clock::{Clock, FixedClock, SystemClock};
pub use persistence::{PersistenceError, RecordRepository, SlotStorage};
pub use record::{Candidate, Record};
pub use stats::{Stats, summarize};
pub use store::{Committed, Deleted, RecordStore, StoreError};
pub use tracker::{Feedback, FormState, RecordView, Tracker};
pub use validate::{Field, ValidationErrors, ValidationIssue, validate};

/// Tracker configuration constants
pub mod consts {
    /// Storage key holding the record list
    pub const STORAGE_KEY: &str = "fishList";

    /// Minimum trimmed name length, in UTF-16 code units
    pub const NAME_MIN_CHARS: usize = 2;
    /// Largest accepted tank size in liters
    pub const TANK_SIZE_MAX: i64 = 10_000;

    /// Shown when an index or storage fault reaches the page
    pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";
    /// Shown when a change applied but could not be saved
    pub const SAVE_WARNING: &str = "Your change was applied but could not be saved.";
}
