//! Presentation-facing facade
//!
//! The page calls these entry points in response to user events and
//! renders from the returned view data. Nothing here touches the DOM.
//! Index and storage faults are logged and collapsed into a generic
//! message; validation failures come back field by field.

use crate::consts::{GENERIC_FAILURE, SAVE_WARNING};
use crate::format::{format_date, format_liters};
use crate::persistence::SlotStorage;
use crate::record::{Candidate, Record};
use crate::stats::Stats;
use crate::store::{RecordStore, StoreError};
use crate::validate::{Field, ValidationErrors};

/// What the page should show after handling an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    /// Applied. Re-render list, stats and form. A warning means the change
    /// is live but was not persisted.
    Done { warning: Option<&'static str> },
    /// Input rejected; the form keeps the user's values
    Invalid(ValidationErrors),
    /// Integration fault, already logged
    Failed(&'static str),
}

impl Feedback {
    pub fn is_done(&self) -> bool {
        matches!(self, Feedback::Done { .. })
    }

    /// Fields to highlight
    pub fn invalid_fields(&self) -> Vec<Field> {
        match self {
            Feedback::Invalid(errors) => Field::ALL
                .into_iter()
                .filter(|f| errors.has_field(*f))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Lines for the message box under the form
    pub fn messages(&self) -> Vec<&'static str> {
        match self {
            Feedback::Done { warning } => warning.iter().copied().collect(),
            Feedback::Invalid(errors) => errors.issues().iter().map(|i| i.hint()).collect(),
            Feedback::Failed(message) => vec![*message],
        }
    }
}

/// Form title, button labels and field values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub title: &'static str,
    pub submit_label: &'static str,
    pub cancel_visible: bool,
    pub values: Candidate,
}

/// One card in the tank list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordView {
    pub index: usize,
    pub name: String,
    pub tank_size: String,
    pub last_water_change: String,
}

impl RecordView {
    fn new(index: usize, record: &Record) -> Self {
        Self {
            index,
            name: record.name.clone(),
            tank_size: format!("Tank Size: {}", format_liters(&record.tank_size)),
            last_water_change: format!(
                "Last Water Change: {}",
                format_date(&record.last_water_change)
            ),
        }
    }
}

/// Record store plus the form it is bound to
pub struct Tracker<S> {
    store: RecordStore<S>,
    values: Candidate,
}

impl<S: SlotStorage> Tracker<S> {
    pub fn new(store: RecordStore<S>) -> Self {
        Self {
            store,
            values: Candidate::default(),
        }
    }

    /// Add or update depending on whether a record is open for editing
    pub fn submit(&mut self, name: &str, tank_size: &str, last_water_change: &str) -> Feedback {
        let candidate = Candidate::new(name, tank_size, last_water_change);
        self.values = candidate.clone();

        match self.store.submit(candidate) {
            Ok(committed) => {
                self.values = Candidate::default();
                Feedback::Done {
                    warning: committed.warning.map(|_| SAVE_WARNING),
                }
            }
            Err(e) => self.reject(e),
        }
    }

    /// Open a record for editing and prefill the form with it
    pub fn request_edit(&mut self, index: usize) -> Feedback {
        match self.store.begin_edit(index) {
            Ok(record) => {
                self.values = record.to_candidate();
                Feedback::Done { warning: None }
            }
            Err(e) => self.reject(e),
        }
    }

    /// Delete a record. Confirmation must already have been given.
    pub fn request_delete(&mut self, index: usize) -> Feedback {
        match self.store.delete(index) {
            Ok(deleted) => {
                if deleted.edit_cancelled {
                    self.values = Candidate::default();
                }
                Feedback::Done {
                    warning: deleted.warning.map(|_| SAVE_WARNING),
                }
            }
            Err(e) => self.reject(e),
        }
    }

    /// Leave edit mode and clear the form
    pub fn request_cancel_edit(&mut self) -> Feedback {
        self.store.cancel_edit();
        self.values = Candidate::default();
        Feedback::Done { warning: None }
    }

    /// Question to confirm before deleting `index`
    pub fn delete_prompt(&self, index: usize) -> Option<String> {
        self.store
            .get(index)
            .map(|r| format!("Are you sure you want to delete \"{}\"?", r.name))
    }

    /// Records in display order
    pub fn snapshot(&self) -> &[Record] {
        self.store.list()
    }

    pub fn cards(&self) -> Vec<RecordView> {
        self.store
            .list()
            .iter()
            .enumerate()
            .map(|(i, r)| RecordView::new(i, r))
            .collect()
    }

    pub fn stats(&self) -> Stats {
        self.store.stats()
    }

    pub fn form(&self) -> FormState {
        let editing = self.store.editing_index().is_some();
        FormState {
            title: if editing { "Edit Fish" } else { "Add a New Fish" },
            submit_label: if editing { "Update Fish" } else { "Add Fish" },
            cancel_visible: editing,
            values: self.values.clone(),
        }
    }

    fn reject(&self, error: StoreError) -> Feedback {
        match error {
            StoreError::Validation(errors) => Feedback::Invalid(errors),
            other => {
                log::error!("Rejected operation: {}", other);
                Feedback::Failed(GENERIC_FAILURE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::persistence::MemorySlot;
    use chrono::NaiveDate;

    fn tracker() -> Tracker<MemorySlot> {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        Tracker::new(RecordStore::open(MemorySlot::new()).with_clock(FixedClock(today)))
    }

    #[test]
    fn test_add_then_edit_flow() {
        let mut t = tracker();
        assert_eq!(t.form().title, "Add a New Fish");

        assert!(t.submit("Goldfish", "40", "2024-01-01").is_done());
        assert_eq!(t.form().values, Candidate::default());

        assert!(t.request_edit(0).is_done());
        let form = t.form();
        assert_eq!(form.title, "Edit Fish");
        assert_eq!(form.submit_label, "Update Fish");
        assert!(form.cancel_visible);
        assert_eq!(form.values, Candidate::new("Goldfish", "40", "2024-01-01"));

        assert!(t.submit("Goldfish", "55", "2024-01-02").is_done());
        assert_eq!(t.snapshot(), &[Record::new("Goldfish", "55", "2024-01-02")]);
        assert_eq!(t.form().submit_label, "Add Fish");
        assert!(!t.form().cancel_visible);
    }

    #[test]
    fn test_invalid_submit_keeps_input() {
        let mut t = tracker();
        let feedback = t.submit("X", "", "2024-01-01");

        assert_eq!(feedback.invalid_fields(), vec![Field::Name, Field::TankSize]);
        assert_eq!(
            feedback.messages(),
            vec![
                "Fish name must be at least 2 characters long.",
                "Please enter a tank size."
            ]
        );
        assert_eq!(t.form().values, Candidate::new("X", "", "2024-01-01"));
        assert!(t.snapshot().is_empty());
    }

    #[test]
    fn test_stale_index_maps_to_generic_failure() {
        let mut t = tracker();
        assert_eq!(t.request_edit(4), Feedback::Failed(GENERIC_FAILURE));
        assert_eq!(t.request_delete(0), Feedback::Failed(GENERIC_FAILURE));
        assert!(t.request_delete(0).invalid_fields().is_empty());
    }

    #[test]
    fn test_deleting_edited_record_resets_form() {
        let mut t = tracker();
        t.submit("Nemo", "50", "2024-01-01");
        t.submit("Dory", "80", "2024-01-01");
        t.request_edit(1);

        assert_eq!(t.delete_prompt(1).as_deref(), Some("Are you sure you want to delete \"Dory\"?"));
        assert!(t.request_delete(1).is_done());
        assert_eq!(t.form().title, "Add a New Fish");
        assert_eq!(t.form().values, Candidate::default());
        assert_eq!(t.delete_prompt(1), None);
    }

    #[test]
    fn test_cancel_edit_clears_form() {
        let mut t = tracker();
        t.submit("Nemo", "50", "2024-01-01");
        t.request_edit(0);
        assert!(t.request_cancel_edit().is_done());
        assert!(t.request_cancel_edit().messages().is_empty());
        assert_eq!(t.form().values, Candidate::default());
        assert!(!t.form().cancel_visible);
    }

    #[test]
    fn test_cards_and_stats() {
        let mut t = tracker();
        t.submit("Nemo", "10", "2024-03-01");
        t.submit("Dory", "20", "2024-03-02");
        t.submit("Bubbles", "30", "2024-03-03");

        let cards = t.cards();
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].tank_size, "Tank Size: 10 liters");
        assert_eq!(cards[2].last_water_change, "Last Water Change: 3/3/2024");
        assert_eq!(cards[2].index, 2);
        assert_eq!(
            t.stats(),
            Stats {
                count: 3,
                average_tank_size: 20
            }
        );
    }
}
