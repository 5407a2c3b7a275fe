//! The view controller: owner of the record collection.
//!
//! All mutations go through [`ViewController`], which applies them in memory
//! and then writes the whole collection back to its [`RecordStore`] before
//! returning. Interaction that needs the user (confirming a duplicate entry)
//! is supplied by the caller through [`Confirm`].

use tracing::{debug, info};

use crate::csv;
use crate::error::{Error, Result};
use crate::record::Record;
use crate::storage::{KeyValueStore, RecordStore};

/// Message used when a question or answer is blank.
const REQUIRED_FIELDS: &str = "Both question and answer are required.";

/// The panel the user is working in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    /// Entering new records.
    #[default]
    Enter,
    /// Editing, deleting and importing records.
    Edit,
    /// Searching and exporting records.
    Retrieve,
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enter => write!(f, "enter"),
            Self::Edit => write!(f, "edit"),
            Self::Retrieve => write!(f, "retrieve"),
        }
    }
}

/// Asks the user a yes/no question.
pub trait Confirm {
    /// Return `true` to proceed.
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Result of entering a new record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// The record was added.
    Added(Record),
    /// The user declined to add a duplicate question.
    Declined,
}

/// Counts reported after a CSV import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    /// Records appended.
    pub added: usize,
    /// Existing records replaced.
    pub updated: usize,
}

impl std::fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Bulk upload complete: {} added, {} updated.",
            self.added, self.updated
        )
    }
}

/// Holds the record collection and the active view.
#[derive(Debug)]
pub struct ViewController<S> {
    records: Vec<Record>,
    view: View,
    store: RecordStore<S>,
    confirm_duplicates: bool,
}

impl<S: KeyValueStore> ViewController<S> {
    /// Load the collection from `store`.
    pub fn open(store: RecordStore<S>) -> Self {
        let records = store.load();
        info!(count = records.len(), "Opened record collection");
        Self {
            records,
            view: View::default(),
            store,
            confirm_duplicates: true,
        }
    }

    /// Turn the duplicate-question prompt on or off.
    #[must_use]
    pub fn with_duplicate_check(mut self, enabled: bool) -> Self {
        self.confirm_duplicates = enabled;
        self
    }

    /// The current collection, in insertion order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// The record store backing this controller.
    #[must_use]
    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    /// The active view.
    #[must_use]
    pub fn view(&self) -> View {
        self.view
    }

    /// Switch to another view.
    pub fn set_view(&mut self, view: View) {
        if self.view != view {
            debug!(from = %self.view, to = %view, "Switching view");
            self.view = view;
        }
    }

    /// Find a record by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Append a record.
    pub fn add(&mut self, record: Record) {
        debug!(id = %record.id, "Adding record");
        self.records.push(record);
        self.persist();
    }

    /// Replace every record whose id matches `record.id`.
    ///
    /// Returns `false` if no record had that id.
    pub fn update(&mut self, record: &Record) -> bool {
        let mut found = false;
        for existing in self.records.iter_mut().filter(|r| r.id == record.id) {
            existing.clone_from(record);
            found = true;
        }
        self.persist();
        found
    }

    /// Remove every record with the given id.
    ///
    /// Returns `false` if no record had that id.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.persist();
        self.records.len() != before
    }

    /// Replace the whole collection.
    pub fn bulk_replace(&mut self, records: Vec<Record>) {
        debug!(count = records.len(), "Replacing record collection");
        self.records = records;
        self.persist();
    }

    /// Add a record from user input.
    ///
    /// Both fields are trimmed. If the question already exists, `confirm`
    /// decides whether to add it anyway.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if either field is blank.
    pub fn enter(
        &mut self,
        question: &str,
        answer: &str,
        confirm: &mut impl Confirm,
    ) -> Result<EntryOutcome> {
        let (question, answer) = required_fields(question, answer)?;

        if self.confirm_duplicates && self.records.iter().any(|r| r.same_question(question)) {
            let prompt =
                format!("A record with the question \"{question}\" already exists. Add it anyway?");
            if !confirm.confirm(&prompt) {
                info!("Duplicate entry declined");
                return Ok(EntryOutcome::Declined);
            }
        }

        let record = Record::new(question, answer);
        self.add(record.clone());
        info!(id = %record.id, "Record saved");
        Ok(EntryOutcome::Added(record))
    }

    /// Replace the question and answer of an existing record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if either field is blank, or
    /// [`Error::RecordNotFound`] if no record has the id.
    pub fn edit(&mut self, id: &str, question: &str, answer: &str) -> Result<Record> {
        let (question, answer) = required_fields(question, answer)?;
        if self.get(id).is_none() {
            return Err(Error::record_not_found(id));
        }

        let record = Record::with_id(id, question, answer);
        self.update(&record);
        info!(%id, "Record updated");
        Ok(record)
    }

    /// Delete a record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`] if no record has the id.
    pub fn remove(&mut self, id: &str) -> Result<()> {
        if self.get(id).is_none() {
            return Err(Error::record_not_found(id));
        }
        self.delete(id);
        info!(%id, "Record deleted");
        Ok(())
    }

    /// Records whose question contains `term`, ignoring case.
    ///
    /// A blank term matches everything.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&Record> {
        if term.trim().is_empty() {
            return self.records.iter().collect();
        }
        self.records.iter().filter(|r| r.matches(term)).collect()
    }

    /// Merge CSV text into the collection.
    ///
    /// Returns `None` if the text had nothing to import.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingColumns`] if the CSV has no usable question
    /// and answer columns. The collection is left untouched.
    pub fn import_csv(&mut self, text: &str) -> Result<Option<ImportSummary>> {
        let Some(outcome) = csv::parse(text, &self.records)? else {
            info!("CSV import contained no rows");
            return Ok(None);
        };

        let summary = ImportSummary {
            added: outcome.added,
            updated: outcome.updated,
        };
        self.bulk_replace(outcome.records);
        info!(added = summary.added, updated = summary.updated, "CSV import applied");
        Ok(Some(summary))
    }

    /// Render the collection as CSV, or `None` if it is empty.
    #[must_use]
    pub fn export_csv(&self) -> Option<String> {
        if self.records.is_empty() {
            return None;
        }
        Some(csv::generate(&self.records))
    }

    fn persist(&mut self) {
        self.store.save(&self.records);
    }
}

fn required_fields<'a>(question: &'a str, answer: &'a str) -> Result<(&'a str, &'a str)> {
    let question = question.trim();
    let answer = answer.trim();
    if question.is_empty() || answer.is_empty() {
        return Err(Error::validation(REQUIRED_FIELDS));
    }
    Ok((question, answer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn controller() -> ViewController<MemoryStore> {
        ViewController::open(RecordStore::new(MemoryStore::new()))
    }

    fn seeded(records: Vec<Record>) -> ViewController<MemoryStore> {
        let mut store = RecordStore::new(MemoryStore::new());
        store.save(&records);
        ViewController::open(store)
    }

    fn always(answer: bool) -> impl FnMut(&str) -> bool {
        move |_| answer
    }

    #[test]
    fn test_default_view() {
        let mut c = controller();
        assert_eq!(c.view(), View::Enter);
        c.set_view(View::Retrieve);
        assert_eq!(c.view(), View::Retrieve);
    }

    #[test]
    fn test_view_display() {
        assert_eq!(View::Enter.to_string(), "enter");
        assert_eq!(View::Edit.to_string(), "edit");
        assert_eq!(View::Retrieve.to_string(), "retrieve");
    }

    #[test]
    fn test_open_loads_stored_records() {
        let c = seeded(vec![Record::with_id("1", "Q", "A")]);
        assert_eq!(c.records().len(), 1);
    }

    #[test]
    fn test_enter_trims_and_persists() {
        let mut c = controller();
        let outcome = c.enter("  What?  ", " That. ", &mut always(true)).unwrap();

        let EntryOutcome::Added(record) = outcome else {
            panic!("expected record to be added");
        };
        assert_eq!(record.question, "What?");
        assert_eq!(record.answer, "That.");
        assert_eq!(c.store().load(), vec![record]);
    }

    #[test]
    fn test_enter_blank_is_rejected() {
        let mut c = controller();
        let err = c.enter("   ", "A", &mut always(true)).unwrap_err();
        assert!(err.is_validation_error());
        assert_eq!(err.to_string(), REQUIRED_FIELDS);
        assert!(c.records().is_empty());
    }

    #[test]
    fn test_enter_duplicate_declined() {
        let mut c = seeded(vec![Record::with_id("1", "What is KP?", "A")]);
        let mut prompts = Vec::new();
        let mut decline = |prompt: &str| {
            prompts.push(prompt.to_string());
            false
        };

        let outcome = c.enter("what is kp?", "B", &mut decline).unwrap();
        assert_eq!(outcome, EntryOutcome::Declined);
        assert_eq!(c.records().len(), 1);
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("what is kp?"));
    }

    #[test]
    fn test_enter_duplicate_confirmed() {
        let mut c = seeded(vec![Record::with_id("1", "What is KP?", "A")]);
        let outcome = c.enter("What is KP?", "B", &mut always(true)).unwrap();
        assert!(matches!(outcome, EntryOutcome::Added(_)));
        assert_eq!(c.records().len(), 2);
    }

    #[test]
    fn test_enter_duplicate_check_disabled() {
        let mut c = seeded(vec![Record::with_id("1", "Q", "A")]).with_duplicate_check(false);
        let mut never_asked = |_: &str| -> bool { panic!("should not prompt") };
        let outcome = c.enter("Q", "B", &mut never_asked).unwrap();
        assert!(matches!(outcome, EntryOutcome::Added(_)));
    }

    #[test]
    fn test_edit_preserves_id_and_position() {
        let mut c = seeded(vec![
            Record::with_id("1", "Q1", "A1"),
            Record::with_id("2", "Q2", "A2"),
        ]);
        let record = c.edit("1", " New Q ", "New A").unwrap();

        assert_eq!(record, Record::with_id("1", "New Q", "New A"));
        assert_eq!(c.records()[0], record);
        assert_eq!(c.store().load()[0], record);
    }

    #[test]
    fn test_edit_unknown_id() {
        let mut c = controller();
        let err = c.edit("nope", "Q", "A").unwrap_err();
        assert!(matches!(err, Error::RecordNotFound { .. }));
    }

    #[test]
    fn test_edit_blank_field() {
        let mut c = seeded(vec![Record::with_id("1", "Q1", "A1")]);
        assert!(c.edit("1", "Q", "").unwrap_err().is_validation_error());
        assert_eq!(c.records()[0].answer, "A1");
    }

    #[test]
    fn test_remove() {
        let mut c = seeded(vec![
            Record::with_id("1", "Q1", "A1"),
            Record::with_id("2", "Q2", "A2"),
        ]);
        c.remove("1").unwrap();
        assert_eq!(c.records(), &[Record::with_id("2", "Q2", "A2")]);
        assert_eq!(c.store().load().len(), 1);
        assert!(c.remove("1").is_err());
    }

    #[test]
    fn test_update_and_delete_report_missing() {
        let mut c = controller();
        assert!(!c.update(&Record::with_id("x", "Q", "A")));
        assert!(!c.delete("x"));
    }

    #[test]
    fn test_search() {
        let c = seeded(vec![
            Record::with_id("1", "Saturn in 7th house", "Delay"),
            Record::with_id("2", "Mars in 1st house", "Energy"),
            Record::with_id("3", "Moon sign", "Mind"),
        ]);
        assert_eq!(c.search("").len(), 3);
        assert_eq!(c.search("   ").len(), 3);
        assert_eq!(c.search("HOUSE").len(), 2);
        assert_eq!(c.search("energy").len(), 0);
        assert_eq!(c.search("moon")[0].id, "3");
    }

    #[test]
    fn test_import_csv_merges_and_persists() {
        let mut c = seeded(vec![Record::with_id("1", "Q1", "A1")]);
        let summary = c
            .import_csv("ID,Question,Answer\r\n\"1\",\"Q1b\",\"A1b\"\r\n\"2\",\"Q2\",\"A2\"")
            .unwrap()
            .unwrap();

        assert_eq!(summary, ImportSummary { added: 1, updated: 1 });
        assert_eq!(summary.to_string(), "Bulk upload complete: 1 added, 1 updated.");
        assert_eq!(c.get("1").unwrap().question, "Q1b");
        assert_eq!(c.store().load(), c.records());
    }

    #[test]
    fn test_import_csv_failure_leaves_state() {
        let mut c = seeded(vec![Record::with_id("1", "Q1", "A1")]);
        let err = c.import_csv("Question,Notes\nx,y").unwrap_err();
        assert!(err.is_missing_columns());
        assert_eq!(c.records(), &[Record::with_id("1", "Q1", "A1")]);
    }

    #[test]
    fn test_import_csv_empty_is_noop() {
        let mut c = seeded(vec![Record::with_id("1", "Q1", "A1")]);
        assert_eq!(c.import_csv("\n\n").unwrap(), None);
        assert_eq!(c.records().len(), 1);
    }

    #[test]
    fn test_export_csv() {
        let mut c = controller();
        assert_eq!(c.export_csv(), None);

        c.add(Record::with_id("1", "Q", "A"));
        assert_eq!(
            c.export_csv().as_deref(),
            Some("ID,Question,Answer\r\n\"1\",\"Q\",\"A\"")
        );
    }

    #[test]
    fn test_persistence_failure_keeps_memory_state() {
        crate::logging::init_test_logging();
        let mut c = ViewController::open(RecordStore::new(MemoryStore::read_only()));
        c.enter("Q", "A", &mut always(true)).unwrap();
        assert_eq!(c.records().len(), 1);
        assert!(c.store().load().is_empty());
    }
}
