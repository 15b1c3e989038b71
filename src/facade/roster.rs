use crate::config::RosterConfig;
use crate::core::{
    IndexError, Result, StorageError, StudentDraft, StudentRecord, ValidationError,
    ValidationReason,
};
use crate::query::FilterSpec;
use crate::storage::{JsonFileAdapter, PersistenceAdapter};
use im::Vector;
use std::sync::RwLock;
use tracing::{Level, debug, event, info, info_span, warn};

/// Result of a successful create, update or delete.
///
/// The mutation is applied in memory either way; `warning` carries the
/// storage failure when the roster could not be written afterwards, in which
/// case the change is lost on restart.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOutcome {
    /// Position the mutation applied to.
    pub index: usize,
    pub warning: Option<StorageError>,
}

impl WriteOutcome {
    pub fn is_durable(&self) -> bool {
        self.warning.is_none()
    }
}

/// Result of [`RosterStore::initialize`].
#[derive(Debug, Clone, PartialEq)]
pub struct InitReport {
    /// Records found in storage.
    pub loaded: usize,
    /// Stored entries that could not be decoded and were left out.
    pub skipped: usize,
    /// The stored content could not be decoded at all.
    pub unreadable: bool,
    /// Whether the example record was written into an empty roster.
    pub seeded: bool,
    pub warning: Option<StorageError>,
}

/// Owns the student collection, enforces its rules and answers queries.
///
/// Mutations hold the write lock from validation through persistence, so
/// they are serialized and storage always receives them in memory order.
/// Reads take a cheap clone of the persistent vector and never observe a
/// half-applied write.
pub struct RosterStore<A: PersistenceAdapter = Box<dyn PersistenceAdapter>> {
    records: RwLock<Vector<StudentRecord>>,
    adapter: A,
    seed_on_empty: bool,
}

impl RosterStore<JsonFileAdapter> {
    /// Open the file-backed roster described by `config` and initialize it.
    pub fn open(config: &RosterConfig) -> Result<Self> {
        let store = Self::new(JsonFileAdapter::from_config(config)).seed_on_empty(config.seed_on_empty);
        let report = store.initialize()?;
        info!(
            path = %config.storage_path().display(),
            loaded = report.loaded,
            skipped = report.skipped,
            seeded = report.seeded,
            "roster opened"
        );
        Ok(store)
    }
}

impl<A: PersistenceAdapter> RosterStore<A> {
    /// Create an empty, uninitialized store over `adapter`.
    pub fn new(adapter: A) -> Self {
        Self {
            records: RwLock::new(Vector::new()),
            adapter,
            seed_on_empty: true,
        }
    }

    pub fn seed_on_empty(mut self, seed: bool) -> Self {
        self.seed_on_empty = seed;
        self
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Load the roster from storage, replacing anything held in memory.
    ///
    /// When storage holds nothing, or only blank content, the example record
    /// is written once. Calling this again after seeding finds the seed in
    /// storage and does not seed a second time.
    ///
    /// Damaged content is never seeded over: whatever decoded is loaded and
    /// storage is left untouched until the next successful mutation.
    pub fn initialize(&self) -> Result<InitReport> {
        let _span = info_span!("roster_init").entered();
        let mut records = self.records.write()?;

        let stored = self.adapter.load()?;
        let damaged = stored.is_damaged();
        let mut report = InitReport {
            loaded: stored.records.len(),
            skipped: stored.skipped,
            unreadable: stored.unreadable,
            seeded: false,
            warning: None,
        };
        *records = stored.records.into_iter().collect();

        if damaged {
            warn!(
                loaded = report.loaded,
                skipped = report.skipped,
                unreadable = report.unreadable,
                "stored roster is damaged, leaving it untouched until the next change"
            );
            return Ok(report);
        }
        if report.loaded > 0 || !self.seed_on_empty {
            debug!(loaded = report.loaded, "roster loaded");
            return Ok(report);
        }

        records.push_back(StudentRecord::seed());
        report.warning = self.persist(&records);
        report.seeded = true;
        info!(roll_number = 101, "seeded empty roster with example record");

        Ok(report)
    }

    /// Validate `draft` and append it to the end of the roster.
    pub fn create(&self, draft: &StudentDraft) -> Result<WriteOutcome> {
        let _span = info_span!("roster_write", op = "create").entered();
        let record = draft.validate().inspect_err(log_rejection)?;

        let mut records = self.records.write()?;
        ensure_unique_roll(&records, record.roll_number, None).inspect_err(log_rejection)?;

        let index = records.len();
        let roll_number = record.roll_number;
        records.push_back(record);
        let warning = self.persist(&records);

        info!(index, roll_number, "student created");
        Ok(WriteOutcome { index, warning })
    }

    /// Replace the record at `index` with `draft`.
    ///
    /// The record being replaced is excluded from the roll-number uniqueness
    /// check, so keeping its own roll number is allowed.
    pub fn update(&self, index: usize, draft: &StudentDraft) -> Result<WriteOutcome> {
        let _span = info_span!("roster_write", op = "update", index).entered();
        let mut records = self.records.write()?;
        check_bounds(index, records.len())?;

        let record = draft.validate().inspect_err(log_rejection)?;
        ensure_unique_roll(&records, record.roll_number, Some(index)).inspect_err(log_rejection)?;

        let roll_number = record.roll_number;
        records.set(index, record);
        let warning = self.persist(&records);

        info!(index, roll_number, "student updated");
        Ok(WriteOutcome { index, warning })
    }

    /// Form submit: create when nothing is being edited, update otherwise.
    pub fn save(&self, editing: Option<usize>, draft: &StudentDraft) -> Result<WriteOutcome> {
        match editing {
            None => self.create(draft),
            Some(index) => self.update(index, draft),
        }
    }

    /// Remove the record at `index`; later records shift down by one.
    pub fn delete(&self, index: usize) -> Result<WriteOutcome> {
        let _span = info_span!("roster_write", op = "delete", index).entered();
        let mut records = self.records.write()?;
        check_bounds(index, records.len())?;

        let removed = records.remove(index);
        let warning = self.persist(&records);

        info!(index, roll_number = removed.roll_number, "student deleted");
        Ok(WriteOutcome { index, warning })
    }

    /// Records matching `filters`, paired with their current index.
    pub fn query(&self, filters: &FilterSpec) -> Result<Vec<(usize, StudentRecord)>> {
        let snapshot = self.records()?;
        let filter = filters.active();

        let matches: Vec<(usize, StudentRecord)> = snapshot
            .iter()
            .enumerate()
            .filter(|(_, record)| filter.matches(record))
            .map(|(index, record)| (index, record.clone()))
            .collect();

        debug!(total = snapshot.len(), matched = matches.len(), "roster query");
        Ok(matches)
    }

    /// Total number of records, ignoring any filter.
    pub fn count(&self) -> Result<usize> {
        Ok(self.records.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.count()? == 0)
    }

    /// The record at `index`, e.g. to load it into an edit form.
    pub fn get(&self, index: usize) -> Result<Option<StudentRecord>> {
        Ok(self.records.read()?.get(index).cloned())
    }

    /// Consistent snapshot of the whole roster.
    pub fn records(&self) -> Result<Vector<StudentRecord>> {
        Ok(self.records.read()?.clone())
    }

    fn persist(&self, records: &Vector<StudentRecord>) -> Option<StorageError> {
        let snapshot: Vec<StudentRecord> = records.iter().cloned().collect();
        match self.adapter.save(&snapshot) {
            Ok(()) => None,
            Err(err) => {
                event!(
                    Level::WARN,
                    error = %err,
                    records = snapshot.len(),
                    "roster change kept in memory but not persisted"
                );
                Some(err)
            }
        }
    }
}

fn check_bounds(index: usize, len: usize) -> std::result::Result<(), IndexError> {
    if index >= len {
        return Err(IndexError {
            given: index,
            bound: len,
        });
    }
    Ok(())
}

fn ensure_unique_roll(
    records: &Vector<StudentRecord>,
    roll_number: i64,
    ignore: Option<usize>,
) -> std::result::Result<(), ValidationError> {
    let duplicate = records
        .iter()
        .enumerate()
        .any(|(index, record)| Some(index) != ignore && record.roll_number == roll_number);

    if duplicate {
        return Err(ValidationError::new(ValidationReason::DuplicateRollNumber {
            roll_number,
        }));
    }
    Ok(())
}

fn log_rejection(err: &ValidationError) {
    warn!(reason = %err.reason, "student rejected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RosterError;
    use crate::storage::InMemoryAdapter;

    fn store() -> RosterStore<InMemoryAdapter> {
        RosterStore::new(InMemoryAdapter::new()).seed_on_empty(false)
    }

    #[test]
    fn test_create_appends_and_persists() {
        let store = store();
        let outcome = store.create(&StudentDraft::new("Bob", "Lee", "202")).unwrap();
        assert_eq!(outcome.index, 0);
        assert!(outcome.is_durable());
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.adapter().load().unwrap().records.len(), 1);
    }

    #[test]
    fn test_unreadable_storage_is_not_seeded_over() {
        let adapter = InMemoryAdapter::with_blob("[{\"first_name\"");
        let store = RosterStore::new(adapter.clone());

        let report = store.initialize().unwrap();
        assert!(report.unreadable);
        assert!(!report.seeded);
        assert!(store.is_empty().unwrap());
        assert_eq!(adapter.blob().unwrap(), b"[{\"first_name\"".to_vec());

        // The first real change replaces the damaged content
        store.create(&StudentDraft::new("Bob", "Lee", "202")).unwrap();
        assert_eq!(adapter.load().unwrap().records.len(), 1);
    }

    #[test]
    fn test_update_checks_bounds_first() {
        let store = store();
        let err = store.update(0, &StudentDraft::default()).unwrap_err();
        assert_eq!(err, RosterError::from(IndexError { given: 0, bound: 0 }));
    }

    #[test]
    fn test_unique_roll_ignores_edited_record() {
        let mut records = Vector::new();
        records.push_back(StudentRecord::new("A", "B", 1));
        records.push_back(StudentRecord::new("C", "D", 2));

        assert!(ensure_unique_roll(&records, 1, Some(0)).is_ok());
        assert!(ensure_unique_roll(&records, 1, Some(1)).is_err());
        assert!(ensure_unique_roll(&records, 3, None).is_ok());
    }

    #[test]
    fn test_save_dispatches_on_editing_index() {
        let store = store();
        store.save(None, &StudentDraft::new("Bob", "Lee", "202")).unwrap();
        let outcome = store
            .save(Some(0), &StudentDraft::new("Robert", "Lee", "202"))
            .unwrap();
        assert_eq!(outcome.index, 0);
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.get(0).unwrap().unwrap().first_name, "Robert");
    }
}
