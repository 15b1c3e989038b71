// ============================================================================
// Student Roster Library
// ============================================================================

//! In-memory student roster with validation, roll-number uniqueness,
//! filtered queries and pluggable persistence.
//!
//! # Examples
//!
//! ```
//! use student_roster::{FilterSpec, InMemoryAdapter, RosterStore, StudentDraft};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = RosterStore::new(InMemoryAdapter::new());
//! store.initialize()?; // seeds "Alice Khan" (roll 101) into empty storage
//!
//! let mut draft = StudentDraft::new("Bob", "Lee", "202").cgpa("8.4");
//! draft.courses.add_raw("105");
//! store.create(&draft)?;
//!
//! let hits = store.query(&FilterSpec::new().with_global("10"))?;
//! assert_eq!(hits.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod courses;
pub mod facade;
pub mod query;
pub mod storage;

// Re-export main types for convenience
pub use config::RosterConfig;
pub use crate::core::{
    Field, IndexError, Result, RosterError, StorageError, StudentDraft, StudentRecord,
    ValidationError, ValidationReason,
};
pub use courses::{CourseTagEditor, MAX_COURSES};
pub use facade::{InitReport, RosterStore, WriteOutcome};
pub use query::FilterSpec;
pub use storage::{InMemoryAdapter, JsonFileAdapter, LoadedRoster, PersistenceAdapter};
