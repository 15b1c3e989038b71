pub mod draft;
pub mod error;
pub mod record;

pub use draft::{CGPA_MAX, CGPA_MIN, StudentDraft};
pub use error::{
    Field, IndexError, Result, RosterError, StorageError, ValidationError, ValidationReason,
};
pub use record::StudentRecord;
