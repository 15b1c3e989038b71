use std::fmt;
use thiserror::Error;

/// Form field named in validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FirstName,
    LastName,
    RollNumber,
    Cgpa,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::FirstName => write!(f, "first_name"),
            Field::LastName => write!(f, "last_name"),
            Field::RollNumber => write!(f, "roll_number"),
            Field::Cgpa => write!(f, "cgpa"),
        }
    }
}

/// Which validation rule rejected a candidate record.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationReason {
    MissingRequiredField { field: Field },
    MalformedNumber { field: Field, raw: String },
    CgpaOutOfRange { value: f64 },
    DuplicateRollNumber { roll_number: i64 },
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationReason::MissingRequiredField { field } => {
                write!(f, "missing required field '{}'", field)
            }
            ValidationReason::MalformedNumber { field, raw } => {
                write!(f, "field '{}' is not a valid number: '{}'", field, raw)
            }
            ValidationReason::CgpaOutOfRange { value } => {
                write!(f, "CGPA must be between 0 and 10, got {}", value)
            }
            ValidationReason::DuplicateRollNumber { roll_number } => {
                write!(f, "a student with roll number {} already exists", roll_number)
            }
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Validation error: {reason}")]
pub struct ValidationError {
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(reason: ValidationReason) -> Self {
        Self { reason }
    }

    pub fn missing(field: Field) -> Self {
        Self::new(ValidationReason::MissingRequiredField { field })
    }
}

impl From<ValidationReason> for ValidationError {
    fn from(reason: ValidationReason) -> Self {
        Self::new(reason)
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Index {given} out of bounds (collection has {bound} records)")]
pub struct IndexError {
    pub given: usize,
    pub bound: usize,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("I/O error on '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Failed to encode roster: {0}")]
    Encode(String),

    #[error("Failed to decode roster: {0}")]
    Decode(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RosterError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Lock error: {0}")]
    Lock(String),
}

impl RosterError {
    /// The rejected validation rule, if this is a validation failure.
    pub fn validation_reason(&self) -> Option<&ValidationReason> {
        match self {
            RosterError::Validation(err) => Some(&err.reason),
            _ => None,
        }
    }
}

impl From<ValidationReason> for RosterError {
    fn from(reason: ValidationReason) -> Self {
        Self::Validation(ValidationError::new(reason))
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;

impl<T> From<std::sync::PoisonError<T>> for RosterError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::Lock(err.to_string())
    }
}
