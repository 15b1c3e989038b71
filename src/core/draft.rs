use super::error::{Field, ValidationError, ValidationReason};
use super::record::StudentRecord;
use crate::courses::CourseTagEditor;

/// Inclusive CGPA bounds.
pub const CGPA_MIN: f64 = 0.0;
pub const CGPA_MAX: f64 = 10.0;

/// A candidate record as it arrives from a form: every scalar field is the
/// raw, untrimmed text the user typed.
///
/// The store never trusts a draft; [`StudentDraft::validate`] trims, parses
/// and range-checks everything before a [`StudentRecord`] is produced.
#[derive(Debug, Clone, Default)]
pub struct StudentDraft {
    pub first_name: String,
    pub last_name: String,
    pub roll_number: String,
    pub cgpa: String,
    pub address: String,
    pub phone_number: String,
    pub email: String,
    pub academic_record: String,
    pub courses: CourseTagEditor,
}

impl StudentDraft {
    pub fn new(first_name: &str, last_name: &str, roll_number: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            roll_number: roll_number.to_string(),
            ..Self::default()
        }
    }

    pub fn cgpa(mut self, cgpa: &str) -> Self {
        self.cgpa = cgpa.to_string();
        self
    }

    pub fn address(mut self, address: &str) -> Self {
        self.address = address.to_string();
        self
    }

    pub fn phone_number(mut self, phone_number: &str) -> Self {
        self.phone_number = phone_number.to_string();
        self
    }

    pub fn email(mut self, email: &str) -> Self {
        self.email = email.to_string();
        self
    }

    pub fn academic_record(mut self, academic_record: &str) -> Self {
        self.academic_record = academic_record.to_string();
        self
    }

    /// Add course ids through the editor; duplicates and overflow are dropped.
    pub fn courses(mut self, ids: &[i64]) -> Self {
        for id in ids {
            self.courses.add(*id);
        }
        self
    }

    /// Fill a draft from a stored record, e.g. to edit it.
    pub fn from_record(record: &StudentRecord) -> Self {
        Self {
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            roll_number: record.roll_number.to_string(),
            cgpa: record.cgpa.map(|value| value.to_string()).unwrap_or_default(),
            address: record.address.clone().unwrap_or_default(),
            phone_number: record.phone_number.clone().unwrap_or_default(),
            email: record.email.clone().unwrap_or_default(),
            academic_record: record.academic_record.clone().unwrap_or_default(),
            courses: CourseTagEditor::from(record.courses.as_slice()),
        }
    }

    /// Check field-level rules and build the record.
    ///
    /// Rules run in order and the first failure wins: required fields, roll
    /// number syntax, CGPA syntax and range. Roll-number uniqueness depends
    /// on the collection and is checked by the store.
    pub fn validate(&self) -> Result<StudentRecord, ValidationError> {
        let first_name = self.first_name.trim();
        let last_name = self.last_name.trim();
        let roll_number = self.roll_number.trim();

        for (field, value) in [
            (Field::FirstName, first_name),
            (Field::LastName, last_name),
            (Field::RollNumber, roll_number),
        ] {
            if value.is_empty() {
                return Err(ValidationError::missing(field));
            }
        }

        let roll_number = roll_number.parse::<i64>().map_err(|_| {
            ValidationError::new(ValidationReason::MalformedNumber {
                field: Field::RollNumber,
                raw: roll_number.to_string(),
            })
        })?;

        let cgpa = parse_cgpa(&self.cgpa)?;

        Ok(StudentRecord {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            roll_number,
            cgpa,
            address: optional(&self.address),
            phone_number: optional(&self.phone_number),
            email: optional(&self.email),
            academic_record: optional(&self.academic_record),
            courses: self.courses.to_list(),
        })
    }
}

impl From<&StudentRecord> for StudentDraft {
    fn from(record: &StudentRecord) -> Self {
        Self::from_record(record)
    }
}

impl From<StudentRecord> for StudentDraft {
    fn from(record: StudentRecord) -> Self {
        Self::from_record(&record)
    }
}

fn parse_cgpa(raw: &str) -> Result<Option<f64>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let value = match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            return Err(ValidationError::new(ValidationReason::MalformedNumber {
                field: Field::Cgpa,
                raw: raw.to_string(),
            }));
        }
    };

    if !(CGPA_MIN..=CGPA_MAX).contains(&value) {
        return Err(ValidationError::new(ValidationReason::CgpaOutOfRange { value }));
    }
    Ok(Some(value))
}

fn optional(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(draft: &StudentDraft) -> ValidationReason {
        draft.validate().unwrap_err().reason
    }

    #[test]
    fn test_trims_and_builds_record() {
        let draft = StudentDraft::new("  Bob ", "Lee\t", " 202 ")
            .cgpa(" 9.5 ")
            .email(" bob@example.com ")
            .address("   ")
            .courses(&[105, 7, 105]);

        let record = draft.validate().unwrap();
        assert_eq!(record.first_name, "Bob");
        assert_eq!(record.last_name, "Lee");
        assert_eq!(record.roll_number, 202);
        assert_eq!(record.cgpa, Some(9.5));
        assert_eq!(record.email.as_deref(), Some("bob@example.com"));
        assert_eq!(record.address, None);
        assert_eq!(record.courses, vec![105, 7]);
    }

    #[test]
    fn test_required_fields_checked_first() {
        assert_eq!(
            reason(&StudentDraft::new("   ", "Lee", "1").cgpa("99")),
            ValidationReason::MissingRequiredField { field: Field::FirstName }
        );
        assert_eq!(
            reason(&StudentDraft::new("Bob", "", "1")),
            ValidationReason::MissingRequiredField { field: Field::LastName }
        );
        assert_eq!(
            reason(&StudentDraft::new("Bob", "Lee", " ")),
            ValidationReason::MissingRequiredField { field: Field::RollNumber }
        );
    }

    #[test]
    fn test_malformed_roll_number() {
        assert!(matches!(
            reason(&StudentDraft::new("Bob", "Lee", "12a")),
            ValidationReason::MalformedNumber { field: Field::RollNumber, .. }
        ));
    }

    #[test]
    fn test_cgpa_bounds_inclusive() {
        let base = StudentDraft::new("Bob", "Lee", "1");
        assert_eq!(base.clone().cgpa("0").validate().unwrap().cgpa, Some(0.0));
        assert_eq!(base.clone().cgpa("10").validate().unwrap().cgpa, Some(10.0));
        assert_eq!(base.clone().cgpa("").validate().unwrap().cgpa, None);

        assert_eq!(
            reason(&base.clone().cgpa("10.01")),
            ValidationReason::CgpaOutOfRange { value: 10.01 }
        );
        assert_eq!(
            reason(&base.clone().cgpa("-0.01")),
            ValidationReason::CgpaOutOfRange { value: -0.01 }
        );
        assert!(matches!(
            reason(&base.clone().cgpa("NaN")),
            ValidationReason::MalformedNumber { field: Field::Cgpa, .. }
        ));
    }

    #[test]
    fn test_from_record_round_trip() {
        let seed = StudentRecord::seed();
        let draft = StudentDraft::from_record(&seed);
        assert_eq!(draft.roll_number, "101");
        assert_eq!(draft.cgpa, "3.7");
        assert_eq!(draft.validate().unwrap(), seed);
    }
}
