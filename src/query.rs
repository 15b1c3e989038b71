//! Roster filtering
//!
//! A [`FilterSpec`] narrows the visible subset of the roster. Every provided
//! specific filter must match (AND); the global term matches when any of the
//! roll number, first name, last name or a course id contains it (OR).

use crate::core::StudentRecord;

/// Optional predicates applied by `RosterStore::query`.
///
/// Inputs are trimmed when set; a value that is empty after trimming counts
/// as not provided.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// Exact match on the stringified roll number.
    pub roll_exact: Option<String>,
    /// Case-insensitive substring of the first name.
    pub name_contains: Option<String>,
    /// Exact match on any stringified course id.
    pub course_exact: Option<String>,
    /// Case-insensitive substring across roll, names and course ids.
    pub global_term: Option<String>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roll(mut self, roll: &str) -> Self {
        self.roll_exact = normalize(roll);
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name_contains = normalize(name);
        self
    }

    pub fn with_course(mut self, course: &str) -> Self {
        self.course_exact = normalize(course);
        self
    }

    pub fn with_global(mut self, term: &str) -> Self {
        self.global_term = normalize(term);
        self
    }

    /// True when no filter criteria are set
    pub fn is_empty(&self) -> bool {
        self.active().is_empty()
    }

    pub fn matches(&self, record: &StudentRecord) -> bool {
        self.active().matches(record)
    }

    /// Trimmed, lowercased view of the filter, computed once per query.
    pub(crate) fn active(&self) -> ActiveFilter {
        ActiveFilter {
            roll_exact: active_value(&self.roll_exact),
            name_contains: active_value(&self.name_contains).map(|name| name.to_lowercase()),
            course_exact: active_value(&self.course_exact),
            global_term: active_value(&self.global_term).map(|term| term.to_lowercase()),
        }
    }
}

/// Filter values ready for matching.
#[derive(Debug, Clone, Default)]
pub(crate) struct ActiveFilter {
    roll_exact: Option<String>,
    name_contains: Option<String>,
    course_exact: Option<String>,
    global_term: Option<String>,
}

impl ActiveFilter {
    pub(crate) fn is_empty(&self) -> bool {
        self.roll_exact.is_none()
            && self.name_contains.is_none()
            && self.course_exact.is_none()
            && self.global_term.is_none()
    }

    pub(crate) fn matches(&self, record: &StudentRecord) -> bool {
        if let Some(roll) = &self.roll_exact {
            if record.roll_number.to_string() != *roll {
                return false;
            }
        }

        if let Some(name) = &self.name_contains {
            if !record.first_name.to_lowercase().contains(name.as_str()) {
                return false;
            }
        }

        if let Some(course) = &self.course_exact {
            if !record.courses.iter().any(|id| id.to_string() == *course) {
                return false;
            }
        }

        match &self.global_term {
            None => true,
            Some(term) => {
                let term = term.as_str();
                record.roll_number.to_string().contains(term)
                    || record.first_name.to_lowercase().contains(term)
                    || record.last_name.to_lowercase().contains(term)
                    || record.courses.iter().any(|id| id.to_string().contains(term))
            }
        }
    }
}

fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// Fields are public, so values set directly may still carry whitespace.
fn active_value(value: &Option<String>) -> Option<String> {
    value.as_deref().and_then(normalize)
}
