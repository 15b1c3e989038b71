//! Course tag editor
//!
//! Builds the ordered, duplicate-free `courses` list of a record that is
//! being composed. The list never holds more than [`MAX_COURSES`] ids.

use tracing::debug;

/// Upper bound on course tags per record.
pub const MAX_COURSES: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseTagEditor {
    ids: Vec<i64>,
}

impl CourseTagEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id`. Returns `false` without changing anything when the editor
    /// is full or already holds `id`.
    pub fn add(&mut self, id: i64) -> bool {
        if self.is_full() {
            debug!(course_id = id, "course tag rejected: editor full");
            return false;
        }
        if self.contains(id) {
            debug!(course_id = id, "course tag rejected: duplicate");
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Parse a raw text input and add it.
    ///
    /// Surrounding whitespace is ignored. Empty or non-integer input is
    /// rejected the same way as a duplicate.
    pub fn add_raw(&mut self, raw: &str) -> bool {
        let raw = raw.trim();
        if raw.is_empty() {
            return false;
        }
        match raw.parse::<i64>() {
            Ok(id) => self.add(id),
            Err(_) => {
                debug!(input = raw, "course tag rejected: not an integer");
                false
            }
        }
    }

    /// Remove the first occurrence of `id`; no-op if absent.
    pub fn remove(&mut self, id: i64) {
        if let Some(pos) = self.ids.iter().position(|existing| *existing == id) {
            self.ids.remove(pos);
        }
    }

    pub fn to_list(&self) -> Vec<i64> {
        self.ids.clone()
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.ids
    }

    pub fn reset(&mut self) {
        self.ids.clear();
    }

    /// Replace the contents with the first [`MAX_COURSES`] entries of `ids`.
    ///
    /// The seed is trusted: duplicates are not filtered.
    pub fn load_from(&mut self, ids: &[i64]) {
        self.ids = ids.iter().copied().take(MAX_COURSES).collect();
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.ids.len() >= MAX_COURSES
    }
}

impl From<&[i64]> for CourseTagEditor {
    fn from(ids: &[i64]) -> Self {
        let mut editor = Self::new();
        editor.load_from(ids);
        editor
    }
}
