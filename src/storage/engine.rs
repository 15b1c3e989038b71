use crate::core::{StorageError, StudentRecord};
use tracing::warn;

/// What an adapter found in storage.
///
/// Distinguishes "nothing stored" from "stored but not decodable", so the
/// store never mistakes damaged content for an empty roster.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedRoster {
    pub records: Vec<StudentRecord>,
    /// Stored entries that could not be decoded and were left out.
    pub skipped: usize,
    /// The stored content as a whole could not be decoded.
    pub unreadable: bool,
}

impl LoadedRoster {
    /// True when some stored content could not be turned into records.
    pub fn is_damaged(&self) -> bool {
        self.unreadable || self.skipped > 0
    }
}

impl From<Vec<StudentRecord>> for LoadedRoster {
    fn from(records: Vec<StudentRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }
}

/// Persistence adapter trait - allows pluggable storage backends
///
/// The store only ever reads the whole roster on initialization and writes
/// the whole roster after every successful mutation.
pub trait PersistenceAdapter: Send + Sync {
    /// Load the stored roster.
    ///
    /// Nothing stored and blank content both load as an empty, undamaged
    /// roster. Undecodable content is reported through
    /// [`LoadedRoster::unreadable`] and [`LoadedRoster::skipped`]. Only
    /// genuine storage faults are errors.
    fn load(&self) -> Result<LoadedRoster, StorageError>;

    /// Replace the stored roster with `records`.
    fn save(&self, records: &[StudentRecord]) -> Result<(), StorageError>;
}

impl<A: PersistenceAdapter + ?Sized> PersistenceAdapter for Box<A> {
    fn load(&self) -> Result<LoadedRoster, StorageError> {
        (**self).load()
    }

    fn save(&self, records: &[StudentRecord]) -> Result<(), StorageError> {
        (**self).save(records)
    }
}

impl<A: PersistenceAdapter + ?Sized> PersistenceAdapter for std::sync::Arc<A> {
    fn load(&self) -> Result<LoadedRoster, StorageError> {
        (**self).load()
    }

    fn save(&self, records: &[StudentRecord]) -> Result<(), StorageError> {
        (**self).save(records)
    }
}

pub(crate) fn encode_records(records: &[StudentRecord], pretty: bool) -> Result<Vec<u8>, StorageError> {
    let encoded = if pretty {
        serde_json::to_vec_pretty(records)
    } else {
        serde_json::to_vec(records)
    };
    encoded.map_err(|e| StorageError::Encode(e.to_string()))
}

/// Decode a stored blob entry by entry.
///
/// Blank content is an empty roster. Content that is not a JSON array is
/// unreadable as a whole; inside an array, entries that do not decode are
/// skipped and the rest are kept.
pub(crate) fn decode_records(bytes: &[u8], source: &str) -> LoadedRoster {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return LoadedRoster::default();
    }

    let entries = match serde_json::from_slice::<Vec<serde_json::Value>>(bytes) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(source, error = %err, "unreadable roster content, starting empty");
            return LoadedRoster {
                unreadable: true,
                ..LoadedRoster::default()
            };
        }
    };

    let mut loaded = LoadedRoster::default();
    for (position, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<StudentRecord>(entry) {
            Ok(record) => loaded.records.push(record),
            Err(err) => {
                warn!(source, position, error = %err, "skipping unreadable roster entry");
                loaded.skipped += 1;
            }
        }
    }
    loaded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_blank_is_empty_not_damaged() {
        assert_eq!(decode_records(b"", "test"), LoadedRoster::default());
        assert_eq!(decode_records(b"  \n", "test"), LoadedRoster::default());
        assert_eq!(decode_records(b"[]", "test"), LoadedRoster::default());
    }

    #[test]
    fn test_decode_corrupt_is_unreadable() {
        for bytes in [&b"{not json"[..], b"{\"first_name\": \"A\"}", b"42"] {
            let loaded = decode_records(bytes, "test");
            assert!(loaded.records.is_empty());
            assert!(loaded.unreadable);
            assert!(loaded.is_damaged());
        }
    }

    #[test]
    fn test_decode_keeps_good_entries_next_to_bad_ones() {
        let bytes = br#"[
            {"first_name":"Bob","last_name":"Lee","roll_number":202},
            {"first_name":"Eve","last_name":"Ray","roll_number":303,"cgpa":"A+"},
            "not a record",
            {"first_name":"Cara","last_name":"Diaz","roll_number":404,"cgpa":"8.1"}
        ]"#;

        let loaded = decode_records(bytes, "test");
        let rolls: Vec<i64> = loaded.records.iter().map(|r| r.roll_number).collect();
        assert_eq!(rolls, vec![202, 404]);
        assert_eq!(loaded.records[1].cgpa, Some(8.1));
        assert_eq!(loaded.skipped, 2);
        assert!(!loaded.unreadable);
        assert!(loaded.is_damaged());
    }

    #[test]
    fn test_encode_then_decode() {
        let records = vec![StudentRecord::seed(), StudentRecord::new("Bob", "Lee", 202)];
        let bytes = encode_records(&records, true).unwrap();
        assert_eq!(decode_records(&bytes, "test"), LoadedRoster::from(records));
    }
}
