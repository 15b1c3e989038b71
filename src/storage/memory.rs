use super::engine::{LoadedRoster, PersistenceAdapter, decode_records, encode_records};
use crate::core::{StorageError, StudentRecord};
use std::sync::{Arc, RwLock};

/// Keeps the serialized roster blob in memory.
///
/// Clones share the same blob, so a second store opened on a clone sees
/// what the first one persisted.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAdapter {
    blob: Arc<RwLock<Option<Vec<u8>>>>,
}

impl InMemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already-serialized blob.
    pub fn with_blob(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            blob: Arc::new(RwLock::new(Some(bytes.into()))),
        }
    }

    /// Current serialized content, if anything was stored.
    pub fn blob(&self) -> Option<Vec<u8>> {
        self.blob.read().ok().and_then(|blob| blob.clone())
    }
}

impl PersistenceAdapter for InMemoryAdapter {
    fn load(&self) -> Result<LoadedRoster, StorageError> {
        let blob = self
            .blob
            .read()
            .map_err(|_| StorageError::Unavailable("lock poisoned".into()))?;

        Ok(blob
            .as_deref()
            .map(|bytes| decode_records(bytes, "memory"))
            .unwrap_or_default())
    }

    fn save(&self, records: &[StudentRecord]) -> Result<(), StorageError> {
        let bytes = encode_records(records, false)?;
        let mut blob = self
            .blob
            .write()
            .map_err(|_| StorageError::Unavailable("lock poisoned".into()))?;
        *blob = Some(bytes);
        Ok(())
    }
}
