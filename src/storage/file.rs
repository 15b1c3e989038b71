//! JSON file persistence for the roster

use super::engine::{LoadedRoster, PersistenceAdapter, decode_records, encode_records};
use crate::config::RosterConfig;
use crate::core::{StorageError, StudentRecord};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Stores the roster as a JSON array in a single file.
///
/// Writes go to a temporary file in the same directory which is then
/// renamed over the target, so a crash never leaves a half-written roster.
#[derive(Debug, Clone)]
pub struct JsonFileAdapter {
    path: PathBuf,
    pretty: bool,
}

impl JsonFileAdapter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            pretty: false,
        }
    }

    pub fn from_config(config: &RosterConfig) -> Self {
        Self::new(config.storage_path()).pretty(config.pretty)
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, path: &Path, err: impl std::fmt::Display) -> StorageError {
        StorageError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

impl PersistenceAdapter for JsonFileAdapter {
    fn load(&self) -> Result<LoadedRoster, StorageError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no roster file yet");
                return Ok(LoadedRoster::default());
            }
            Err(err) => return Err(self.io_error(&self.path, err)),
        };

        let source = self.path.display().to_string();
        Ok(decode_records(&bytes, &source))
    }

    fn save(&self, records: &[StudentRecord]) -> Result<(), StorageError> {
        let bytes = encode_records(records, self.pretty)?;

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(|e| self.io_error(&parent, e))?;

        let mut temp = NamedTempFile::new_in(&parent).map_err(|e| self.io_error(&parent, e))?;
        temp.write_all(&bytes).map_err(|e| self.io_error(temp.path(), e))?;
        temp.flush().map_err(|e| self.io_error(temp.path(), e))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| self.io_error(temp.path(), e))?;
        temp.persist(&self.path)
            .map_err(|e| self.io_error(&self.path, e.error))?;

        debug!(path = %self.path.display(), records = records.len(), "roster written");
        Ok(())
    }
}
