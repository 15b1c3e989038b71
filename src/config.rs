use std::path::{Path, PathBuf};

/// Roster store configuration
#[derive(Debug, Clone)]
pub struct RosterConfig {
    /// Directory holding the serialized roster
    pub data_dir: PathBuf,

    /// Key under which the roster blob is stored (file stem on disk)
    pub storage_key: String,

    /// Write the example record when storage is empty on first run
    pub seed_on_empty: bool,

    /// Pretty-print JSON on disk
    pub pretty: bool,
}

impl RosterConfig {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Set the storage key
    pub fn storage_key(mut self, key: &str) -> Self {
        self.storage_key = key.to_string();
        self
    }

    /// Enable or disable first-run seeding
    pub fn seed_on_empty(mut self, seed: bool) -> Self {
        self.seed_on_empty = seed;
        self
    }

    /// Enable or disable pretty-printed output
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Full path of the roster file
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.storage_key))
    }
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            storage_key: "students_v1".to_string(),
            seed_on_empty: true,
            pretty: false,
        }
    }
}
