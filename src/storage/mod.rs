pub mod engine;
pub mod file;
pub mod memory;

pub use engine::{LoadedRoster, PersistenceAdapter};
pub use file::JsonFileAdapter;
pub use memory::InMemoryAdapter;
