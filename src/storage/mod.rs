pub mod json_backend;
pub mod memory;
pub mod snapshot;

use crate::errors::SmokeError;

pub type Result<T> = std::result::Result<T, SmokeError>;

/// Abstraction over local key-value stores holding serialized strings.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;
pub use snapshot::SnapshotStore;
