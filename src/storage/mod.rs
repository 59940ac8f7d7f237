// Key-value storage port.
// The cache talks to its persistent medium only through this trait, so the same
// cache logic runs over an in-memory map or a directory of files.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

pub use crate::error::StorageError;

/// Result type for storage-medium operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// A synchronous, string-keyed, string-valued storage medium.
///
/// Implementations must be safe to share between tasks. Writes are full
/// overwrites; there is no partial update.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// Returns [`StorageError::QuotaExceeded`] when the medium is full.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn delete(&self, key: &str) -> StorageResult<()>;

    /// List every key starting with `prefix`.
    fn list_keys(&self, prefix: &str) -> StorageResult<Vec<String>>;
}
