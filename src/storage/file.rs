// File-backed storage medium.
// Stores one file per key in a single directory. Each write goes through its own
// uniquely named temp file, so concurrent writers never observe partial values.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::Builder;

use super::{KeyValueStore, StorageError, StorageResult};

const TEMP_SUFFIX: &str = ".tmp";

/// Directory-backed key-value store.
///
/// Usage is measured like [`MemoryStore`](super::MemoryStore): file name plus
/// file contents in bytes, over stored keys only. In-flight temp files do not count.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    capacity: Option<usize>,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            capacity: None,
        })
    }

    /// Limit the total size of stored values to `capacity` bytes.
    pub fn with_capacity_bytes(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        let invalid = key.is_empty()
            || key == "."
            || key == ".."
            || key.ends_with(TEMP_SUFFIX)
            || key.contains(['/', '\\', '\0']);
        if invalid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }

    /// Bytes currently in use.
    pub fn used_bytes(&self) -> StorageResult<usize> {
        self.used_bytes_excluding(None)
    }

    /// Bytes used by every stored key except `skip`.
    fn used_bytes_excluding(&self, skip: Option<&str>) -> StorageResult<usize> {
        let mut used = 0;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if name.ends_with(TEMP_SUFFIX) || Some(name.as_str()) == skip {
                continue;
            }
            // Another writer may remove or replace the file while we scan
            let meta = match entry.metadata() {
                Ok(meta) => meta,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            if meta.is_file() {
                used += name.len() + meta.len() as usize;
            }
        }
        Ok(used)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            // Non-UTF-8 bytes are handed back lossily so the cache sees them as corrupt
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                let bytes = fs::read(&path)?;
                Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;

        if let Some(capacity) = self.capacity {
            let used = self.used_bytes_excluding(Some(key))?;
            let requested = key.len() + value.len();
            if used + requested > capacity {
                return Err(StorageError::QuotaExceeded {
                    used,
                    capacity,
                    requested,
                });
            }
        }

        // Write atomically via a temp file private to this writer
        let mut temp = Builder::new()
            .prefix(&format!(".{key}."))
            .suffix(TEMP_SUFFIX)
            .tempfile_in(&self.dir)?;
        temp.write_all(value.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&path).map_err(|e| e.error)?;

        Ok(())
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn list_keys(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if name.starts_with(prefix) && !name.ends_with(TEMP_SUFFIX) {
                keys.push(name);
            }
        }
        Ok(keys)
    }
}
