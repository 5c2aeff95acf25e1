use crate::Result;
use crate::error::ProbeError;
use fs2::FileExt;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Minimal preference store: one string value per key.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`. Returns only once the value is durable.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Stores each key as `<dir>/<key>.json`.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(ProbeError::Io)?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let mut file = fs::File::open(&path).map_err(ProbeError::Io)?;
        // Shared lock so we never read a half-written value
        file.lock_shared().map_err(ProbeError::Io)?;

        let mut content = String::new();
        file.read_to_string(&mut content).map_err(ProbeError::Io)?;
        // Unlock on drop
        Ok(Some(content))
    }

    /// Rewrites the whole value under an exclusive lock.
    ///
    /// Truncates in place instead of renaming a temp file so that the lock
    /// stays valid on Windows as well.
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_dir()?;

        let mut file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(self.path_for(key))
            .map_err(ProbeError::Io)?;

        file.lock_exclusive().map_err(ProbeError::Io)?;

        file.set_len(0).map_err(ProbeError::Io)?;
        file.seek(SeekFrom::Start(0)).map_err(ProbeError::Io)?;
        file.write_all(value.as_bytes()).map_err(ProbeError::Io)?;
        file.sync_all().map_err(ProbeError::Io)?;

        Ok(())
    }
}

/// In-process store. Clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|e| ProbeError::Other(format!("memory store poisoned: {}", e)))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| ProbeError::Other(format!("memory store poisoned: {}", e)))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
