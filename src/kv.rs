// Key-value slots holding serialized planner snapshots

use eyre::{Context, Result, eyre};
use fs2::FileExt;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A persistent key-value provider
pub trait KvStore {
    /// Read the blob stored under `key`, or `None` if nothing is stored
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the blob stored under `key`
    fn write(&mut self, key: &str, blob: &str) -> Result<()>;
}

/// Stores each key as `{key}.json` inside a directory
#[derive(Debug, Clone)]
pub struct FileKv {
    base_path: PathBuf,
}

impl FileKv {
    /// Open (creating if needed) a file-backed slot directory
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).context("Failed to create storage directory")?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.base_path.join(format!("{}.json", key)))
    }

    fn lock_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.lock", key))
    }
}

impl KvStore for FileKv {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }

        let blob = fs::read_to_string(&path).context("Failed to read storage file")?;
        debug!(file = ?path, bytes = blob.len(), "Read snapshot");
        Ok(Some(blob))
    }

    fn write(&mut self, key: &str, blob: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp_path = self.base_path.join(format!("{}.json.tmp", key));

        // Writers serialize on a sidecar lock; readers only ever see a whole file
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path(key))
            .context("Failed to open lock file")?;
        lock.lock_exclusive().context("Failed to acquire file lock")?;

        let mut file = fs::File::create(&tmp_path).context("Failed to create temp file")?;
        file.write_all(blob.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, &path).context("Failed to move snapshot into place")?;

        debug!(file = ?path, bytes = blob.len(), "Wrote snapshot");

        // Lock is automatically released when file is dropped
        Ok(())
    }
}

/// In-process slots
#[derive(Debug, Default, Clone)]
pub struct MemoryKv {
    slots: HashMap<String, String>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a slot directly
    pub fn with(mut self, key: &str, blob: &str) -> Self {
        self.slots.insert(key.to_string(), blob.to_string());
        self
    }
}

impl KvStore for MemoryKv {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, blob: &str) -> Result<()> {
        self.slots.insert(key.to_string(), blob.to_string());
        Ok(())
    }
}

/// Validate a storage key
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(eyre!("Storage key cannot be empty"));
    }
    if key.len() > 128 {
        return Err(eyre!("Storage key too long: {} (max 128 chars)", key));
    }
    if !key.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err(eyre!("Invalid storage key: {} (must be alphanumeric with _/-)", key));
    }
    Ok(())
}
