//! File-backed slot - one JSON file per key in a data directory.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use postquell_core::error::StorageError;
use postquell_core::ports::KeyValueSlot;

/// File slot configuration.
#[derive(Debug, Clone)]
pub struct FileSlotConfig {
    /// Directory holding `<key>.json` files. Created on first write.
    pub dir: PathBuf,
    /// Largest value accepted, in bytes.
    pub quota: Option<usize>,
}

impl Default for FileSlotConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".postquell"),
            quota: None,
        }
    }
}

/// Durable slot that survives process restarts.
///
/// Writes go to a temporary sibling file which is then renamed over the
/// target, so a crash mid-write leaves the previous value intact. A full disk
/// is reported as a quota error, same as an explicit quota.
#[derive(Debug, Clone)]
pub struct FileSlot {
    config: FileSlotConfig,
}

impl FileSlot {
    pub fn new(config: FileSlotConfig) -> Self {
        tracing::info!(dir = %config.dir.display(), quota = ?config.quota, "Using file slot");
        Self { config }
    }

    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(FileSlotConfig {
            dir: dir.into(),
            quota: None,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.config.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.config.dir.join(format!("{key}.json")))
    }
}

fn map_write_error(err: io::Error, needed: usize, quota: Option<usize>) -> StorageError {
    match err.kind() {
        ErrorKind::StorageFull => StorageError::QuotaExceeded {
            needed,
            limit: quota.unwrap_or(0),
        },
        _ => StorageError::Io(err),
    }
}

impl KeyValueSlot for FileSlot {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let needed = value.len();

        if let Some(limit) = self.config.quota {
            if needed > limit {
                return Err(StorageError::QuotaExceeded { needed, limit });
            }
        }

        fs::create_dir_all(&self.config.dir)?;
        let tmp = path.with_extension("json.tmp");
        if let Err(e) = fs::write(&tmp, value) {
            let _ = fs::remove_file(&tmp);
            return Err(map_write_error(e, needed, self.config.quota));
        }
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        tracing::debug!(path = %path.display(), bytes = needed, "Slot written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
