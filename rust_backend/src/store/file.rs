//! Flat-file distribution store.
//!
//! Each epoch is one file `<data_dir>/YYYYMMDD_<multiplier>_<resolution>.json`
//! holding a JSON array of 360 numbers. Files are created with create-new
//! semantics so an existing entry is never overwritten, even by a concurrent
//! writer.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use super::error::{StoreError, StoreResult};
use super::DistributionStore;
use crate::core::domain::{EpochKey, FrequencyDistribution};

/// Distribution store backed by a directory of JSON files.
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    /// Open a store on an existing directory.
    ///
    /// # Returns
    /// * `Err(StoreError::ConfigurationError)` if `data_dir` is missing or not a directory
    pub fn open<P: AsRef<Path>>(data_dir: P) -> StoreResult<Self> {
        let data_dir = data_dir.as_ref();
        if !data_dir.is_dir() {
            return Err(StoreError::ConfigurationError(format!(
                "Data directory {} does not exist",
                data_dir.display()
            )));
        }
        Ok(Self {
            data_dir: data_dir.to_path_buf(),
        })
    }

    /// Open a store, creating the directory (and parents) if needed.
    pub fn open_or_create<P: AsRef<Path>>(data_dir: P) -> StoreResult<Self> {
        let data_dir = data_dir.as_ref();
        if !data_dir.is_dir() {
            info!("Creating data directory {}", data_dir.display());
            fs::create_dir_all(data_dir).map_err(|e| StoreError::io(data_dir, e))?;
        }
        Self::open(data_dir)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &EpochKey) -> PathBuf {
        self.data_dir.join(key.file_name())
    }
}

/// Remove a partially written entry so the next run recomputes it.
///
/// Returns whether the file is gone. A file that cannot be removed is logged,
/// since its key would be skipped by every later run.
fn discard_partial(path: &Path) -> bool {
    warn!("Removing partially written {}", path.display());
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(e) if e.kind() == ErrorKind::NotFound => true,
        Err(e) => {
            warn!(
                "Could not remove {}: {}; delete it before the next run",
                path.display(),
                e
            );
            false
        }
    }
}

impl DistributionStore for FileStore {
    fn contains(&self, key: &EpochKey) -> StoreResult<bool> {
        let path = self.path_for(key);
        path.try_exists().map_err(|e| StoreError::io(path, e))
    }

    fn store(&self, key: &EpochKey, distribution: &FrequencyDistribution) -> StoreResult<()> {
        let path = self.path_for(key);
        let payload = serde_json::to_vec(distribution).map_err(|e| {
            StoreError::InternalError(format!("Failed to serialize {}: {}", key, e))
        })?;

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StoreError::AlreadyExists(path.display().to_string()));
            }
            Err(e) => return Err(StoreError::io(path, e)),
        };

        if let Err(e) = file.write_all(&payload).and_then(|_| file.sync_all()) {
            drop(file);
            discard_partial(&path);
            return Err(StoreError::io(path, e));
        }

        debug!("Wrote {} ({} bytes)", path.display(), payload.len());
        Ok(())
    }

    fn load(&self, key: &EpochKey) -> StoreResult<FrequencyDistribution> {
        let path = self.path_for(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(path.display().to_string()));
            }
            Err(e) => return Err(StoreError::io(path, e)),
        };

        let corrupt = |message: String| StoreError::Corrupt {
            key: key.to_string(),
            message,
        };

        let mut deserializer = serde_json::Deserializer::from_str(&content);
        let distribution: FrequencyDistribution =
            serde_path_to_error::deserialize(&mut deserializer)
                .map_err(|e| corrupt(format!("{} at {}", e.inner(), e.path())))?;
        deserializer
            .end()
            .map_err(|e| corrupt(format!("trailing data: {}", e)))?;

        Ok(distribution)
    }

    fn describe(&self) -> String {
        format!("file store at {}", self.data_dir.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn key() -> EpochKey {
        EpochKey::new(NaiveDate::from_ymd_opt(1971, 1, 1).unwrap(), 4, 400)
    }

    fn one_hot(index: usize) -> FrequencyDistribution {
        let mut buckets = vec![0.0; 360];
        buckets[index] = 1.0;
        FrequencyDistribution::from_buckets(buckets).unwrap()
    }

    #[test]
    fn test_open_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            FileStore::open(&missing),
            Err(StoreError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_open_or_create_makes_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileStore::open_or_create(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.data_dir(), nested.as_path());
    }

    #[test]
    fn test_store_and_load() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        assert!(!store.contains(&key()).unwrap());
        store.store(&key(), &one_hot(12)).unwrap();
        assert!(store.contains(&key()).unwrap());
        assert!(dir.path().join("19710101_4_400.json").is_file());
        assert_eq!(store.load(&key()).unwrap(), one_hot(12));
    }

    #[test]
    fn test_store_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.store(&key(), &one_hot(1)).unwrap();

        let result = store.store(&key(), &one_hot(2));
        assert!(matches!(result, Err(StoreError::AlreadyExists(_))));
        assert_eq!(store.load(&key()).unwrap(), one_hot(1));
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(matches!(store.load(&key()), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_load_corrupt_files() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        let path = store.path_for(&key());

        for content in ["not json", "[1.0, 2.0]", "[\"a\"]", "{}"] {
            fs::write(&path, content).unwrap();
            let result = store.load(&key());
            assert!(
                matches!(result, Err(StoreError::Corrupt { .. })),
                "content {:?} gave {:?}",
                content,
                result
            );
        }
    }

    #[test]
    fn test_discard_partial() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        let path = store.path_for(&key());

        fs::write(&path, "[0.0, 0.1").unwrap();
        assert!(discard_partial(&path));
        assert!(!store.contains(&key()).unwrap());
        assert!(discard_partial(&path));

        // A directory in place of the file cannot be removed with remove_file
        fs::create_dir(&path).unwrap();
        assert!(!discard_partial(&path));
        assert!(path.exists());
    }

    #[test]
    fn test_corrupt_message_names_element() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        let mut values = vec!["0.0".to_string(); 360];
        values[5] = "\"x\"".to_string();
        fs::write(store.path_for(&key()), format!("[{}]", values.join(","))).unwrap();

        match store.load(&key()) {
            Err(StoreError::Corrupt { message, .. }) => assert!(message.contains("[5]"), "{}", message),
            other => panic!("expected corrupt error, got {:?}", other),
        }
    }
}
