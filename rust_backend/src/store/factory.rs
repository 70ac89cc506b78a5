//! Store factory.
//!
//! Builds a boxed [`DistributionStore`] from the `[storage]` section of the
//! configuration.

use std::path::Path;
use std::str::FromStr;

use log::info;

use super::error::{StoreError, StoreResult};
use super::{DistributionStore, FileStore, LocalStore};
use crate::config::StorageSettings;

/// Store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreType {
    /// One JSON file per epoch in a data directory
    File,
    /// In-memory, discarded at exit
    Local,
}

impl FromStr for StoreType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" | "files" => Ok(Self::File),
            "local" | "memory" => Ok(Self::Local),
            _ => Err(format!("Unknown store type: {}", s)),
        }
    }
}

/// Factory for creating store instances.
pub struct StoreFactory;

impl StoreFactory {
    /// Create a store from storage settings.
    ///
    /// # Returns
    /// * `Ok(Box<dyn DistributionStore>)` - Ready-to-use store
    /// * `Err(StoreError)` - Unknown store type or unusable data directory
    pub fn create(settings: &StorageSettings) -> StoreResult<Box<dyn DistributionStore>> {
        let store_type = StoreType::from_str(&settings.store_type)
            .map_err(StoreError::ConfigurationError)?;

        match store_type {
            StoreType::File => {
                let store = Self::create_file(&settings.data_dir, settings.create_data_dir)?;
                Ok(Box::new(store))
            }
            StoreType::Local => Ok(Box::new(Self::create_local())),
        }
    }

    /// Create a file store, optionally creating its directory.
    pub fn create_file(data_dir: &Path, create_missing: bool) -> StoreResult<FileStore> {
        let store = if create_missing {
            FileStore::open_or_create(data_dir)?
        } else {
            FileStore::open(data_dir)?
        };
        info!("Using {}", store.describe());
        Ok(store)
    }

    /// Create an empty in-memory store.
    pub fn create_local() -> LocalStore {
        LocalStore::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn settings(store_type: &str, data_dir: &Path, create_data_dir: bool) -> StorageSettings {
        StorageSettings {
            store_type: store_type.to_string(),
            data_dir: data_dir.to_path_buf(),
            create_data_dir,
        }
    }

    #[test]
    fn test_store_type_from_str() {
        assert_eq!(StoreType::from_str("file").unwrap(), StoreType::File);
        assert_eq!(StoreType::from_str("LOCAL").unwrap(), StoreType::Local);
        assert_eq!(StoreType::from_str("memory").unwrap(), StoreType::Local);
        assert!(StoreType::from_str("postgres").is_err());
    }

    #[test]
    fn test_create_file_store() {
        let dir = TempDir::new().unwrap();
        let store = StoreFactory::create(&settings("file", dir.path(), false)).unwrap();
        assert!(store.describe().starts_with("file store"));
    }

    #[test]
    fn test_create_file_store_missing_dir() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("cache");

        assert!(StoreFactory::create(&settings("file", &missing, false)).is_err());
        assert!(StoreFactory::create(&settings("file", &missing, true)).is_ok());
        assert!(missing.is_dir());
    }

    #[test]
    fn test_create_local_store() {
        let dir = TempDir::new().unwrap();
        let store = StoreFactory::create(&settings("local", dir.path(), false)).unwrap();
        assert!(store.describe().starts_with("in-memory"));
    }

    #[test]
    fn test_unknown_type() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            StoreFactory::create(&settings("s3", dir.path(), false)),
            Err(StoreError::ConfigurationError(_))
        ));
    }
}
