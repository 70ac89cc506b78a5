//! In-memory distribution store.
//!
//! Suitable for unit tests and dry runs: entries live in a `HashMap` behind a
//! shared lock, so clones of a store see the same data.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::warn;

use super::error::{StoreError, StoreResult};
use super::DistributionStore;
use crate::core::domain::{EpochKey, FrequencyDistribution};

/// In-memory write-once store.
#[derive(Debug, Clone, Default)]
pub struct LocalStore {
    entries: Arc<RwLock<HashMap<EpochKey, FrequencyDistribution>>>,
}

impl LocalStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<EpochKey, FrequencyDistribution>>> {
        self.entries
            .read()
            .map_err(|e| StoreError::InternalError(format!("Lock poisoned: {}", e)))
    }

    fn write(
        &self,
    ) -> StoreResult<RwLockWriteGuard<'_, HashMap<EpochKey, FrequencyDistribution>>> {
        self.entries
            .write()
            .map_err(|e| StoreError::InternalError(format!("Lock poisoned: {}", e)))
    }

    /// Number of stored entries.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl DistributionStore for LocalStore {
    fn contains(&self, key: &EpochKey) -> StoreResult<bool> {
        Ok(self.read()?.contains_key(key))
    }

    fn store(&self, key: &EpochKey, distribution: &FrequencyDistribution) -> StoreResult<()> {
        let mut entries = self.write()?;
        if entries.contains_key(key) {
            return Err(StoreError::AlreadyExists(key.to_string()));
        }
        entries.insert(*key, distribution.clone());
        Ok(())
    }

    fn load(&self, key: &EpochKey) -> StoreResult<FrequencyDistribution> {
        self.read()?
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn describe(&self) -> String {
        match self.len() {
            Ok(count) => format!("in-memory store ({} entries)", count),
            Err(e) => {
                warn!("In-memory store unavailable: {}", e);
                "in-memory store (lock poisoned)".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::thread;

    fn key(day: u32) -> EpochKey {
        EpochKey::new(NaiveDate::from_ymd_opt(2000, 1, day).unwrap(), 1, 60)
    }

    fn poison(store: &LocalStore) {
        let shared = store.clone();
        let result = thread::spawn(move || {
            let _guard = shared.entries.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();
        assert!(result.is_err());
    }

    #[test]
    fn test_store_and_load() {
        let store = LocalStore::new();
        assert!(store.is_empty().unwrap());

        store.store(&key(1), &FrequencyDistribution::uniform()).unwrap();
        assert_eq!(store.len().unwrap(), 1);
        assert!(store.contains(&key(1)).unwrap());
        assert!(!store.contains(&key(2)).unwrap());
        assert_eq!(store.load(&key(1)).unwrap(), FrequencyDistribution::uniform());
    }

    #[test]
    fn test_refuses_overwrite() {
        let store = LocalStore::new();
        store.store(&key(1), &FrequencyDistribution::uniform()).unwrap();
        assert!(matches!(
            store.store(&key(1), &FrequencyDistribution::uniform()),
            Err(StoreError::AlreadyExists(_))
        ));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_not_found() {
        let store = LocalStore::new();
        assert!(matches!(store.load(&key(3)), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_clones_share_entries() {
        let store = LocalStore::new();
        let view = store.clone();
        store.store(&key(2), &FrequencyDistribution::uniform()).unwrap();

        assert!(view.contains(&key(2)).unwrap());
        assert_eq!(view.len().unwrap(), 1);
        assert_eq!(view.describe(), "in-memory store (1 entries)");
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let store = LocalStore::new();
        store.store(&key(1), &FrequencyDistribution::uniform()).unwrap();
        poison(&store);

        assert!(matches!(store.len(), Err(StoreError::InternalError(_))));
        assert!(matches!(store.is_empty(), Err(StoreError::InternalError(_))));
        assert!(matches!(
            store.contains(&key(1)),
            Err(StoreError::InternalError(_))
        ));
        assert_eq!(store.describe(), "in-memory store (lock poisoned)");
    }
}
