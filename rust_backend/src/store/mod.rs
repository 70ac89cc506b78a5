//! Stores for per-epoch frequency distributions.
//!
//! A store maps an [`EpochKey`] to the distribution computed for that epoch.
//! Entries are write-once: storing a key that already exists fails with
//! [`StoreError::AlreadyExists`] and leaves the existing entry untouched, which
//! is what makes the epoch pipeline idempotent.
//!
//! # Implementations
//!
//! - [`FileStore`]: one JSON file per epoch in a data directory
//! - [`LocalStore`]: in-memory map for tests and dry runs
//!
//! # Example
//!
//! ```
//! use lunar_elongation::core::domain::{EpochKey, FrequencyDistribution};
//! use lunar_elongation::store::{DistributionStore, LocalStore};
//! use chrono::NaiveDate;
//!
//! let store = LocalStore::new();
//! let key = EpochKey::new(NaiveDate::from_ymd_opt(1971, 1, 1).unwrap(), 4, 400);
//!
//! store.store(&key, &FrequencyDistribution::uniform()).unwrap();
//! assert!(store.contains(&key).unwrap());
//! assert!(store.store(&key, &FrequencyDistribution::uniform()).is_err());
//! ```

pub mod error;
pub mod factory;
pub mod file;
pub mod local;

pub use error::{StoreError, StoreResult};
pub use factory::{StoreFactory, StoreType};
pub use file::FileStore;
pub use local::LocalStore;

use crate::core::domain::{EpochKey, FrequencyDistribution};

/// Write-once key/value store of frequency distributions.
pub trait DistributionStore {
    /// Whether an entry exists for `key`.
    fn contains(&self, key: &EpochKey) -> StoreResult<bool>;

    /// Persist `distribution` under `key`.
    ///
    /// # Returns
    /// * `Ok(())` if the entry was created
    /// * `Err(StoreError::AlreadyExists)` if `key` is already present
    fn store(&self, key: &EpochKey, distribution: &FrequencyDistribution) -> StoreResult<()>;

    /// Load the distribution stored under `key`.
    ///
    /// # Returns
    /// * `Err(StoreError::NotFound)` if `key` is absent
    /// * `Err(StoreError::Corrupt)` if the stored entry is not a valid distribution
    fn load(&self, key: &EpochKey) -> StoreResult<FrequencyDistribution>;

    /// Short human-readable description used in log messages.
    fn describe(&self) -> String;
}

impl<S: DistributionStore + ?Sized> DistributionStore for &S {
    fn contains(&self, key: &EpochKey) -> StoreResult<bool> {
        (**self).contains(key)
    }

    fn store(&self, key: &EpochKey, distribution: &FrequencyDistribution) -> StoreResult<()> {
        (**self).store(key, distribution)
    }

    fn load(&self, key: &EpochKey) -> StoreResult<FrequencyDistribution> {
        (**self).load(key)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<S: DistributionStore + ?Sized> DistributionStore for Box<S> {
    fn contains(&self, key: &EpochKey) -> StoreResult<bool> {
        (**self).contains(key)
    }

    fn store(&self, key: &EpochKey, distribution: &FrequencyDistribution) -> StoreResult<()> {
        (**self).store(key, distribution)
    }

    fn load(&self, key: &EpochKey) -> StoreResult<FrequencyDistribution> {
        (**self).load(key)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
