//! Bounded history of [`DerivedMetrics`].
//!
//! The sampler is the only writer. Consumers get a [`StoreReader`], which can
//! read but never append.

mod memory;

use crate::counters::DerivedMetrics;
pub use memory::MemoryStore;
use mongo_monitor_config::StorageDriver;
use std::{
    fmt,
    sync::Arc,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("no metrics recorded yet")]
    Empty,
}

pub trait MetricsStore: fmt::Debug + Send + Sync {
    /// Adds `metrics` as the newest record, evicting the oldest one when the
    /// store is at capacity. Readers see either the state before or after.
    fn append(&self, metrics: DerivedMetrics);

    /// The newest record.
    fn fetch_last(&self) -> Result<DerivedMetrics, StoreError>;

    /// Up to `count` newest records, oldest first. Only fails when nothing has
    /// been appended yet.
    fn fetch_last_n(&self, count: usize) -> Result<Vec<DerivedMetrics>, StoreError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;
}

pub type SharedStore = Arc<dyn MetricsStore>;

/// Creates the store selected by `driver`, holding at most `capacity` records.
pub fn create(driver: StorageDriver, capacity: usize) -> SharedStore {
    match driver {
        StorageDriver::Memory => Arc::new(MemoryStore::new(capacity)),
    }
}

/// Read-only handle on a store, handed to consumers.
#[derive(Debug, Clone)]
pub struct StoreReader {
    store: SharedStore,
}

impl StoreReader {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn fetch_last(&self) -> Result<DerivedMetrics, StoreError> {
        self.store.fetch_last()
    }

    pub fn fetch_last_n(&self, count: usize) -> Result<Vec<DerivedMetrics>, StoreError> {
        self.store.fetch_last_n(count)
    }
}

impl From<SharedStore> for StoreReader {
    fn from(store: SharedStore) -> Self {
        Self::new(store)
    }
}
