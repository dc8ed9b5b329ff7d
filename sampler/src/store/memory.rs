use super::{
    MetricsStore,
    StoreError,
};
use crate::counters::DerivedMetrics;
use std::{
    collections::VecDeque,
    sync::{
        PoisonError,
        RwLock,
        RwLockReadGuard,
        RwLockWriteGuard,
    },
};

/// In-memory ring buffer. Critical sections only move records around; no
/// lock is ever held across an await.
#[derive(Debug)]
pub struct MemoryStore {
    capacity: usize,
    records: RwLock<VecDeque<DerivedMetrics>>,
}

impl MemoryStore {
    /// A capacity of zero is raised to one so the latest record is always kept.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            records: RwLock::new(VecDeque::with_capacity(capacity)),
        }
    }

    // Every critical section leaves the deque consistent, so a panic in
    // another thread does not invalidate its contents.
    fn read(&self) -> RwLockReadGuard<'_, VecDeque<DerivedMetrics>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, VecDeque<DerivedMetrics>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MetricsStore for MemoryStore {
    fn append(&self, metrics: DerivedMetrics) {
        let mut records = self.write();
        if records.len() == self.capacity {
            records.pop_front();
        }
        records.push_back(metrics);
    }

    fn fetch_last(&self) -> Result<DerivedMetrics, StoreError> {
        self.read().back().cloned().ok_or(StoreError::Empty)
    }

    fn fetch_last_n(&self, count: usize) -> Result<Vec<DerivedMetrics>, StoreError> {
        let records = self.read();
        if records.is_empty() {
            return Err(StoreError::Empty);
        }
        let skip = records.len().saturating_sub(count);
        Ok(records.iter().skip(skip).cloned().collect())
    }

    fn len(&self) -> usize {
        self.read().len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters::{
        Counter,
        CounterValues,
    };
    use chrono::{
        DateTime,
        TimeDelta,
        Utc,
    };
    use pretty_assertions::assert_eq;

    fn record(second: i64) -> DerivedMetrics {
        let start = DateTime::from_timestamp(1_700_000_000, 0).unwrap() + TimeDelta::seconds(second);
        DerivedMetrics {
            rates: CounterValues::default().with(Counter::Insert, second as f64),
            start_time: start,
            end_time: start + TimeDelta::seconds(1),
            regressions: Vec::new(),
        }
    }

    fn inserts(records: &[DerivedMetrics]) -> Vec<f64> {
        records.iter().map(|r| r.rate(Counter::Insert)).collect()
    }

    #[test]
    fn fresh_store_is_empty_for_every_read() {
        let store = MemoryStore::new(4);
        assert_eq!(store.fetch_last(), Err(StoreError::Empty));
        for count in [0, 1, 4, 100] {
            assert_eq!(store.fetch_last_n(count), Err(StoreError::Empty), "count {count}");
        }
    }

    #[test]
    fn fetch_last_returns_newest() {
        let store = MemoryStore::new(4);
        store.append(record(1));
        store.append(record(2));
        assert_eq!(store.fetch_last(), Ok(record(2)));
    }

    #[test]
    fn overflow_evicts_oldest_first() {
        let capacity = 10;
        let store = MemoryStore::new(capacity);
        for second in 0..(capacity as i64 + 5) {
            store.append(record(second));
        }

        assert_eq!(store.len(), capacity);
        let records = store.fetch_last_n(capacity).unwrap();
        assert_eq!(inserts(&records), (5..15).map(|s| s as f64).collect::<Vec<_>>());
        assert!(records.windows(2).all(|pair| pair[0].end_time < pair[1].end_time));
    }

    #[test]
    fn short_history_is_truncated_not_an_error() {
        let store = MemoryStore::new(10);
        store.append(record(1));
        store.append(record(2));

        assert_eq!(inserts(&store.fetch_last_n(50).unwrap()), vec![1.0, 2.0]);
        assert_eq!(inserts(&store.fetch_last_n(1).unwrap()), vec![2.0]);
        assert_eq!(store.fetch_last_n(0), Ok(Vec::new()));
    }

    #[test]
    fn zero_capacity_keeps_latest() {
        let store = MemoryStore::new(0);
        store.append(record(1));
        store.append(record(2));
        assert_eq!(store.capacity(), 1);
        assert_eq!(inserts(&store.fetch_last_n(5).unwrap()), vec![2.0]);
    }
}
