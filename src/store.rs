/// Process-wide, read-only dataset storage.
///
/// The loader fills a `Dataset` once at startup and hands it to
/// `Store::initialize`. After that the data never changes, so any number of
/// request threads can read it at the same time without locking.
///
/// Every query goes through `Store::acquire`, which returns a `ReadHandle`.
/// The handle releases itself on drop, so early returns (validation
/// failures, empty aggregates, panics unwinding a worker) all release it.

use crate::model::{Measurement, Station};
use std::ops::Deref;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// The dataset has not been loaded (or failed to load).
    #[error("backing store unavailable: dataset has not been loaded")]
    Unavailable,

    #[error("backing store already initialized")]
    AlreadyInitialized,
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// The two immutable record collections, in storage order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    measurements: Vec<Measurement>,
    stations: Vec<Station>,
}

impl Dataset {
    pub fn new(measurements: Vec<Measurement>, stations: Vec<Station>) -> Self {
        Self {
            measurements,
            stations,
        }
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Latest measurement date present in the data, if any.
    pub fn latest_date(&self) -> Option<&str> {
        self.measurements.iter().map(|m| m.date.as_str()).max()
    }

    /// Earliest measurement date present in the data, if any.
    pub fn earliest_date(&self) -> Option<&str> {
        self.measurements.iter().map(|m| m.date.as_str()).min()
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Initialize-once holder for the dataset.
#[derive(Debug, Default)]
pub struct Store {
    dataset: OnceLock<Dataset>,
    open_handles: AtomicUsize,
}

impl Store {
    /// An empty store. `acquire` fails until `initialize` is called.
    pub const fn new() -> Self {
        Self {
            dataset: OnceLock::new(),
            open_handles: AtomicUsize::new(0),
        }
    }

    /// A store that is already initialized with `dataset`.
    pub fn with_dataset(dataset: Dataset) -> Self {
        let store = Self::new();
        // A fresh OnceLock cannot already be set.
        let _ = store.dataset.set(dataset);
        store
    }

    /// Installs the dataset. Succeeds exactly once.
    pub fn initialize(&self, dataset: Dataset) -> Result<(), StoreError> {
        self.dataset
            .set(dataset)
            .map_err(|_| StoreError::AlreadyInitialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.dataset.get().is_some()
    }

    /// Acquires a scoped read handle on the dataset.
    pub fn acquire(&self) -> Result<ReadHandle<'_>, StoreError> {
        let dataset = self.dataset.get().ok_or(StoreError::Unavailable)?;
        self.open_handles.fetch_add(1, Ordering::AcqRel);
        Ok(ReadHandle {
            dataset,
            store: self,
        })
    }

    /// Number of handles currently held.
    pub fn open_handles(&self) -> usize {
        self.open_handles.load(Ordering::Acquire)
    }
}

/// Read access to the dataset for the duration of one query.
#[derive(Debug)]
pub struct ReadHandle<'a> {
    dataset: &'a Dataset,
    store: &'a Store,
}

impl Deref for ReadHandle<'_> {
    type Target = Dataset;

    fn deref(&self) -> &Dataset {
        self.dataset
    }
}

impl Drop for ReadHandle<'_> {
    fn drop(&mut self) {
        self.store.open_handles.fetch_sub(1, Ordering::AcqRel);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::fixture_dataset;
    use std::sync::Arc;

    #[test]
    fn test_acquire_before_initialize_is_unavailable() {
        let store = Store::new();
        assert!(!store.is_initialized());
        assert_eq!(store.acquire().err(), Some(StoreError::Unavailable));
        assert_eq!(store.open_handles(), 0);
    }

    #[test]
    fn test_initialize_only_once() {
        let store = Store::new();
        assert!(store.initialize(fixture_dataset()).is_ok());
        assert_eq!(
            store.initialize(Dataset::default()),
            Err(StoreError::AlreadyInitialized)
        );
        // First dataset is kept
        let handle = store.acquire().unwrap();
        assert_eq!(handle.stations().len(), fixture_dataset().stations().len());
    }

    #[test]
    fn test_handles_released_on_drop() {
        let store = Store::with_dataset(fixture_dataset());
        {
            let _a = store.acquire().unwrap();
            let _b = store.acquire().unwrap();
            assert_eq!(store.open_handles(), 2);
        }
        assert_eq!(store.open_handles(), 0);
    }

    #[test]
    fn test_handle_released_on_early_return() {
        fn first_station_name(store: &Store, fail: bool) -> Result<String, StoreError> {
            let handle = store.acquire()?;
            if fail {
                return Err(StoreError::Unavailable);
            }
            Ok(handle.stations()[0].name.clone())
        }

        let store = Store::with_dataset(fixture_dataset());
        assert!(first_station_name(&store, true).is_err());
        assert!(first_station_name(&store, false).is_ok());
        assert_eq!(store.open_handles(), 0);
    }

    #[test]
    fn test_concurrent_readers() {
        let store = Arc::new(Store::with_dataset(fixture_dataset()));
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    let handle = store.acquire().unwrap();
                    handle.measurements().len()
                })
            })
            .collect();

        let expected = fixture_dataset().measurements().len();
        for t in threads {
            assert_eq!(t.join().unwrap(), expected);
        }
        assert_eq!(store.open_handles(), 0);
    }

    #[test]
    fn test_date_bounds() {
        let dataset = fixture_dataset();
        assert_eq!(dataset.earliest_date(), Some("2016-08-01"));
        assert_eq!(dataset.latest_date(), Some("2017-08-23"));
        assert_eq!(Dataset::default().latest_date(), None);
    }
}
