//! Memoized rolling beta columns.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

/// A computed rolling column, shared between the cache and its readers.
pub type Column = Arc<Vec<Option<f64>>>;

/// Rolling beta columns keyed by window length.
///
/// Several metrics (alpha, treynor) read beta at the same window, so the
/// column is computed once per window and shared.
#[derive(Debug, Default)]
pub struct BetaCache {
    columns: RwLock<HashMap<usize, Column>>,
}

impl BetaCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the column for `window`, if computed.
    pub fn get(&self, window: usize) -> Option<Column> {
        self.columns.read().get(&window).cloned()
    }

    /// Get the column for `window`, computing and storing it on first use.
    ///
    /// Concurrent first requests for the same window compute it once.
    pub fn get_or_compute<F>(&self, window: usize, compute: F) -> Column
    where
        F: FnOnce() -> Vec<Option<f64>>,
    {
        if let Some(column) = self.get(window) {
            return column;
        }

        let mut columns = self.columns.write();
        if let Some(column) = columns.get(&window) {
            return Arc::clone(column);
        }

        log::trace!("computing beta column for window {window}");
        let column = Arc::new(compute());
        columns.insert(window, Arc::clone(&column));
        column
    }

    /// Number of cached windows.
    pub fn len(&self) -> usize {
        self.columns.read().len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.columns.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_computes_once_per_window() {
        let cache = BetaCache::new();
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            vec![None, Some(1.0)]
        };

        let first = cache.get_or_compute(2, compute);
        let second = cache.get_or_compute(2, compute);

        assert_eq!(calls.get(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_distinct_windows() {
        let cache = BetaCache::new();
        let a = cache.get_or_compute(2, || vec![Some(1.0)]);
        let b = cache.get_or_compute(3, || vec![Some(2.0)]);

        assert_ne!(a, b);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(3), Some(b));
        assert!(cache.get(4).is_none());
    }
}
