// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Single-flight memoization of async computations.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::debug;

use super::CacheStats;

/// Memoizes async results by string key.
///
/// Each key owns a [`OnceCell`]; the first caller for an uncached key runs the
/// computation and concurrent callers for the same key await that same run
/// instead of starting their own. A failed computation leaves the cell empty,
/// so the error is returned to the callers waiting on it and the next call
/// retries.
///
/// Entries are never evicted. A `MemoCache` lives as long as the
/// [`super::AggregationCache`] that owns it.
///
/// # Examples
///
/// ```rust
/// use aprscan::MemoCache;
///
/// # async fn example() -> Result<(), std::convert::Infallible> {
/// let cache: MemoCache<f64> = MemoCache::new("bal_price");
/// let price = cache
///     .get_or_compute("bal_price_52", || async { Ok::<_, std::convert::Infallible>(4.2) })
///     .await?;
/// assert_eq!(price, 4.2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MemoCache<V> {
    name: &'static str,
    cells: Mutex<HashMap<String, Arc<OnceCell<V>>>>,
    lookups: AtomicU64,
    computations: AtomicU64,
}

impl<V> MemoCache<V>
where
    V: Clone + Send + Sync,
{
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            cells: Mutex::new(HashMap::new()),
            lookups: AtomicU64::new(0),
            computations: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the cached value for `key`, computing it on a miss.
    ///
    /// `compute` runs at most once per key at a time, and never again once it
    /// has succeeded.
    pub async fn get_or_compute<F, Fut, E>(&self, key: &str, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        self.lookups.fetch_add(1, Ordering::Relaxed);

        let cell = {
            let mut cells = self.cells.lock().await;
            Arc::clone(cells.entry(key.to_string()).or_default())
        };

        if let Some(value) = cell.get() {
            debug!(cache = self.name, key, "Cache hit");
            return Ok(value.clone());
        }

        let value = cell
            .get_or_try_init(|| {
                debug!(cache = self.name, key, "Cache miss");
                self.computations.fetch_add(1, Ordering::Relaxed);
                compute()
            })
            .await?;

        Ok(value.clone())
    }

    /// The cached value for `key`, if one has been computed.
    pub async fn get(&self, key: &str) -> Option<V> {
        let cells = self.cells.lock().await;
        cells.get(key).and_then(|cell| cell.get().cloned())
    }

    pub async fn len(&self) -> usize {
        let cells = self.cells.lock().await;
        cells.values().filter(|cell| cell.initialized()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Hits are lookups that were served without running a computation,
    /// including callers that awaited another caller's in-flight run.
    pub async fn stats(&self) -> CacheStats {
        let lookups = self.lookups.load(Ordering::Relaxed);
        let misses = self.computations.load(Ordering::Relaxed);
        CacheStats {
            hits: lookups.saturating_sub(misses),
            misses,
            entries: self.len().await,
        }
    }
}
