// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Per-batch memoization of upstream fetches.
//!
//! A batch computes many `(pool, window)` units that share inputs: every pool
//! in a round needs the same BAL price, and a pool's TVL for a day is needed
//! again when the same day is requested twice. [`AggregationCache`] is the
//! explicit context object that holds those memoized results. Callers create
//! one per batch (one per HTTP request in the service) and pass it to the
//! [`crate::PoolStatsCalculator`] entry points.
//!
//! Keys are semantic strings:
//!
//! | cache          | key                                        |
//! |----------------|--------------------------------------------|
//! | `bal_prices`   | `bal_price_{window}`                       |
//! | `pool_data`    | `pool_data_{pool}_{window}_{chain_id}`     |
//! | `pool_weights` | `pool_weight_{pool}_{window}_{chain_id}`   |
//! | `fee_windows`  | `pool_fee_apr_{pool}_{window}_{chain_id}`  |

use serde::{Deserialize, Serialize};
use std::fmt;

mod memo;

pub use memo::MemoCache;

use crate::apr::FeeWindowStats;
use crate::rounds::AprWindow;
use crate::types::network::Network;
use crate::types::pool::PoolLiquidity;

/// Statistics about cache performance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Lookups served without computing
    pub hits: u64,
    /// Lookups that ran the computation
    pub misses: u64,
    /// Current number of cached values
    pub entries: usize,
}

impl CacheStats {
    /// Calculates the cache hit rate as a percentage (0.0 to 100.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }

    fn merge(self, other: CacheStats) -> CacheStats {
        CacheStats {
            hits: self.hits + other.hits,
            misses: self.misses + other.misses,
            entries: self.entries + other.entries,
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits={}, misses={}, entries={}, hit_rate={:.1}%",
            self.hits,
            self.misses,
            self.entries,
            self.hit_rate()
        )
    }
}

/// The memoized inputs of one aggregation batch.
#[derive(Debug)]
pub struct AggregationCache {
    pub bal_prices: MemoCache<f64>,
    pub pool_data: MemoCache<PoolLiquidity>,
    pub pool_weights: MemoCache<f64>,
    pub fee_windows: MemoCache<FeeWindowStats>,
}

impl Default for AggregationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregationCache {
    pub fn new() -> Self {
        Self {
            bal_prices: MemoCache::new("bal_price"),
            pool_data: MemoCache::new("pool_data"),
            pool_weights: MemoCache::new("pool_weight"),
            fee_windows: MemoCache::new("pool_fee_apr"),
        }
    }

    pub fn bal_price_key(window: &AprWindow) -> String {
        format!("bal_price_{}", window.label)
    }

    pub fn pool_data_key(pool_id: &str, window: &AprWindow, network: Network) -> String {
        format!("pool_data_{pool_id}_{}_{}", window.label, network.chain_id())
    }

    pub fn pool_weight_key(pool_id: &str, window: &AprWindow, network: Network) -> String {
        format!("pool_weight_{pool_id}_{}_{}", window.label, network.chain_id())
    }

    pub fn fee_window_key(pool_id: &str, window: &AprWindow, network: Network) -> String {
        format!("pool_fee_apr_{pool_id}_{}_{}", window.label, network.chain_id())
    }

    /// Combined statistics across the four caches.
    pub async fn stats(&self) -> CacheStats {
        let mut total = self.bal_prices.stats().await;
        total = total.merge(self.pool_data.stats().await);
        total = total.merge(self.pool_weights.stats().await);
        total.merge(self.fee_windows.stats().await)
    }
}
