// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for aprscan integration tests
//!
//! Provides mock implementations of the source traits so the calculators can
//! be exercised without subgraph, price API or RPC access.

#![allow(dead_code)]

use alloy_primitives::Address;
use aprscan::gauges::GaugePool;
use aprscan::{
    Apr, AprConfig, AprConfigBuilder, AprSources, BlockSource, EmissionSchedule, FetchError,
    GaugeRegistry, Network, PoolInfo, PoolListing, PoolSnapshot, PoolStatsCalculator,
    PoolStatsData, PoolToken, PoolType, PriceSource, RelativeWeightSource, SnapshotSource,
    UnixTimestamp, VotingGauge,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const DAY: i64 = 86_400;
pub const YEAR: i64 = 365 * DAY;

/// A valid 32-byte pool id derived from `n`.
pub fn pool_id(n: u64) -> String {
    format!("0x{n:064x}")
}

/// Midnight UTC of a date.
pub fn midnight(date: NaiveDate) -> UnixTimestamp {
    UnixTimestamp(date.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp())
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn snapshot(timestamp: i64, liquidity: f64, swap_fees: f64, symbol: &str) -> PoolSnapshot {
    PoolSnapshot {
        timestamp: UnixTimestamp(timestamp),
        liquidity,
        swap_fees,
        swap_volume: swap_fees * 1000.0,
        total_liquidity: liquidity,
        pool_symbol: symbol.to_string(),
    }
}

/// One snapshot per midnight starting at `first`, with cumulative fees
/// growing by `fees_per_day`.
pub fn daily_snapshots(
    first: NaiveDate,
    days: usize,
    liquidity: f64,
    fees_per_day: f64,
    symbol: &str,
) -> Vec<PoolSnapshot> {
    first
        .iter_days()
        .take(days)
        .enumerate()
        .map(|(i, day)| snapshot(midnight(day).0, liquidity, fees_per_day * (i + 1) as f64, symbol))
        .collect()
}

pub fn token(symbol: &str) -> PoolToken {
    PoolToken {
        address: Address::ZERO,
        symbol: symbol.to_string(),
        weight: Some(0.5),
        logo_src: None,
    }
}

pub fn pool(n: u64, network: Network) -> PoolInfo {
    PoolInfo {
        id: pool_id(n),
        network,
        symbol: format!("POOL-{n}"),
        pool_type: PoolType::Weighted,
        tokens: vec![token("BAL"), token("WETH")],
        gauge: None,
    }
}

pub fn gauge(n: u64, network: Network, killed: bool) -> VotingGauge {
    VotingGauge {
        address: Address::with_last_byte(n as u8),
        network,
        is_killed: killed,
        pool: GaugePool {
            id: pool_id(n),
            address: None,
            pool_type: Some("Weighted".to_string()),
            symbol: format!("POOL-{n}"),
            tokens: vec![token("BAL"), token("WETH")],
        },
        token_logo_uris: HashMap::new(),
    }
}

/// A computed record with the given TVL and APR split.
pub fn record(n: u64, network: Network, tvl: f64, vebal: f64, swap_fee: f64) -> PoolStatsData {
    PoolStatsData {
        round_id: 52,
        pool_id: pool_id(n),
        apr: Apr::new(vebal, swap_fee),
        bal_price_usd: 5.0,
        tvl,
        voting_share: 0.01,
        volume: 1_000.0,
        collected_fees_usd: 3.0,
        symbol: format!("POOL-{n}"),
        network,
        tokens: vec![token("BAL"), token("WETH")],
        pool_type: PoolType::Weighted,
    }
}

/// Mock SnapshotSource backed by in-memory snapshots and listings
#[derive(Default)]
pub struct MockSnapshotSource {
    snapshots: Mutex<HashMap<(Network, String), Vec<PoolSnapshot>>>,
    pools: Mutex<HashMap<Network, Vec<PoolInfo>>>,
    failing_pools: Mutex<HashSet<String>>,
    failing_listings: Mutex<HashSet<Network>>,
    listings: Mutex<Vec<(Network, PoolListing)>>,
    snapshot_calls: AtomicUsize,
}

impl MockSnapshotSource {
    pub fn add_snapshots(&self, network: Network, pool_id: &str, snapshots: Vec<PoolSnapshot>) {
        self.snapshots
            .lock()
            .unwrap()
            .entry((network, pool_id.to_string()))
            .or_default()
            .extend(snapshots);
    }

    pub fn add_pool(&self, pool: PoolInfo) {
        self.pools
            .lock()
            .unwrap()
            .entry(pool.network)
            .or_default()
            .push(pool);
    }

    /// Snapshot queries for this pool fail.
    pub fn fail_pool(&self, pool_id: &str) {
        self.failing_pools.lock().unwrap().insert(pool_id.to_string());
    }

    /// Pool listings on this network fail.
    pub fn fail_listing(&self, network: Network) {
        self.failing_listings.lock().unwrap().insert(network);
    }

    pub fn listings(&self) -> Vec<(Network, PoolListing)> {
        self.listings.lock().unwrap().clone()
    }

    pub fn snapshot_calls(&self) -> usize {
        self.snapshot_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotSource for MockSnapshotSource {
    async fn snapshots_in_range(
        &self,
        network: Network,
        pool_id: &str,
        from: UnixTimestamp,
        to: UnixTimestamp,
    ) -> Result<Vec<PoolSnapshot>, FetchError> {
        self.snapshot_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_pools.lock().unwrap().contains(pool_id) {
            return Err(FetchError::graphql(network, "indexing error"));
        }

        let mut found: Vec<PoolSnapshot> = self
            .snapshots
            .lock()
            .unwrap()
            .get(&(network, pool_id.to_string()))
            .map(|all| {
                all.iter()
                    .filter(|s| s.timestamp >= from && s.timestamp < to)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        found.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(found)
    }

    async fn pools_created_before(
        &self,
        network: Network,
        listing: &PoolListing,
    ) -> Result<Vec<PoolInfo>, FetchError> {
        self.listings.lock().unwrap().push((network, listing.clone()));
        if self.failing_listings.lock().unwrap().contains(&network) {
            return Err(FetchError::graphql(network, "subgraph not deployed at block"));
        }
        Ok(self
            .pools
            .lock()
            .unwrap()
            .get(&network)
            .cloned()
            .unwrap_or_default())
    }

    async fn pool_info(
        &self,
        network: Network,
        pool_id: &str,
    ) -> Result<Option<PoolInfo>, FetchError> {
        Ok(self
            .pools
            .lock()
            .unwrap()
            .get(&network)
            .and_then(|pools| pools.iter().find(|p| p.id == pool_id).cloned()))
    }
}

/// Mock PriceSource returning a fixed price
pub struct MockPriceSource {
    price: Mutex<Option<f64>>,
    calls: AtomicUsize,
}

impl MockPriceSource {
    pub fn new(price: f64) -> Self {
        Self {
            price: Mutex::new(Some(price)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Subsequent lookups fail with a missing price.
    pub fn fail(&self) {
        *self.price.lock().unwrap() = None;
    }

    pub fn set(&self, price: f64) {
        *self.price.lock().unwrap() = Some(price);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceSource for MockPriceSource {
    async fn price_at(
        &self,
        network: Network,
        token: Address,
        timestamp: UnixTimestamp,
    ) -> Result<f64, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let price = *self.price.lock().unwrap();
        price.ok_or_else(|| FetchError::missing_price(format!("{network}:{token}"), timestamp.0))
    }
}

/// Mock BlockSource answering every lookup with one block
#[derive(Default)]
pub struct MockBlockSource {
    failing: Mutex<HashSet<Network>>,
}

impl MockBlockSource {
    pub const BLOCK: u64 = 17_000_000;

    pub fn fail_network(&self, network: Network) {
        self.failing.lock().unwrap().insert(network);
    }
}

#[async_trait]
impl BlockSource for MockBlockSource {
    async fn block_at(&self, network: Network, _timestamp: UnixTimestamp) -> Result<u64, FetchError> {
        if self.failing.lock().unwrap().contains(&network) {
            return Err(FetchError::status("defillama", 404, "block not found"));
        }
        Ok(Self::BLOCK)
    }
}

/// Mock RelativeWeightSource with per-pool weights (0 when unset)
#[derive(Default)]
pub struct MockWeightSource {
    weights: Mutex<HashMap<String, f64>>,
    calls: AtomicUsize,
}

impl MockWeightSource {
    pub fn set(&self, pool_id: &str, weight: f64) {
        self.weights.lock().unwrap().insert(pool_id.to_string(), weight);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RelativeWeightSource for MockWeightSource {
    async fn relative_weight(
        &self,
        pool_id: &str,
        _timestamp: UnixTimestamp,
    ) -> Result<f64, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .weights
            .lock()
            .unwrap()
            .get(pool_id)
            .copied()
            .unwrap_or(0.0))
    }
}

/// Constant weekly emissions
pub struct FixedEmissions(pub f64);

impl EmissionSchedule for FixedEmissions {
    fn weekly(&self, _timestamp: UnixTimestamp) -> f64 {
        self.0
    }
}

/// All mocks wired together
pub struct Mocks {
    pub snapshots: Arc<MockSnapshotSource>,
    pub prices: Arc<MockPriceSource>,
    pub blocks: Arc<MockBlockSource>,
    pub weights: Arc<MockWeightSource>,
    pub emissions: Arc<FixedEmissions>,
}

impl Default for Mocks {
    fn default() -> Self {
        Self::new()
    }
}

impl Mocks {
    pub const BAL_PRICE: f64 = 5.0;
    pub const WEEKLY_EMISSION: f64 = 100_000.0;

    pub fn new() -> Self {
        Self {
            snapshots: Arc::new(MockSnapshotSource::default()),
            prices: Arc::new(MockPriceSource::new(Self::BAL_PRICE)),
            blocks: Arc::new(MockBlockSource::default()),
            weights: Arc::new(MockWeightSource::default()),
            emissions: Arc::new(FixedEmissions(Self::WEEKLY_EMISSION)),
        }
    }

    pub fn sources(&self) -> AprSources {
        AprSources {
            snapshots: self.snapshots.clone(),
            prices: self.prices.clone(),
            blocks: self.blocks.clone(),
            weights: self.weights.clone(),
            emissions: self.emissions.clone(),
        }
    }

    pub fn calculator(&self, registry: GaugeRegistry) -> PoolStatsCalculator {
        self.calculator_with(registry, test_config())
    }

    pub fn calculator_with(&self, registry: GaugeRegistry, config: AprConfig) -> PoolStatsCalculator {
        PoolStatsCalculator::new(self.sources(), Arc::new(registry), config)
    }
}

/// Default endpoints (never contacted through the mocks) so every network
/// takes part in batch runs.
pub fn test_config() -> AprConfig {
    AprConfigBuilder::with_defaults().max_concurrency(4).build()
}
