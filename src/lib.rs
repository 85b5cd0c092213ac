// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! # aprscan
//!
//! APR aggregation for Balancer pools: veBAL emission yield and swap fee yield
//! computed over weekly voting rounds or individual UTC days, then filtered,
//! sorted, paginated and averaged for presentation.
//!
//! ## Architecture
//!
//! Each external dependency sits behind a trait so the aggregation core can be
//! exercised without network access:
//!
//! - [`SnapshotSource`]: pool snapshots and pool listings (Balancer subgraph)
//! - [`PriceSource`] / [`BlockSource`]: historical prices and block lookups (DefiLlama)
//! - [`RelativeWeightSource`]: gauge voting share (GaugeController `eth_call`)
//! - [`EmissionSchedule`]: weekly BAL emissions
//!
//! [`PoolStatsCalculator`] fans out over these sources for one pool and one
//! [`AprWindow`], memoizing each input in an explicit [`AggregationCache`].
//! The [`pipeline`] module post-processes the resulting day-keyed dataset.
//!
//! ## Example
//!
//! ```rust,ignore
//! use aprscan::{AggregationCache, AprConfig, bootstrap::build_calculator};
//!
//! let config = AprConfig::default();
//! let calculator = build_calculator(&config).await?;
//! let cache = AggregationCache::new();
//!
//! let stats = calculator
//!     .calculate_round_stats(&cache, "52", "0x5c6ee304399dbdb9c8ef030ab642b10820db8f56000200000000000000000014")
//!     .await?;
//! println!("total APR: {:.2}%", stats.apr.total);
//! ```

/// Builds a `serde_json::Map` of GraphQL variables.
#[macro_export]
macro_rules! json_map {
    ($($key:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut map = ::serde_json::Map::<String, ::serde_json::Value>::new();
        $(
            map.insert(($key).into(), ($value).into());
        )*
        map
    }}
}

pub mod api;
pub mod apr;
pub mod bootstrap;
pub mod cache;
pub mod config;
pub mod emissions;
pub mod errors;
pub mod gauges;
pub mod pipeline;
pub mod price;
pub mod query;
pub mod rounds;
pub mod stats;
pub mod subgraph;
pub mod types;

mod tracing;

pub use apr::{FeeWindowStats, SECONDS_IN_DAY, SECONDS_IN_YEAR, WEEKS_IN_YEAR};
pub use cache::{AggregationCache, CacheStats, MemoCache};
pub use config::{AprConfig, AprConfigBuilder, GaugeSource};
pub use emissions::{BalEmissions, EmissionSchedule};
pub use errors::{AprError, ConfigError, FetchError, FieldIssue, QueryError, RoundError};
pub use gauges::{GaugeControllerClient, GaugeRegistry, RelativeWeightSource, VotingGauge};
pub use pipeline::{Order, PipelineOptions, PoolStatsFilter, SortKey};
pub use price::{BlockSource, DefiLlamaClient, PriceSource};
pub use query::{AprQuery, AprRequest};
pub use rounds::{AprWindow, Round, UnixTimestamp};
pub use stats::{AprSources, DateRangeQuery, PoolStatsCalculator};
pub use subgraph::{BalancerSubgraph, PageSize, PoolListing, SnapshotSource, SubgraphClient};
pub use types::network::Network;
pub use types::pool::{PoolInfo, PoolLiquidity, PoolSnapshot, PoolToken, PoolType};
pub use types::stats::{Apr, AprBreakdown, PerDay, PoolStatsData, PoolStatsResults};
