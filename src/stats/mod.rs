// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Pool stats orchestration.
//!
//! [`PoolStatsCalculator::calculate_pool_stats`] is the unit of work: one pool
//! over one [`AprWindow`]. Its four inputs (BAL price, average TVL, voting
//! share, fee window) are fetched concurrently through the
//! [`AggregationCache`] and joined all-or-nothing. The batch entry points in
//! this module repeat the unit over pools and days, omitting failed units.

use std::sync::Arc;
use tracing::{debug, warn, Instrument};

use crate::apr::{calculate_vebal_apr, FeeWindowStats};
use crate::cache::AggregationCache;
use crate::config::constants::contracts::BAL;
use crate::config::AprConfig;
use crate::emissions::EmissionSchedule;
use crate::errors::{AprError, FetchError};
use crate::gauges::{GaugeRegistry, RelativeWeightSource};
use crate::pipeline::run_pipeline;
use crate::price::{BlockSource, PriceSource};
use crate::query::{AprQuery, AprRequest};
use crate::rounds::{AprWindow, Round, UnixTimestamp};
use crate::subgraph::SnapshotSource;
use crate::tracing::spans;
use crate::types::network::Network;
use crate::types::pool::{PoolInfo, PoolLiquidity};
use crate::types::stats::{Apr, PerDay, PoolStatsData, PoolStatsResults};

mod batch;

pub use batch::DateRangeQuery;

/// The external inputs of the calculators.
#[derive(Clone)]
pub struct AprSources {
    pub snapshots: Arc<dyn SnapshotSource>,
    pub prices: Arc<dyn PriceSource>,
    pub blocks: Arc<dyn BlockSource>,
    pub weights: Arc<dyn RelativeWeightSource>,
    pub emissions: Arc<dyn EmissionSchedule>,
}

/// Computes [`PoolStatsData`] records from [`AprSources`].
pub struct PoolStatsCalculator {
    sources: AprSources,
    registry: Arc<GaugeRegistry>,
    config: AprConfig,
}

impl PoolStatsCalculator {
    pub fn new(sources: AprSources, registry: Arc<GaugeRegistry>, config: AprConfig) -> Self {
        Self {
            sources,
            registry,
            config,
        }
    }

    pub fn config(&self) -> &AprConfig {
        &self.config
    }

    pub fn registry(&self) -> &GaugeRegistry {
        &self.registry
    }

    /// Stats of one pool over one window.
    ///
    /// Fails if any of the four inputs cannot be fetched. A veBAL APR that
    /// cannot be computed is reported as the `-1` sentinel, not as an error.
    pub async fn calculate_pool_stats(
        &self,
        cache: &AggregationCache,
        pool: &PoolInfo,
        window: &AprWindow,
    ) -> Result<PoolStatsData, FetchError> {
        let span = spans::calculate_pool_stats(&pool.id, pool.network, &window.label);

        async move {
            let network = pool.network;
            let price_at = window.end.min(UnixTimestamp::now());
            let fee_window_end = window.end.add_seconds(self.config.snapshot_cadence_secs());

            let price_key = AggregationCache::bal_price_key(window);
            let pool_data_key = AggregationCache::pool_data_key(&pool.id, window, network);
            let weight_key = AggregationCache::pool_weight_key(&pool.id, window, network);
            let fee_key = AggregationCache::fee_window_key(&pool.id, window, network);

            let bal_price = cache.bal_prices.get_or_compute(&price_key, || {
                self.sources.prices.price_at(Network::Ethereum, BAL, price_at)
            });

            let liquidity = cache.pool_data.get_or_compute(
                &pool_data_key,
                || async {
                    let snapshots = self
                        .sources
                        .snapshots
                        .snapshots_in_range(network, &pool.id, window.start, window.end)
                        .await?;
                    Ok::<_, FetchError>(PoolLiquidity::from_snapshots(&snapshots))
                },
            );

            let voting_share = cache
                .pool_weights
                .get_or_compute(&weight_key, || {
                    self.sources.weights.relative_weight(&pool.id, window.end)
                });

            // `to` is exclusive, so one extra cadence reaches the snapshot
            // taken at the window end.
            let fee_window = cache.fee_windows.get_or_compute(
                &fee_key,
                || async {
                    let snapshots = self
                        .sources
                        .snapshots
                        .snapshots_in_range(network, &pool.id, window.start, fee_window_end)
                        .await?;
                    Ok::<_, FetchError>(FeeWindowStats::from_snapshots(&snapshots))
                },
            );

            let (bal_price_usd, liquidity, voting_share, fee_window) =
                tokio::try_join!(bal_price, liquidity, voting_share, fee_window)?;

            let weekly_emission = self.sources.emissions.weekly(window.end);
            let vebal = calculate_vebal_apr(
                weekly_emission,
                voting_share,
                liquidity.average,
                bal_price_usd,
            );
            let apr = Apr::new(vebal, fee_window.apr);

            if apr.is_sentinel() {
                warn!(
                    pool_id = %pool.id,
                    network = %network,
                    window = %window.label,
                    bal_price_usd,
                    tvl = liquidity.average,
                    voting_share,
                    "veBAL APR could not be computed"
                );
            }

            debug!(total_apr = apr.total, tvl = liquidity.average, "Computed pool stats");

            Ok(PoolStatsData {
                round_id: window.round_id,
                pool_id: pool.id.clone(),
                apr,
                bal_price_usd,
                tvl: liquidity.average,
                voting_share,
                volume: fee_window.volume,
                collected_fees_usd: fee_window.collected_fees_usd,
                symbol: liquidity.symbol,
                network,
                tokens: pool.tokens.clone(),
                pool_type: pool.pool_type,
            })
        }
        .instrument(span)
        .await
    }

    /// Stats of one pool over a voting round, e.g. `("52", "0x5c6e...0014")`.
    pub async fn calculate_round_stats(
        &self,
        cache: &AggregationCache,
        round_id: &str,
        pool_id: &str,
    ) -> Result<PoolStatsData, AprError> {
        let round: Round = round_id.parse()?;
        let pool = self.resolve_pool(pool_id, None).await?;
        let window = AprWindow::for_round(&round);
        Ok(self.calculate_pool_stats(cache, &pool, &window).await?)
    }

    /// Pool metadata from the gauge registry, falling back to the subgraphs.
    ///
    /// Without a `network`, every batch network's subgraph is tried in turn.
    pub async fn resolve_pool(
        &self,
        pool_id: &str,
        network: Option<Network>,
    ) -> Result<PoolInfo, AprError> {
        if let Some(info) = self.registry.pool_info(pool_id) {
            if network.is_none_or(|n| n == info.network) {
                return Ok(info);
            }
        }

        let networks = match network {
            Some(network) => vec![network],
            None => self.config.batch_networks(),
        };

        for network in networks {
            match self.sources.snapshots.pool_info(network, pool_id).await {
                Ok(Some(mut info)) => {
                    info.gauge = self
                        .registry
                        .gauge_for_pool(&info.id)
                        .map(|gauge| gauge.address);
                    return Ok(info);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(pool_id, network = %network, error = %e, "Pool lookup failed");
                }
            }
        }

        Err(AprError::unknown_pool(pool_id))
    }

    /// The day-keyed dataset a request asks for, before post-processing.
    pub async fn resolve_request(
        &self,
        cache: &AggregationCache,
        request: &AprRequest,
    ) -> Result<PerDay, AprError> {
        match request {
            AprRequest::PoolDateRange {
                pool_id,
                network,
                start,
                end,
            } => {
                self.fetch_data_for_pool_date_range(cache, pool_id, *network, *start, *end)
                    .await
            }
            AprRequest::DateRange { start, end, query } => {
                Ok(self.fetch_data_for_date_range(cache, *start, *end, query).await)
            }
            AprRequest::Round {
                round,
                pool_id: Some(pool_id),
                ..
            } => {
                let pool = self.resolve_pool(pool_id, None).await?;
                let window = AprWindow::for_round(round);
                let stats = self.calculate_pool_stats(cache, &pool, &window).await?;
                Ok(PerDay::from([(round_day_key(round), vec![stats])]))
            }
            AprRequest::Round {
                round,
                pool_id: None,
                networks,
            } => Ok(self.fetch_data_for_round(cache, round, networks).await),
        }
    }

    /// Resolves a parsed query and post-processes the result.
    ///
    /// Each call uses its own [`AggregationCache`].
    pub async fn handle(&self, query: &AprQuery) -> Result<PoolStatsResults, AprError> {
        let span = spans::handle_apr_request(query.request.mode());

        async move {
            let cache = AggregationCache::new();
            let per_day = self.resolve_request(&cache, &query.request).await?;
            let stats = cache.stats().await;
            debug!(days = per_day.len(), cache = %stats, "Resolved request");
            Ok(run_pipeline(per_day, &query.options))
        }
        .instrument(span)
        .await
    }
}

/// Day key a round's records are stored under.
pub(crate) fn round_day_key(round: &Round) -> String {
    round.start_date.format("%Y-%m-%d").to_string()
}
