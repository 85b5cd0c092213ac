// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use chrono::{NaiveDate, NaiveTime};
use futures::future::join_all;
use futures::stream::{self, StreamExt};
use tracing::{error, info, warn, Instrument};

use super::{round_day_key, PoolStatsCalculator};
use crate::cache::AggregationCache;
use crate::errors::{AprError, FetchError};
use crate::rounds::{days_inclusive, AprWindow, Round, UnixTimestamp};
use crate::subgraph::PoolListing;
use crate::tracing::spans;
use crate::types::network::Network;
use crate::types::pool::PoolInfo;
use crate::types::stats::{PerDay, PoolStatsData};

/// Pool selection for a date range batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateRangeQuery {
    /// Networks to list pools on; empty means every batch network
    pub networks: Vec<Network>,
    /// Overrides the configured listing minimum
    pub min_tvl: Option<f64>,
    /// Overrides the configured listing maximum
    pub max_tvl: Option<f64>,
    /// Token symbols a listed pool must hold one of
    pub tokens: Vec<String>,
}

struct Unit {
    index: usize,
    pool: PoolInfo,
    window: AprWindow,
}

fn day_windows(start: NaiveDate, end: NaiveDate) -> Vec<AprWindow> {
    days_inclusive(start, end)
        .filter_map(|day| match AprWindow::for_day(day) {
            Ok(window) => Some(window),
            Err(e) => {
                warn!(day = %day, error = %e, "Skipping day");
                None
            }
        })
        .collect()
}

impl PoolStatsCalculator {
    /// Every listed pool over every day of `[start, end]`.
    ///
    /// A network whose block lookup or pool listing fails contributes no
    /// pools, and a failed (pool, day) unit is omitted. Both are logged.
    pub async fn fetch_data_for_date_range(
        &self,
        cache: &AggregationCache,
        start: NaiveDate,
        end: NaiveDate,
        query: &DateRangeQuery,
    ) -> PerDay {
        let span = spans::fetch_data_for_date_range(start, end);

        async move {
            let networks = if query.networks.is_empty() {
                self.config.batch_networks()
            } else {
                query.networks.clone()
            };

            let created_before = UnixTimestamp::from_datetime(end.and_time(NaiveTime::MIN).and_utc())
                .min(UnixTimestamp::now());
            let listing = PoolListing {
                created_before,
                block: None,
                min_tvl: query.min_tvl.unwrap_or(self.config.min_tvl),
                max_tvl: query.max_tvl.unwrap_or(self.config.max_tvl),
                tokens: query.tokens.clone(),
            };

            let listed = join_all(
                networks
                    .iter()
                    .map(|&network| self.list_network_pools(network, &listing)),
            )
            .await;

            let pools: Vec<PoolInfo> = listed.into_iter().flatten().collect();
            let windows = day_windows(start, end);
            info!(
                pools = pools.len(),
                days = windows.len(),
                "Computing pool stats for date range"
            );

            let units: Vec<(PoolInfo, AprWindow)> = pools
                .iter()
                .flat_map(|pool| {
                    windows
                        .iter()
                        .map(move |window| (pool.clone(), window.clone()))
                })
                .collect();
            self.run_units(cache, units).await
        }
        .instrument(span)
        .await
    }

    /// One pool over every day of `[start, end]`.
    ///
    /// Fails only when the pool cannot be resolved; failed days are omitted.
    pub async fn fetch_data_for_pool_date_range(
        &self,
        cache: &AggregationCache,
        pool_id: &str,
        network: Option<Network>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PerDay, AprError> {
        let pool = self.resolve_pool(pool_id, network).await?;
        let span = spans::fetch_data_for_pool_date_range(&pool.id, pool.network, start, end);

        async move {
            let units = day_windows(start, end)
                .into_iter()
                .map(|window| (pool.clone(), window))
                .collect();
            Ok(self.run_units(cache, units).await)
        }
        .instrument(span)
        .await
    }

    /// Every live registry gauge over one round, keyed by the round start date.
    pub async fn fetch_data_for_round(
        &self,
        cache: &AggregationCache,
        round: &Round,
        networks: &[Network],
    ) -> PerDay {
        let span = spans::fetch_data_for_round(round.id);

        async move {
            let networks = if networks.is_empty() {
                self.config.batch_networks()
            } else {
                networks.to_vec()
            };
            let pools = self.registry.pools(&networks, false);
            info!(pools = pools.len(), "Computing pool stats for round");

            let window = AprWindow::for_round(round);
            let units = pools
                .into_iter()
                .map(|pool| (pool, window.clone()))
                .collect();
            let mut per_day = self.run_units(cache, units).await;

            // Every unit shares one window; re-key from its label to the date.
            let records = per_day.remove(&window.label).unwrap_or_default();
            if records.is_empty() {
                return PerDay::new();
            }
            PerDay::from([(round_day_key(round), records)])
        }
        .instrument(span)
        .await
    }

    async fn list_network_pools(&self, network: Network, listing: &PoolListing) -> Vec<PoolInfo> {
        let block = match self.sources.blocks.block_at(network, listing.created_before).await {
            Ok(block) => block,
            Err(e) => {
                warn!(network = %network, error = %e, "Block lookup failed, skipping network");
                return Vec::new();
            }
        };

        let listing = PoolListing {
            block: Some(block),
            ..listing.clone()
        };
        match self
            .sources
            .snapshots
            .pools_created_before(network, &listing)
            .await
        {
            Ok(pools) => {
                info!(network = %network, block, pools = pools.len(), "Listed pools");
                pools
                    .into_iter()
                    .map(|mut pool| {
                        pool.gauge = self
                            .registry
                            .gauge_for_pool(&pool.id)
                            .map(|gauge| gauge.address);
                        pool
                    })
                    .collect()
            }
            Err(e) => {
                warn!(network = %network, block, error = %e, "Pool listing failed, skipping network");
                Vec::new()
            }
        }
    }

    /// Runs units with bounded concurrency and groups successes by window
    /// label, keeping input order within each day.
    async fn run_units(
        &self,
        cache: &AggregationCache,
        units: Vec<(PoolInfo, AprWindow)>,
    ) -> PerDay {
        let units = units
            .into_iter()
            .enumerate()
            .map(|(index, (pool, window))| Unit {
                index,
                pool,
                window,
            });

        let mut outcomes: Vec<(usize, String, Result<PoolStatsData, FetchError>)> =
            stream::iter(units)
                .map(|unit| async move {
                    let result = self.calculate_pool_stats(cache, &unit.pool, &unit.window).await;
                    if let Err(e) = &result {
                        warn!(
                            pool_id = %unit.pool.id,
                            network = %unit.pool.network,
                            window = %unit.window.label,
                            error = %e,
                            "Pool stats failed, omitting"
                        );
                    }
                    (unit.index, unit.window.label, result)
                })
                .buffer_unordered(self.config.max_concurrency.max(1))
                .collect()
                .await;

        outcomes.sort_by_key(|(index, _, _)| *index);

        let total = outcomes.len();
        let mut failed = 0usize;
        let mut per_day = PerDay::new();
        for (_, label, result) in outcomes {
            match result {
                Ok(stats) => per_day.entry(label).or_default().push(stats),
                Err(_) => failed += 1,
            }
        }

        if total > 0 && failed == total {
            error!(units = total, "Every pool stats unit failed");
        } else if failed > 0 {
            warn!(failed, units = total, "Some pool stats units were omitted");
        }
        per_day
    }
}
