// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use crate::types::stats::{PoolStatsData, PoolStatsResults};

/// Skips `offset` records then keeps at most `limit` (all when `None`).
pub fn limit_pool_stats(
    records: Vec<PoolStatsData>,
    offset: usize,
    limit: Option<usize>,
) -> Vec<PoolStatsData> {
    records
        .into_iter()
        .skip(offset)
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}

/// Applies the same window to the average list and to every day.
pub fn limit_results(
    results: PoolStatsResults,
    offset: usize,
    limit: Option<usize>,
) -> PoolStatsResults {
    PoolStatsResults {
        per_day: results
            .per_day
            .into_iter()
            .map(|(day, records)| (day, limit_pool_stats(records, offset, limit)))
            .collect(),
        average: limit_pool_stats(results.average, offset, limit),
    }
}
