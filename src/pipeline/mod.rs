// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Post-processing of day-keyed pool stats.
//!
//! [`run_pipeline`] applies, in order:
//!
//! 1. [`PoolStatsFilter::apply`] to every day, dropping days left empty
//! 2. [`compute_averages`] over the filtered days
//! 3. [`sort_results`] to the average list and every day
//! 4. [`limit_results`] to the average list and every day
//!
//! Every stage is a pure function over owned data.

mod average;
mod filter;
mod limit;
mod sort;

pub use average::compute_averages;
pub use filter::PoolStatsFilter;
pub use limit::{limit_pool_stats, limit_results};
pub use sort::{sort_pool_stats, sort_results, Order, SortKey};

use crate::types::stats::{PerDay, PoolStatsResults};

/// Presentation options for one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineOptions {
    pub filter: PoolStatsFilter,
    pub sort: SortKey,
    pub order: Order,
    pub offset: usize,
    /// `None` keeps every record after `offset`
    pub limit: Option<usize>,
}

pub fn run_pipeline(per_day: PerDay, options: &PipelineOptions) -> PoolStatsResults {
    let per_day = options.filter.apply(per_day);
    let average = compute_averages(&per_day);

    let mut results = PoolStatsResults { per_day, average };
    sort_results(&mut results, options.sort, options.order);
    limit_results(results, options.offset, options.limit)
}
