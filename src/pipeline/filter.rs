// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use crate::types::network::Network;
use crate::types::pool::PoolType;
use crate::types::stats::{PerDay, PoolStatsData};

/// Predicates applied to every record of a day-keyed dataset.
///
/// Bounds are inclusive. Empty lists match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolStatsFilter {
    pub min_tvl: Option<f64>,
    pub max_tvl: Option<f64>,
    /// Lower bound on `apr.total`
    pub min_apr: Option<f64>,
    /// Upper bound on `apr.total`
    pub max_apr: Option<f64>,
    /// Token symbols, any of which must be in the pool (case-insensitive)
    pub tokens: Vec<String>,
    pub types: Vec<PoolType>,
    pub networks: Vec<Network>,
}

impl PoolStatsFilter {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn matches(&self, data: &PoolStatsData) -> bool {
        let above = |bound: Option<f64>, value: f64| bound.is_none_or(|min| value >= min);
        let below = |bound: Option<f64>, value: f64| bound.is_none_or(|max| value <= max);

        above(self.min_tvl, data.tvl)
            && below(self.max_tvl, data.tvl)
            && above(self.min_apr, data.apr.total)
            && below(self.max_apr, data.apr.total)
            && (self.types.is_empty() || self.types.contains(&data.pool_type))
            && (self.networks.is_empty() || self.networks.contains(&data.network))
            && (self.tokens.is_empty()
                || data.tokens.iter().any(|token| {
                    self.tokens
                        .iter()
                        .any(|wanted| wanted.eq_ignore_ascii_case(&token.symbol))
                }))
    }

    /// Keeps matching records; days with none left are dropped.
    pub fn apply(&self, per_day: PerDay) -> PerDay {
        per_day
            .into_iter()
            .filter_map(|(day, records)| {
                let kept: Vec<_> = records.into_iter().filter(|r| self.matches(r)).collect();
                (!kept.is_empty()).then_some((day, kept))
            })
            .collect()
    }
}
