// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::errors::FieldIssue;
use crate::types::stats::{PoolStatsData, PoolStatsResults};

/// Field a dataset is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    #[default]
    AprTotal,
    VebalApr,
    SwapFeeApr,
    Tvl,
    BalPriceUsd,
    VotingShare,
    Volume,
    CollectedFeesUsd,
    RoundId,
    PoolId,
    Symbol,
    Network,
    PoolType,
}

impl SortKey {
    pub const ALL: [SortKey; 13] = [
        SortKey::AprTotal,
        SortKey::VebalApr,
        SortKey::SwapFeeApr,
        SortKey::Tvl,
        SortKey::BalPriceUsd,
        SortKey::VotingShare,
        SortKey::Volume,
        SortKey::CollectedFeesUsd,
        SortKey::RoundId,
        SortKey::PoolId,
        SortKey::Symbol,
        SortKey::Network,
        SortKey::PoolType,
    ];

    /// Name of the field in the serialized record.
    pub const fn field(&self) -> &'static str {
        match self {
            SortKey::AprTotal => "apr.total",
            SortKey::VebalApr => "apr.breakdown.veBAL",
            SortKey::SwapFeeApr => "apr.breakdown.swapFee",
            SortKey::Tvl => "tvl",
            SortKey::BalPriceUsd => "balPriceUSD",
            SortKey::VotingShare => "votingShare",
            SortKey::Volume => "volume",
            SortKey::CollectedFeesUsd => "collectedFeesUSD",
            SortKey::RoundId => "roundId",
            SortKey::PoolId => "poolId",
            SortKey::Symbol => "symbol",
            SortKey::Network => "network",
            SortKey::PoolType => "type",
        }
    }

    pub fn compare(&self, a: &PoolStatsData, b: &PoolStatsData) -> Ordering {
        match self {
            SortKey::AprTotal => a.apr.total.total_cmp(&b.apr.total),
            SortKey::VebalApr => a.apr.breakdown.vebal.total_cmp(&b.apr.breakdown.vebal),
            SortKey::SwapFeeApr => a
                .apr
                .breakdown
                .swap_fee
                .total_cmp(&b.apr.breakdown.swap_fee),
            SortKey::Tvl => a.tvl.total_cmp(&b.tvl),
            SortKey::BalPriceUsd => a.bal_price_usd.total_cmp(&b.bal_price_usd),
            SortKey::VotingShare => a.voting_share.total_cmp(&b.voting_share),
            SortKey::Volume => a.volume.total_cmp(&b.volume),
            SortKey::CollectedFeesUsd => a.collected_fees_usd.total_cmp(&b.collected_fees_usd),
            SortKey::RoundId => a.round_id.cmp(&b.round_id),
            SortKey::PoolId => a.pool_id.cmp(&b.pool_id),
            SortKey::Symbol => a.symbol.cmp(&b.symbol),
            SortKey::Network => a.network.chain_id().cmp(&b.network.chain_id()),
            SortKey::PoolType => a.pool_type.key().cmp(b.pool_type.key()),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

impl FromStr for SortKey {
    type Err = FieldIssue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value == "apr" {
            return Ok(SortKey::AprTotal);
        }
        Self::ALL
            .into_iter()
            .find(|key| {
                let field = key.field();
                field == value || field.rsplit('.').next() == Some(value)
            })
            .ok_or_else(|| FieldIssue::new("sort", format!("cannot sort by '{value}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Order {
    Asc,
    #[default]
    Desc,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        })
    }
}

impl FromStr for Order {
    type Err = FieldIssue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Order::Asc),
            "desc" => Ok(Order::Desc),
            other => Err(FieldIssue::new(
                "order",
                format!("expected 'asc' or 'desc', got '{other}'"),
            )),
        }
    }
}

/// Stable sort; records that compare equal keep their relative order.
pub fn sort_pool_stats(records: &mut [PoolStatsData], key: SortKey, order: Order) {
    records.sort_by(|a, b| match order {
        Order::Asc => key.compare(a, b),
        Order::Desc => key.compare(b, a),
    });
}

/// Sorts the average list and every day.
pub fn sort_results(results: &mut PoolStatsResults, key: SortKey, order: Order) {
    sort_pool_stats(&mut results.average, key, order);
    for records in results.per_day.values_mut() {
        sort_pool_stats(records, key, order);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::network::Network;
    use crate::types::pool::PoolType;
    use crate::types::stats::Apr;

    fn record(pool_id: &str, total_apr: f64, tvl: f64) -> PoolStatsData {
        PoolStatsData {
            round_id: 60,
            pool_id: pool_id.to_string(),
            apr: Apr::new(total_apr, 0.0),
            bal_price_usd: 5.0,
            tvl,
            voting_share: 0.01,
            volume: 0.0,
            collected_fees_usd: 0.0,
            symbol: pool_id.to_uppercase(),
            network: Network::Ethereum,
            tokens: vec![],
            pool_type: PoolType::Weighted,
        }
    }

    fn ids(records: &[PoolStatsData]) -> Vec<&str> {
        records.iter().map(|r| r.pool_id.as_str()).collect()
    }

    #[test]
    fn sort_by_total_apr_desc() {
        let mut records = vec![record("a", 5.0, 0.0), record("b", 10.0, 0.0), record("c", 1.0, 0.0)];
        sort_pool_stats(&mut records, SortKey::AprTotal, Order::Desc);
        assert_eq!(ids(&records), vec!["b", "a", "c"]);
    }

    #[test]
    fn sort_is_stable_in_both_directions() {
        let mut records = vec![record("a", 1.0, 0.0), record("b", 1.0, 0.0), record("c", 0.0, 0.0)];
        sort_pool_stats(&mut records, SortKey::AprTotal, Order::Desc);
        assert_eq!(ids(&records), vec!["a", "b", "c"]);

        sort_pool_stats(&mut records, SortKey::AprTotal, Order::Asc);
        assert_eq!(ids(&records), vec!["c", "a", "b"]);
    }

    #[test]
    fn parses_field_names_and_aliases() {
        assert_eq!("apr".parse::<SortKey>().unwrap(), SortKey::AprTotal);
        assert_eq!("apr.total".parse::<SortKey>().unwrap(), SortKey::AprTotal);
        assert_eq!("veBAL".parse::<SortKey>().unwrap(), SortKey::VebalApr);
        assert_eq!("apr.breakdown.swapFee".parse::<SortKey>().unwrap(), SortKey::SwapFeeApr);
        assert_eq!("tvl".parse::<SortKey>().unwrap(), SortKey::Tvl);
        assert_eq!("type".parse::<SortKey>().unwrap(), SortKey::PoolType);
        assert!("color".parse::<SortKey>().is_err());

        assert_eq!("ASC".parse::<Order>().unwrap(), Order::Asc);
        assert!("sideways".parse::<Order>().is_err());
    }

    #[test]
    fn results_sort_every_day() {
        let mut results = PoolStatsResults {
            per_day: [(
                "2023-06-01".to_string(),
                vec![record("a", 0.0, 1.0), record("b", 0.0, 3.0)],
            )]
            .into(),
            average: vec![record("a", 0.0, 1.0), record("b", 0.0, 3.0)],
        };
        sort_results(&mut results, SortKey::Tvl, Order::Desc);
        assert_eq!(ids(&results.average), vec!["b", "a"]);
        assert_eq!(ids(&results.per_day["2023-06-01"]), vec!["b", "a"]);
    }
}
