// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use crate::types::network::Network;
use crate::types::stats::{Apr, PerDay, PoolStatsData, VEBAL_APR_SENTINEL};

#[derive(Default)]
struct Accumulator {
    days: usize,
    tvl: f64,
    bal_price_usd: f64,
    voting_share: f64,
    volume: f64,
    collected_fees_usd: f64,
    swap_fee: f64,
    vebal_sum: f64,
    vebal_days: usize,
}

impl Accumulator {
    fn add(&mut self, record: &PoolStatsData) {
        self.days += 1;
        self.tvl += record.tvl;
        self.bal_price_usd += record.bal_price_usd;
        self.voting_share += record.voting_share;
        self.volume += record.volume;
        self.collected_fees_usd += record.collected_fees_usd;
        self.swap_fee += record.apr.breakdown.swap_fee;
        if !record.apr.is_sentinel() {
            self.vebal_sum += record.apr.breakdown.vebal;
            self.vebal_days += 1;
        }
    }

    fn finish(self, mut representative: PoolStatsData) -> PoolStatsData {
        let days = self.days as f64;
        let vebal = if self.vebal_days == 0 {
            VEBAL_APR_SENTINEL
        } else {
            self.vebal_sum / self.vebal_days as f64
        };

        representative.apr = Apr::new(vebal, self.swap_fee / days);
        representative.tvl = self.tvl / days;
        representative.bal_price_usd = self.bal_price_usd / days;
        representative.voting_share = self.voting_share / days;
        representative.volume = self.volume / days;
        representative.collected_fees_usd = self.collected_fees_usd / days;
        representative
    }
}

/// One record per pool with numeric fields averaged over its days.
///
/// veBAL APR is averaged over the days where it was defined. Descriptive
/// fields come from the pool's latest day. Pools are listed in order of first
/// appearance.
pub fn compute_averages(per_day: &PerDay) -> Vec<PoolStatsData> {
    let mut order: Vec<(String, Network)> = Vec::new();
    let mut groups: HashMap<(String, Network), (Accumulator, &PoolStatsData)> = HashMap::new();

    // BTreeMap iteration is chronological, so the last record seen is the latest.
    for record in per_day.values().flatten() {
        let key = (record.pool_id.clone(), record.network);
        let (acc, latest) = groups.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            (Accumulator::default(), record)
        });
        acc.add(record);
        *latest = record;
    }

    order
        .into_iter()
        .filter_map(|key| groups.remove(&key))
        .map(|(acc, latest)| acc.finish(latest.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::pool::PoolType;

    fn record(pool_id: &str, tvl: f64, vebal: f64, swap_fee: f64, symbol: &str) -> PoolStatsData {
        PoolStatsData {
            round_id: 60,
            pool_id: pool_id.to_string(),
            apr: Apr::new(vebal, swap_fee),
            bal_price_usd: 5.0,
            tvl,
            voting_share: 0.01,
            volume: 10.0,
            collected_fees_usd: 1.0,
            symbol: symbol.to_string(),
            network: Network::Ethereum,
            tokens: vec![],
            pool_type: PoolType::Weighted,
        }
    }

    #[test]
    fn averages_tvl_across_days() {
        let per_day = PerDay::from([
            ("2023-06-01".to_string(), vec![record("a", 100.0, 1.0, 0.0, "old")]),
            ("2023-06-02".to_string(), vec![record("a", 200.0, 2.0, 0.0, "old")]),
            ("2023-06-03".to_string(), vec![record("a", 300.0, 3.0, 0.0, "new")]),
        ]);

        let averages = compute_averages(&per_day);
        assert_eq!(averages.len(), 1);
        assert_eq!(averages[0].tvl, 200.0);
        assert_eq!(averages[0].apr.breakdown.vebal, 2.0);
        assert_eq!(averages[0].symbol, "new");
    }

    #[test]
    fn vebal_skips_undefined_days() {
        let per_day = PerDay::from([
            ("2023-06-01".to_string(), vec![record("a", 1.0, -1.0, 2.0, "A")]),
            ("2023-06-02".to_string(), vec![record("a", 1.0, 4.0, 4.0, "A")]),
        ]);

        let average = &compute_averages(&per_day)[0];
        assert_eq!(average.apr.breakdown.vebal, 4.0);
        assert_eq!(average.apr.breakdown.swap_fee, 3.0);
        assert_eq!(average.apr.total, 7.0);
    }

    #[test]
    fn all_undefined_days_keep_sentinel() {
        let per_day = PerDay::from([
            ("2023-06-01".to_string(), vec![record("a", 1.0, -1.0, 2.0, "A")]),
            ("2023-06-02".to_string(), vec![record("a", 1.0, -1.0, 4.0, "A")]),
        ]);

        let average = &compute_averages(&per_day)[0];
        assert!(average.apr.is_sentinel());
        assert_eq!(average.apr.total, VEBAL_APR_SENTINEL);
    }

    #[test]
    fn one_record_per_pool_in_first_seen_order() {
        let per_day = PerDay::from([
            (
                "2023-06-01".to_string(),
                vec![record("b", 1.0, 1.0, 0.0, "B"), record("a", 1.0, 1.0, 0.0, "A")],
            ),
            ("2023-06-02".to_string(), vec![record("a", 3.0, 1.0, 0.0, "A")]),
        ]);

        let averages = compute_averages(&per_day);
        let ids: Vec<_> = averages.iter().map(|r| r.pool_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(averages[1].tvl, 2.0);
    }

    #[test]
    fn empty_input_has_no_averages() {
        assert!(compute_averages(&PerDay::new()).is_empty());
    }
}
