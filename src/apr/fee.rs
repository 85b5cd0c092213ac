// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Swap fee APR.
//!
//! Snapshots carry cumulative swap fees, so the fees collected over a window
//! are the difference between the most recent and the oldest snapshot. The
//! yield is that difference over the pool's liquidity at the end of the
//! window, annualized by the distance between the two snapshots:
//!
//! ```text
//! fee_diff   = end.swap_fees - start.swap_fees
//! fee_apr    = 10000 * fee_diff / end.total_liquidity
//! annualized = fee_apr * SECONDS_IN_YEAR / (end.timestamp - start.timestamp)
//! result     = annualized / 100
//! ```
//!
//! Snapshots are daily and each one records the state at the start of its
//! day, so a window's fee snapshots must be fetched up to one snapshot period
//! past the window end.

use crate::apr::{finite_or_zero, SECONDS_IN_YEAR};
use crate::types::pool::PoolSnapshot;

/// Fee-derived figures for one window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeeWindowStats {
    /// Annualized swap fee APR, `0` when not computable
    pub apr: f64,
    /// Swap volume (USD) over the window
    pub volume: f64,
    /// Swap fees (USD) collected over the window
    pub collected_fees_usd: f64,
}

impl FeeWindowStats {
    /// Derives fee stats from snapshots ordered most recent first.
    ///
    /// Fewer than two snapshots leave nothing to diff, and every figure is
    /// `0`.
    pub fn from_snapshots(snapshots: &[PoolSnapshot]) -> Self {
        let (Some(end), Some(start)) = (snapshots.first(), snapshots.last()) else {
            return Self::default();
        };

        Self {
            apr: fee_apr_between(start, end),
            volume: finite_or_zero(end.swap_volume - start.swap_volume),
            collected_fees_usd: finite_or_zero(end.swap_fees - start.swap_fees),
        }
    }
}

/// Annualized swap fee APR between two snapshots, in percent share units.
///
/// Returns `0` instead of NaN or an infinity, e.g. for zero end liquidity or
/// when both snapshots share a timestamp.
pub fn fee_apr_between(start: &PoolSnapshot, end: &PoolSnapshot) -> f64 {
    let fee_diff = end.swap_fees - start.swap_fees;
    let fee_apr = 10_000.0 * (fee_diff / end.total_liquidity);
    let elapsed = (end.timestamp.0 - start.timestamp.0) as f64;
    let annualized = fee_apr * (SECONDS_IN_YEAR as f64 / elapsed);

    finite_or_zero(annualized / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rounds::UnixTimestamp;

    fn snapshot(timestamp: i64, swap_fees: f64, total_liquidity: f64) -> PoolSnapshot {
        PoolSnapshot {
            timestamp: UnixTimestamp(timestamp),
            liquidity: total_liquidity,
            swap_fees,
            swap_volume: swap_fees * 100.0,
            total_liquidity,
            pool_symbol: "TEST".to_string(),
        }
    }

    #[test]
    fn one_year_gap_has_unit_annualization() {
        let start = snapshot(0, 100.0, 10_000.0);
        let end = snapshot(SECONDS_IN_YEAR, 200.0, 12_000.0);

        let apr = fee_apr_between(&start, &end);
        let expected = 10_000.0 * (100.0 / 12_000.0) / 100.0;
        assert!(
            (apr - expected).abs() < 1e-12,
            "one-year window must not rescale: got {apr}, expected {expected}"
        );
        assert!((apr - 0.8333).abs() < 1e-4);
    }

    #[test]
    fn half_year_gap_doubles() {
        let start = snapshot(0, 100.0, 10_000.0);
        let end = snapshot(SECONDS_IN_YEAR / 2, 200.0, 10_000.0);
        assert!((fee_apr_between(&start, &end) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn zero_end_liquidity_yields_zero_not_nan() {
        let start = snapshot(0, 100.0, 10_000.0);
        let end = snapshot(86_400, 200.0, 0.0);
        let apr = fee_apr_between(&start, &end);
        assert_eq!(apr, 0.0);
    }

    #[test]
    fn identical_timestamps_yield_zero() {
        let a = snapshot(86_400, 100.0, 10_000.0);
        assert_eq!(fee_apr_between(&a, &a), 0.0);
    }

    #[test]
    fn window_stats_use_first_and_last_snapshot() {
        // most recent first
        let snapshots = vec![
            snapshot(SECONDS_IN_YEAR, 200.0, 12_000.0),
            snapshot(SECONDS_IN_YEAR / 2, 150.0, 11_000.0),
            snapshot(0, 100.0, 10_000.0),
        ];
        let stats = FeeWindowStats::from_snapshots(&snapshots);
        assert!((stats.apr - 0.8333).abs() < 1e-4);
        assert_eq!(stats.collected_fees_usd, 100.0);
        assert_eq!(stats.volume, 10_000.0);
    }

    #[test]
    fn window_stats_degrade_without_snapshots() {
        assert_eq!(FeeWindowStats::from_snapshots(&[]), FeeWindowStats::default());

        let single = vec![snapshot(0, 100.0, 10_000.0)];
        let stats = FeeWindowStats::from_snapshots(&single);
        assert_eq!(stats.apr, 0.0);
        assert_eq!(stats.collected_fees_usd, 0.0);
    }
}
