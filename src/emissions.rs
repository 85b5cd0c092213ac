// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! BAL emission schedule.
//!
//! BAL is minted at 145,000 BAL per week from the start of the emission
//! schedule. Every 365 days the rate is divided by `2^(1/4)`, halving it every
//! four years.

use crate::rounds::UnixTimestamp;

/// Weekly emissions at a point in time.
pub trait EmissionSchedule: Send + Sync {
    /// Tokens emitted per week at `timestamp`.
    fn weekly(&self, timestamp: UnixTimestamp) -> f64;
}

/// Weekly BAL emissions at the start of the schedule
pub const INITIAL_RATE: f64 = 145_000.0;

/// 2022-03-28T11:00:51Z
pub const START_EPOCH_TIME: i64 = 1_648_465_251;

pub const RATE_REDUCTION_TIME: i64 = 365 * 86_400;

/// The BAL token emission schedule.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalEmissions;

impl BalEmissions {
    /// `2^(1/4)`
    pub fn rate_reduction_coefficient() -> f64 {
        2f64.powf(0.25)
    }

    /// Number of rate reductions applied at `timestamp`, `None` before the
    /// schedule starts.
    pub fn epoch(timestamp: UnixTimestamp) -> Option<i64> {
        let elapsed = timestamp.0 - START_EPOCH_TIME;
        (elapsed >= 0).then(|| elapsed / RATE_REDUCTION_TIME)
    }
}

impl EmissionSchedule for BalEmissions {
    fn weekly(&self, timestamp: UnixTimestamp) -> f64 {
        match Self::epoch(timestamp) {
            Some(epoch) => {
                let exponent = i32::try_from(epoch).unwrap_or(i32::MAX);
                INITIAL_RATE / Self::rate_reduction_coefficient().powi(exponent)
            }
            None => 0.0,
        }
    }
}
