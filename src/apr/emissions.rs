// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! veBAL emission APR.

use crate::apr::WEEKS_IN_YEAR;
use crate::types::stats::VEBAL_APR_SENTINEL;

fn usable(value: f64) -> bool {
    value.is_finite() && value != 0.0
}

/// Annualized yield from BAL emissions directed to a pool, in percent.
///
/// ```text
/// (52 * weekly_emission * voting_share * bal_price_usd / tvl) * 100
/// ```
///
/// Returns [`VEBAL_APR_SENTINEL`] when the voting share, TVL or BAL price is
/// zero or not finite. A result that still fails to be finite (e.g. an
/// infinite emission figure) is also reported as the sentinel.
pub fn calculate_vebal_apr(
    weekly_emission: f64,
    voting_share: f64,
    tvl: f64,
    bal_price_usd: f64,
) -> f64 {
    if !(usable(voting_share) && usable(tvl) && usable(bal_price_usd)) {
        return VEBAL_APR_SENTINEL;
    }

    let apr = (WEEKS_IN_YEAR * (weekly_emission * voting_share * bal_price_usd) / tvl) * 100.0;
    if apr.is_finite() {
        apr
    } else {
        VEBAL_APR_SENTINEL
    }
}
