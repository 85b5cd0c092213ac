// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Pool stats records produced by the calculators and reshaped by the pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::network::Network;
use crate::types::pool::{PoolToken, PoolType};

/// veBAL APR value meaning "inputs were insufficient to compute a yield".
///
/// Not a real negative yield. Propagates to [`Apr::total`].
pub const VEBAL_APR_SENTINEL: f64 = -1.0;

/// Per-component APR, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AprBreakdown {
    #[serde(rename = "veBAL")]
    pub vebal: f64,
    #[serde(rename = "swapFee")]
    pub swap_fee: f64,
}

/// Total APR plus its breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Apr {
    pub total: f64,
    pub breakdown: AprBreakdown,
}

impl Apr {
    /// Combines both components.
    ///
    /// `total` is the sum when the veBAL component is defined. An undefined
    /// veBAL component makes `total` exactly the sentinel, not `-1 + swap_fee`,
    /// so a consumer can test either field for it.
    pub fn new(vebal: f64, swap_fee: f64) -> Self {
        let total = if vebal == VEBAL_APR_SENTINEL {
            VEBAL_APR_SENTINEL
        } else {
            vebal + swap_fee
        };
        Self {
            total,
            breakdown: AprBreakdown { vebal, swap_fee },
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.breakdown.vebal == VEBAL_APR_SENTINEL
    }
}

/// Yield and liquidity figures for one pool over one window (a round or a day).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolStatsData {
    pub round_id: u32,
    pub pool_id: String,
    pub apr: Apr,
    #[serde(rename = "balPriceUSD")]
    pub bal_price_usd: f64,
    pub tvl: f64,
    pub voting_share: f64,
    /// Swap volume (USD) over the fee window
    pub volume: f64,
    /// Swap fees (USD) collected over the fee window
    #[serde(rename = "collectedFeesUSD")]
    pub collected_fees_usd: f64,
    pub symbol: String,
    pub network: Network,
    pub tokens: Vec<PoolToken>,
    #[serde(rename = "type")]
    pub pool_type: PoolType,
}

/// Day (`YYYY-MM-DD`) to the records computed for that day.
pub type PerDay = BTreeMap<String, Vec<PoolStatsData>>;

/// Response shape of the APR endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolStatsResults {
    pub per_day: PerDay,
    pub average: Vec<PoolStatsData>,
}
