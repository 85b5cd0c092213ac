// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Pool metadata and point-in-time pool snapshots.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::FieldIssue;
use crate::rounds::UnixTimestamp;
use crate::types::decimal::deserialize_optional_decimal_f64;
use crate::types::network::Network;

/// Pool families as presented to users.
///
/// Serialized by key (`"PHANTOM_STABLE"`, `"WEIGHTED"`, ...). The display
/// names follow what Balancer shows on its own frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolType {
    #[serde(rename = "PHANTOM_STABLE")]
    PhantomStable,
    #[serde(rename = "WEIGHTED")]
    Weighted,
    #[serde(rename = "GYROE")]
    GyroE,
    #[serde(rename = "STABLE")]
    Stable,
    #[serde(rename = "META_STABLE")]
    MetaStable,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl PoolType {
    pub const ALL: [PoolType; 6] = [
        PoolType::PhantomStable,
        PoolType::Weighted,
        PoolType::GyroE,
        PoolType::Stable,
        PoolType::MetaStable,
        PoolType::Unknown,
    ];

    pub const fn key(&self) -> &'static str {
        match self {
            PoolType::PhantomStable => "PHANTOM_STABLE",
            PoolType::Weighted => "WEIGHTED",
            PoolType::GyroE => "GYROE",
            PoolType::Stable => "STABLE",
            PoolType::MetaStable => "META_STABLE",
            PoolType::Unknown => "UNKNOWN",
        }
    }

    pub const fn display_name(&self) -> &'static str {
        match self {
            PoolType::PhantomStable => "ComposableStable",
            PoolType::Weighted => "Weighted",
            PoolType::GyroE => "GyroE",
            PoolType::Stable => "Stable",
            PoolType::MetaStable => "MetaStable",
            PoolType::Unknown => "FX",
        }
    }

    /// Maps a subgraph / gauge-list `poolType` string. Unrecognized families
    /// fall back to [`PoolType::Unknown`].
    pub fn from_subgraph(pool_type: &str) -> Self {
        match pool_type {
            "ComposableStable" | "PhantomStable" | "StablePhantom" => PoolType::PhantomStable,
            "Weighted" | "WeightedPool" => PoolType::Weighted,
            "GyroE" => PoolType::GyroE,
            "Stable" => PoolType::Stable,
            "MetaStable" => PoolType::MetaStable,
            _ => PoolType::Unknown,
        }
    }
}

impl fmt::Display for PoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PoolType {
    type Err = FieldIssue;

    /// Accepts either the key or the display name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| {
                t.key().eq_ignore_ascii_case(value) || t.display_name().eq_ignore_ascii_case(value)
            })
            .ok_or_else(|| FieldIssue::new("type", format!("unknown pool type '{value}'")))
    }
}

/// A token held by a pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolToken {
    pub address: Address,
    #[serde(default)]
    pub symbol: String,
    /// Normalized weight for weighted pools, `None` for stable families
    #[serde(default, deserialize_with = "deserialize_optional_decimal_f64")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_src: Option<String>,
}

/// Pool metadata needed to compute and label pool stats.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolInfo {
    /// 32-byte Balancer pool id as lowercase hex
    pub id: String,
    pub network: Network,
    pub symbol: String,
    pub pool_type: PoolType,
    pub tokens: Vec<PoolToken>,
    /// Voting gauge, when the pool has one
    pub gauge: Option<Address>,
}

/// A point-in-time record of a pool's liquidity and cumulative fee state.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolSnapshot {
    pub timestamp: UnixTimestamp,
    /// USD liquidity at the snapshot
    pub liquidity: f64,
    /// Cumulative swap fees (USD) at the snapshot
    pub swap_fees: f64,
    /// Cumulative swap volume (USD) at the snapshot
    pub swap_volume: f64,
    /// Pool's total liquidity (USD) as reported alongside the snapshot
    pub total_liquidity: f64,
    pub pool_symbol: String,
}

/// Average liquidity of a pool over a window, plus the symbol reported by the
/// most recent snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PoolLiquidity {
    pub average: f64,
    pub symbol: String,
}

impl PoolLiquidity {
    /// Averages snapshot liquidity. Snapshots are expected most recent first.
    ///
    /// An empty slice yields zero liquidity and an empty symbol.
    pub fn from_snapshots(snapshots: &[PoolSnapshot]) -> Self {
        let Some(latest) = snapshots.first() else {
            return Self::default();
        };

        let total: f64 = snapshots.iter().map(|s| s.liquidity).sum();
        Self {
            average: total / snapshots.len() as f64,
            symbol: latest.pool_symbol.clone(),
        }
    }
}
