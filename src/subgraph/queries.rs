// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! GraphQL documents and response shapes for the Balancer v2 subgraph.

pub mod pool_snapshots_query {
    use serde::Deserialize;

    use crate::rounds::UnixTimestamp;
    use crate::types::decimal::deserialize_decimal_f64;
    use crate::types::pool::PoolSnapshot;

    /// Snapshots of one pool with `from <= timestamp < to`, most recent first.
    pub const QUERY: &str = r#"
        query PoolSnapshotInRange($poolId: String!, $from: Int!, $to: Int!, $first: Int!, $skip: Int!) {
            poolSnapshots(
                first: $first
                skip: $skip
                orderBy: timestamp
                orderDirection: desc
                where: { pool: $poolId, timestamp_gte: $from, timestamp_lt: $to }
            ) {
                timestamp
                liquidity
                swapFees
                swapVolume
                pool {
                    symbol
                    totalLiquidity
                }
            }
        }
    "#;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    pub struct Data {
        pub pool_snapshots: Vec<Snapshot>,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    pub struct Snapshot {
        pub timestamp: i64,
        #[serde(deserialize_with = "deserialize_decimal_f64")]
        pub liquidity: f64,
        #[serde(deserialize_with = "deserialize_decimal_f64")]
        pub swap_fees: f64,
        #[serde(deserialize_with = "deserialize_decimal_f64")]
        pub swap_volume: f64,
        pub pool: SnapshotPool,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    pub struct SnapshotPool {
        #[serde(default)]
        pub symbol: Option<String>,
        #[serde(deserialize_with = "deserialize_decimal_f64")]
        pub total_liquidity: f64,
    }

    impl From<Snapshot> for PoolSnapshot {
        fn from(row: Snapshot) -> Self {
            PoolSnapshot {
                timestamp: UnixTimestamp(row.timestamp),
                liquidity: row.liquidity,
                swap_fees: row.swap_fees,
                swap_volume: row.swap_volume,
                total_liquidity: row.pool.total_liquidity,
                pool_symbol: row.pool.symbol.unwrap_or_default(),
            }
        }
    }
}

pub mod pools_query {
    use serde::Deserialize;

    use super::PoolRow;

    /// Pools matching a `Pool_filter`, optionally as of a block.
    pub const QUERY: &str = r#"
        query APRPools($first: Int!, $skip: Int!, $where: Pool_filter, $block: Block_height) {
            pools(
                first: $first
                skip: $skip
                orderBy: totalLiquidity
                orderDirection: desc
                where: $where
                block: $block
            ) {
                id
                symbol
                poolType
                totalLiquidity
                tokens {
                    address
                    symbol
                    weight
                }
            }
        }
    "#;

    #[derive(Debug, Deserialize, PartialEq)]
    pub struct Data {
        pub pools: Vec<PoolRow>,
    }
}

pub mod pool_query {
    use serde::Deserialize;

    use super::PoolRow;

    pub const QUERY: &str = r#"
        query Pool($id: ID!) {
            pool(id: $id) {
                id
                symbol
                poolType
                totalLiquidity
                tokens {
                    address
                    symbol
                    weight
                }
            }
        }
    "#;

    #[derive(Debug, Deserialize, PartialEq)]
    pub struct Data {
        pub pool: Option<PoolRow>,
    }
}

use serde::Deserialize;

use crate::types::decimal::deserialize_optional_decimal_f64;
use crate::types::network::Network;
use crate::types::pool::{PoolInfo, PoolToken, PoolType};

/// A pool entity as returned by the pool queries.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PoolRow {
    pub id: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub pool_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal_f64")]
    pub total_liquidity: Option<f64>,
    #[serde(default)]
    pub tokens: Vec<PoolToken>,
}

impl PoolRow {
    pub fn into_pool_info(self, network: Network) -> PoolInfo {
        PoolInfo {
            id: self.id.to_ascii_lowercase(),
            network,
            symbol: self.symbol.unwrap_or_default(),
            pool_type: self
                .pool_type
                .as_deref()
                .map(PoolType::from_subgraph)
                .unwrap_or(PoolType::Unknown),
            tokens: self.tokens,
            gauge: None,
        }
    }
}
