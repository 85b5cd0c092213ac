// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use alloy_primitives::Address;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, Instrument};

use crate::config::GaugeSource;
use crate::errors::FetchError;
use crate::tracing::spans;
use crate::types::network::Network;
use crate::types::pool::{PoolInfo, PoolToken, PoolType};

/// Pool section of a voting-gauge entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaugePool {
    pub id: String,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub pool_type: Option<String>,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub tokens: Vec<PoolToken>,
}

/// One entry of the Balancer voting-gauge list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingGauge {
    pub address: Address,
    pub network: Network,
    #[serde(default)]
    pub is_killed: bool,
    pub pool: GaugePool,
    #[serde(default, rename = "tokenLogoURIs")]
    pub token_logo_uris: HashMap<String, String>,
}

impl VotingGauge {
    /// Pool metadata with token logos filled in from the gauge entry.
    pub fn pool_info(&self) -> PoolInfo {
        let tokens = self
            .pool
            .tokens
            .iter()
            .map(|token| {
                let mut token = token.clone();
                if token.logo_src.is_none() {
                    token.logo_src = self.logo_for(token.address);
                }
                token
            })
            .collect();

        PoolInfo {
            id: self.pool.id.to_ascii_lowercase(),
            network: self.network,
            symbol: self.pool.symbol.clone(),
            pool_type: self
                .pool
                .pool_type
                .as_deref()
                .map(PoolType::from_subgraph)
                .unwrap_or(PoolType::Unknown),
            tokens,
            gauge: Some(self.address),
        }
    }

    fn logo_for(&self, token: Address) -> Option<String> {
        let key = token.to_string();
        self.token_logo_uris
            .iter()
            .find(|(address, _)| address.eq_ignore_ascii_case(&key))
            .map(|(_, uri)| uri.clone())
    }
}

/// Pool id to gauge lookup over the voting-gauge list.
#[derive(Debug, Clone, Default)]
pub struct GaugeRegistry {
    gauges: Vec<VotingGauge>,
    /// Lowercase pool id to index in `gauges`
    by_pool: HashMap<String, usize>,
}

impl GaugeRegistry {
    pub fn new(gauges: Vec<VotingGauge>) -> Self {
        let mut by_pool: HashMap<String, usize> = HashMap::with_capacity(gauges.len());
        for (index, gauge) in gauges.iter().enumerate() {
            let key = gauge.pool.id.to_ascii_lowercase();
            // A pool may have had several gauges; the live one wins.
            match by_pool.get(&key) {
                Some(&existing) if !gauges[existing].is_killed => {}
                _ => {
                    by_pool.insert(key, index);
                }
            }
        }
        Self { gauges, by_pool }
    }

    pub fn from_json(json: &str) -> Result<Self, FetchError> {
        let gauges: Vec<VotingGauge> =
            serde_json::from_str(json).map_err(|e| FetchError::decode("voting gauge list", e))?;
        Ok(Self::new(gauges))
    }

    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, FetchError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| FetchError::io(path, e))?;
        Self::from_json(&json)
    }

    pub async fn from_url(http: &Client, url: &str) -> Result<Self, FetchError> {
        let response = http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::http("voting gauges", e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::http("voting gauges", e))?;
        if !status.is_success() {
            return Err(FetchError::status("voting gauges", status.as_u16(), body));
        }
        Self::from_json(&body)
    }

    pub async fn load(source: &GaugeSource, http: &Client) -> Result<Self, FetchError> {
        let label = source.to_string();
        async move {
            let registry = match source {
                GaugeSource::File(path) => Self::from_file(path).await?,
                GaugeSource::Url(url) => Self::from_url(http, url).await?,
            };
            info!(gauges = registry.len(), "Loaded voting gauge list");
            Ok(registry)
        }
        .instrument(spans::load_gauges(&label))
        .await
    }

    pub fn len(&self) -> usize {
        self.gauges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gauges.is_empty()
    }

    /// Gauge entry for a pool, matched case-insensitively.
    pub fn gauge_for_pool(&self, pool_id: &str) -> Option<&VotingGauge> {
        self.by_pool
            .get(&pool_id.to_ascii_lowercase())
            .map(|&index| &self.gauges[index])
    }

    pub fn pool_info(&self, pool_id: &str) -> Option<PoolInfo> {
        self.gauge_for_pool(pool_id).map(VotingGauge::pool_info)
    }

    /// One entry per pool on the given networks (all networks when empty).
    pub fn pools(&self, networks: &[Network], include_killed: bool) -> Vec<PoolInfo> {
        let mut pools: Vec<PoolInfo> = self
            .by_pool
            .values()
            .map(|&index| &self.gauges[index])
            .filter(|gauge| include_killed || !gauge.is_killed)
            .filter(|gauge| networks.is_empty() || networks.contains(&gauge.network))
            .map(VotingGauge::pool_info)
            .collect();
        pools.sort_by(|a, b| a.network.cmp(&b.network).then_with(|| a.id.cmp(&b.id)));
        pools
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const GAUGES: &str = r#"[
        {
            "address": "0xb78543e00712c3abba10d0852f6e38fde2aaba4d",
            "network": 1,
            "isKilled": false,
            "addedTimestamp": 1650000000,
            "relativeWeightCap": "null",
            "pool": {
                "id": "0x5C6EE304399DBDB9C8EF030AB642B10820DB8F56000200000000000000000014",
                "address": "0x5c6ee304399dbdb9c8ef030ab642b10820db8f56",
                "poolType": "Weighted",
                "symbol": "B-80BAL-20WETH",
                "tokens": [
                    { "address": "0xba100000625a3754423978a60c9317c58a424e3d", "weight": "0.8", "symbol": "BAL" },
                    { "address": "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2", "weight": "0.2", "symbol": "WETH" }
                ]
            },
            "tokenLogoURIs": {
                "0xba100000625a3754423978a60c9317c58a424e3d": "https://assets.example/bal.png"
            }
        },
        {
            "address": "0x1111111111111111111111111111111111111111",
            "network": 137,
            "isKilled": true,
            "pool": {
                "id": "0x06df3b2bbb68adc8b0e302443692037ed9f91b42000000000000000000000063",
                "poolType": "ComposableStable",
                "symbol": "staBAL3",
                "tokens": []
            }
        }
    ]"#;

    #[test]
    fn decodes_voting_gauge_list() {
        let registry = GaugeRegistry::from_json(GAUGES).unwrap();
        assert_eq!(registry.len(), 2);

        let gauge = registry
            .gauge_for_pool("0x5c6ee304399dbdb9c8ef030ab642b10820db8f56000200000000000000000014")
            .unwrap();
        assert_eq!(gauge.network, Network::Ethereum);
        assert!(!gauge.is_killed);
    }

    #[test]
    fn pool_info_carries_gauge_and_logos() {
        let registry = GaugeRegistry::from_json(GAUGES).unwrap();
        let info = registry
            .pool_info("0x5C6EE304399DBDB9C8EF030AB642B10820DB8F56000200000000000000000014")
            .unwrap();

        assert_eq!(info.pool_type, PoolType::Weighted);
        assert!(info.gauge.is_some());
        assert_eq!(info.tokens[0].weight, Some(0.8));
        assert_eq!(
            info.tokens[0].logo_src.as_deref(),
            Some("https://assets.example/bal.png")
        );
        assert_eq!(info.tokens[1].logo_src, None);
    }

    #[test]
    fn killed_gauges_are_skipped_on_request() {
        let registry = GaugeRegistry::from_json(GAUGES).unwrap();
        assert_eq!(registry.pools(&[], true).len(), 2);
        assert_eq!(registry.pools(&[], false).len(), 1);
        assert_eq!(registry.pools(&[Network::Polygon], true).len(), 1);
        assert!(registry.pools(&[Network::Gnosis], true).is_empty());
    }

    #[test]
    fn live_gauge_wins_over_killed_one() {
        let json = r#"[
            { "address": "0x1111111111111111111111111111111111111111", "network": 1, "isKilled": false,
              "pool": { "id": "0xaa", "symbol": "A", "tokens": [] } },
            { "address": "0x2222222222222222222222222222222222222222", "network": 1, "isKilled": true,
              "pool": { "id": "0xAA", "symbol": "A", "tokens": [] } }
        ]"#;
        let registry = GaugeRegistry::from_json(json).unwrap();
        let gauge = registry.gauge_for_pool("0xaa").unwrap();
        assert!(!gauge.is_killed);
    }

    #[test]
    fn malformed_list_is_a_decode_error() {
        assert!(matches!(
            GaugeRegistry::from_json("{\"not\": \"a list\"}"),
            Err(FetchError::Decode { .. })
        ));
    }

    #[tokio::test]
    async fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(GAUGES.as_bytes()).unwrap();

        let source = GaugeSource::File(file.path().to_path_buf());
        let registry = GaugeRegistry::load(&source, &Client::new()).await.unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = GaugeRegistry::from_file(dir.path().join("voting-gauges.json")).await;
        assert!(matches!(result, Err(FetchError::Io { .. })));
    }
}
