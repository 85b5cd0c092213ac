// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! DefiLlama coins API client.

use alloy_primitives::Address;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, Instrument};
use url::Url;

use super::{BlockSource, PriceSource};
use crate::errors::FetchError;
use crate::rounds::UnixTimestamp;
use crate::tracing::spans;
use crate::types::network::Network;

const SERVICE: &str = "defillama";

#[derive(Debug, Deserialize)]
struct PricesResponse {
    #[serde(default)]
    coins: HashMap<String, CoinPrice>,
}

#[derive(Debug, Deserialize)]
struct CoinPrice {
    price: f64,
    #[serde(default)]
    #[allow(dead_code)]
    symbol: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    timestamp: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct BlockResponse {
    height: u64,
    #[serde(default)]
    #[allow(dead_code)]
    timestamp: Option<i64>,
}

/// Historical prices and blocks from `coins.llama.fi`.
#[derive(Debug, Clone)]
pub struct DefiLlamaClient {
    http: Client,
    base_url: String,
    /// How far from the requested timestamp a price may be, e.g. `"4h"`
    search_width: Option<String>,
}

impl DefiLlamaClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            search_width: None,
        }
    }

    pub fn with_search_width(mut self, width: impl Into<String>) -> Self {
        self.search_width = Some(width.into());
        self
    }

    /// The `{chain}:{address}` coin identifier.
    pub fn coin_key(network: Network, token: Address) -> String {
        format!("{}:{}", network.defillama_slug(), token).to_ascii_lowercase()
    }

    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        let raw = format!("{}/{}", self.base_url, path);
        let mut url = Url::parse(&raw).map_err(|e| FetchError::invalid_url(&raw, e))?;
        if let Some(width) = &self.search_width {
            url.query_pairs_mut().append_pair("searchWidth", width);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::http(SERVICE, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| FetchError::http(SERVICE, e))?;
        if !status.is_success() {
            return Err(FetchError::status(SERVICE, status.as_u16(), text));
        }

        serde_json::from_str(&text).map_err(|e| FetchError::decode("defillama response", e))
    }
}

fn price_from_response(
    response: PricesResponse,
    coin: &str,
    timestamp: UnixTimestamp,
) -> Result<f64, FetchError> {
    response
        .coins
        .into_iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(coin))
        .map(|(_, entry)| entry.price)
        .filter(|price| price.is_finite())
        .ok_or_else(|| FetchError::missing_price(coin, timestamp.0))
}

#[async_trait]
impl PriceSource for DefiLlamaClient {
    async fn price_at(
        &self,
        network: Network,
        token: Address,
        timestamp: UnixTimestamp,
    ) -> Result<f64, FetchError> {
        let coin = Self::coin_key(network, token);
        let span = spans::fetch_price(&coin, timestamp);

        async move {
            let url = self.endpoint(&format!("prices/historical/{}/{}", timestamp.0, coin))?;
            let response: PricesResponse = self.get_json(url).await?;
            let price = price_from_response(response, &coin, timestamp)?;
            debug!(price, "Fetched historical price");
            Ok(price)
        }
        .instrument(span)
        .await
    }
}

#[async_trait]
impl BlockSource for DefiLlamaClient {
    async fn block_at(&self, network: Network, timestamp: UnixTimestamp) -> Result<u64, FetchError> {
        let span = spans::fetch_block(network, timestamp);

        async move {
            let url = self.endpoint(&format!(
                "block/{}/{}",
                network.defillama_slug(),
                timestamp.0
            ))?;
            let response: BlockResponse = self.get_json(url).await?;
            debug!(block = response.height, "Resolved block for timestamp");
            Ok(response.height)
        }
        .instrument(span)
        .await
    }
}
