// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Pool snapshots and pool listings from the Balancer v2 subgraph.
//!
//! [`SnapshotSource`] is the seam the calculators depend on;
//! [`BalancerSubgraph`] implements it over one [`SubgraphClient`] per network.
//! Collections are read with the iterative [`fetch_all_pages`] loop.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

use crate::errors::FetchError;
use crate::rounds::UnixTimestamp;
use crate::types::network::Network;
use crate::types::pool::{PoolInfo, PoolSnapshot};

mod balancer;
pub mod pagination;
pub mod queries;

pub use balancer::BalancerSubgraph;
pub use pagination::{fetch_all_pages, PageSize};

/// Filters for listing the pools of a network.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolListing {
    /// Only pools created strictly before this instant
    pub created_before: UnixTimestamp,
    /// Read the pool set as of this block
    pub block: Option<u64>,
    pub min_tvl: f64,
    pub max_tvl: f64,
    /// Keep pools holding any of these token symbols; empty keeps all
    pub tokens: Vec<String>,
}

/// Pool data needed by the APR calculators.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Every snapshot of `pool_id` with `from <= timestamp < to`, most recent
    /// first.
    async fn snapshots_in_range(
        &self,
        network: Network,
        pool_id: &str,
        from: UnixTimestamp,
        to: UnixTimestamp,
    ) -> Result<Vec<PoolSnapshot>, FetchError>;

    /// Pools matching the listing filters.
    async fn pools_created_before(
        &self,
        network: Network,
        listing: &PoolListing,
    ) -> Result<Vec<PoolInfo>, FetchError>;

    /// Metadata of one pool, `None` when the subgraph does not know it.
    async fn pool_info(&self, network: Network, pool_id: &str)
        -> Result<Option<PoolInfo>, FetchError>;
}

#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// A GraphQL client bound to one network's subgraph.
#[derive(Debug, Clone)]
pub struct SubgraphClient {
    http: Client,
    url: Url,
    network: Network,
}

impl SubgraphClient {
    pub fn new(http: Client, url: &str, network: Network) -> Result<Self, FetchError> {
        let url = Url::parse(url).map_err(|e| FetchError::invalid_url(url, e))?;
        Ok(Self { http, url, network })
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Runs a query and decodes its `data`.
    ///
    /// A response carrying GraphQL `errors` fails even when partial data is
    /// present.
    pub async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Option<Map<String, Value>>,
    ) -> Result<T, FetchError> {
        let body = serde_json::json!({
            "query": query,
            "variables": variables.unwrap_or_default(),
        });

        let response = self
            .http
            .post(self.url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| FetchError::http("subgraph", e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| FetchError::http("subgraph", e))?;
        if !status.is_success() {
            return Err(FetchError::status("subgraph", status.as_u16(), text));
        }

        let decoded: QueryResponse<T> = serde_json::from_str(&text)
            .map_err(|e| FetchError::decode("subgraph response", e))?;

        if let Some(errors) = decoded.errors.filter(|errors| !errors.is_empty()) {
            let message = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(FetchError::graphql(self.network, message));
        }

        decoded
            .data
            .ok_or_else(|| FetchError::empty_response("subgraph", "query returned no data"))
    }
}
