// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::collections::HashMap;
use tracing::{debug, Instrument};

use super::queries::{pool_query, pool_snapshots_query, pools_query};
use super::{fetch_all_pages, PageSize, PoolListing, SnapshotSource, SubgraphClient};
use crate::config::AprConfig;
use crate::errors::FetchError;
use crate::rounds::UnixTimestamp;
use crate::tracing::spans;
use crate::types::network::Network;
use crate::types::pool::{PoolInfo, PoolSnapshot};

/// [`SnapshotSource`] backed by the Balancer v2 subgraphs.
#[derive(Debug, Clone)]
pub struct BalancerSubgraph {
    clients: HashMap<Network, SubgraphClient>,
    page_size: PageSize,
}

impl BalancerSubgraph {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            clients: HashMap::new(),
            page_size,
        }
    }

    /// One client per configured network, sharing `http`.
    pub fn from_config(config: &AprConfig, http: Client) -> Result<Self, FetchError> {
        let mut subgraph = Self::new(config.page_size);
        for (network, url) in &config.subgraph_urls {
            subgraph = subgraph.with_client(SubgraphClient::new(http.clone(), url, *network)?);
        }
        Ok(subgraph)
    }

    pub fn with_client(mut self, client: SubgraphClient) -> Self {
        self.clients.insert(client.network(), client);
        self
    }

    fn client(&self, network: Network) -> Result<&SubgraphClient, FetchError> {
        self.clients
            .get(&network)
            .ok_or_else(|| FetchError::unsupported_network(network))
    }
}

#[async_trait]
impl SnapshotSource for BalancerSubgraph {
    async fn snapshots_in_range(
        &self,
        network: Network,
        pool_id: &str,
        from: UnixTimestamp,
        to: UnixTimestamp,
    ) -> Result<Vec<PoolSnapshot>, FetchError> {
        let client = self.client(network)?;
        let span = spans::fetch_snapshots(network, pool_id, from, to);

        async move {
            let rows = fetch_all_pages(self.page_size, |skip, first| async move {
                client
                    .query::<pool_snapshots_query::Data>(
                        pool_snapshots_query::QUERY,
                        Some(json_map! {
                            "poolId" => pool_id,
                            "from" => from.0,
                            "to" => to.0,
                            "first" => first,
                            "skip" => skip,
                        }),
                    )
                    .await
                    .map(|data| data.pool_snapshots)
            })
            .await?;

            debug!(count = rows.len(), "Fetched pool snapshots");
            Ok(rows.into_iter().map(PoolSnapshot::from).collect())
        }
        .instrument(span)
        .await
    }

    async fn pools_created_before(
        &self,
        network: Network,
        listing: &PoolListing,
    ) -> Result<Vec<PoolInfo>, FetchError> {
        let client = self.client(network)?;
        let span = spans::list_pools(network, listing.created_before);

        let mut filter = json!({
            "createTime_lt": listing.created_before.0,
            "totalLiquidity_gte": listing.min_tvl.to_string(),
            "totalLiquidity_lte": listing.max_tvl.to_string(),
        });
        if !listing.tokens.is_empty() {
            filter["tokens_"] = json!({ "symbol_in": listing.tokens });
        }
        let block = listing.block.map(|number| json!({ "number": number }));

        async move {
            let rows = fetch_all_pages(self.page_size, |skip, first| {
                let filter = filter.clone();
                let block = block.clone();
                async move {
                    client
                        .query::<pools_query::Data>(
                            pools_query::QUERY,
                            Some(json_map! {
                                "first" => first,
                                "skip" => skip,
                                "where" => filter,
                                "block" => block.unwrap_or(serde_json::Value::Null),
                            }),
                        )
                        .await
                        .map(|data| data.pools)
                }
            })
            .await?;

            debug!(count = rows.len(), block = ?listing.block, "Listed pools");
            Ok(rows
                .into_iter()
                .map(|row| row.into_pool_info(network))
                .collect())
        }
        .instrument(span)
        .await
    }

    async fn pool_info(
        &self,
        network: Network,
        pool_id: &str,
    ) -> Result<Option<PoolInfo>, FetchError> {
        let client = self.client(network)?;
        let data = client
            .query::<pool_query::Data>(
                pool_query::QUERY,
                Some(json_map! { "id" => pool_id.to_ascii_lowercase() }),
            )
            .await?;
        Ok(data.pool.map(|row| row.into_pool_info(network)))
    }
}
