// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use alloy_provider::RootProvider;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::api::{serve_api, AppState};
use crate::config::AprConfig;
use crate::emissions::BalEmissions;
use crate::errors::FetchError;
use crate::gauges::{GaugeControllerClient, GaugeRegistry};
use crate::price::DefiLlamaClient;
use crate::stats::{AprSources, PoolStatsCalculator};
use crate::subgraph::BalancerSubgraph;

/// Log output selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// Anything other than `json` falls back to text.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup("LOG_FORMAT") {
            Some(value) if value.trim().eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Installs the global subscriber, filtered by `RUST_LOG` and defaulting to `info`.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// How far DefiLlama may look around a timestamp for a price point.
const PRICE_SEARCH_WIDTH: &str = "4h";

/// Wires the production sources described by `config`.
///
/// Loads the voting-gauge list up front, so a missing or malformed list fails
/// startup rather than individual requests.
pub async fn build_calculator(config: &AprConfig) -> anyhow::Result<PoolStatsCalculator> {
    let http = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()?;

    let registry = Arc::new(GaugeRegistry::load(&config.gauges_source, &http).await?);

    let snapshots = BalancerSubgraph::from_config(config, http.clone())?;
    let defillama = Arc::new(
        DefiLlamaClient::new(http, config.defillama_url.as_str())
            .with_search_width(PRICE_SEARCH_WIDTH),
    );

    let rpc_url = Url::parse(&config.rpc_url)
        .map_err(|e| FetchError::invalid_url(config.rpc_url.as_str(), e))?;
    let provider: RootProvider = RootProvider::new_http(rpc_url);
    let weights = GaugeControllerClient::new(provider, Arc::clone(&registry));

    let sources = AprSources {
        snapshots: Arc::new(snapshots),
        prices: defillama.clone(),
        blocks: defillama,
        weights: Arc::new(weights),
        emissions: Arc::new(BalEmissions),
    };

    info!(
        networks = config.subgraph_urls.len(),
        gauges = registry.len(),
        "Initialized APR sources"
    );

    Ok(PoolStatsCalculator::new(sources, registry, config.clone()))
}

/// Main entry point for the application.
pub async fn run() -> anyhow::Result<()> {
    let config = AprConfig::from_env()?;

    let listener = TcpListener::bind(&format!("0.0.0.0:{}", config.api_port)).await?;

    let calculator = Arc::new(build_calculator(&config).await?);

    serve_api(listener, AppState::new(calculator)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_defaults_to_text() {
        assert_eq!(LogFormat::from_lookup(|_| None), LogFormat::Text);
        assert_eq!(LogFormat::from_lookup(|_| Some("pretty".to_string())), LogFormat::Text);
    }

    #[test]
    fn log_format_json_is_case_insensitive() {
        assert_eq!(LogFormat::from_lookup(|_| Some("json".to_string())), LogFormat::Json);
        assert_eq!(LogFormat::from_lookup(|_| Some(" JSON\n".to_string())), LogFormat::Json);
    }
}
