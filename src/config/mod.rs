// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Configuration for aprscan operations
//!
//! Controls where the APR sources fetch from and how hard a batch may hit
//! them: subgraph URLs per network, the DefiLlama and RPC endpoints, the
//! voting-gauge list, page size, concurrency, timeouts and the default TVL
//! bounds for pool listings.
//!
//! # Example: Using defaults
//!
//! ```rust
//! use aprscan::AprConfig;
//!
//! // Public endpoints for every network
//! let config = AprConfig::default();
//! assert!(config.subgraph_url(aprscan::Network::Ethereum).is_some());
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use aprscan::{AprConfigBuilder, Network};
//! use std::time::Duration;
//!
//! let config = AprConfigBuilder::with_defaults()
//!     .subgraph_url(Network::Polygon, "https://example.com/subgraphs/polygon")
//!     .max_concurrency(4)
//!     .request_timeout(Duration::from_secs(120))
//!     .build();
//! ```
//!
//! # Example: From the environment
//!
//! ```rust,ignore
//! use aprscan::AprConfig;
//!
//! // Reads .env, then API_PORT, RPC_URL, SUBGRAPH_URL_POLYGON, ...
//! let config = AprConfig::from_env()?;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::ConfigError;
use crate::subgraph::PageSize;
use crate::types::network::Network;

pub mod constants;

/// Where the voting-gauge list is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GaugeSource {
    File(PathBuf),
    Url(String),
}

impl GaugeSource {
    /// `http(s)://` values are URLs, anything else is a path.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            GaugeSource::Url(value.to_string())
        } else {
            GaugeSource::File(PathBuf::from(value))
        }
    }
}

impl FromStr for GaugeSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for GaugeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GaugeSource::File(path) => write!(f, "{}", path.display()),
            GaugeSource::Url(url) => f.write_str(url),
        }
    }
}

/// Configuration for aprscan operations
///
/// Use [`AprConfigBuilder`] for a fluent API to construct instances.
#[derive(Debug, Clone)]
pub struct AprConfig {
    /// Balancer subgraph per network. Networks without an entry are skipped
    /// by batch runs and fail single-pool requests.
    pub subgraph_urls: HashMap<Network, String>,

    /// DefiLlama coins API base URL
    /// Default: https://coins.llama.fi
    pub defillama_url: String,

    /// Ethereum mainnet JSON-RPC endpoint for GaugeController reads
    pub rpc_url: String,

    /// Voting-gauge list
    pub gauges_source: GaugeSource,

    /// Subgraph page size
    /// Default: 1000 (the subgraph's maximum `first`)
    pub page_size: PageSize,

    /// Maximum `(pool, day)` units computed concurrently in a batch
    /// Default: 16
    pub max_concurrency: usize,

    /// Deadline for a whole API request
    /// Default: 300 seconds
    pub request_timeout: Duration,

    /// Timeout for a single upstream HTTP call
    /// Default: 30 seconds
    pub http_timeout: Duration,

    /// Default lower TVL bound (USD) for pool listings
    /// Default: 10,000
    pub min_tvl: f64,

    /// Default upper TVL bound (USD) for pool listings
    /// Default: 10,000,000,000
    pub max_tvl: f64,

    /// Spacing of pool snapshots. The fee window is extended by this much past
    /// the window end so that the snapshot taken at the end is included.
    /// Default: 1 day
    pub snapshot_cadence: Duration,

    /// Networks skipped by batch runs unless requested explicitly
    /// Default: Sepolia, Goerli
    pub excluded_networks: Vec<Network>,

    /// Longest accepted `startAt..endAt` range, in days
    /// Default: 366
    pub max_range_days: i64,

    /// Port for the HTTP API
    /// Default: 3000
    pub api_port: u16,
}

impl Default for AprConfig {
    fn default() -> Self {
        Self::with_common_defaults()
    }
}

impl AprConfig {
    /// Config pointing at the public endpoints for every network.
    pub fn with_common_defaults() -> Self {
        let mut config = Self::minimal();
        for network in Network::ALL {
            config.set_subgraph_url(network, constants::endpoints::subgraph(network));
        }
        config
    }

    /// Config with no subgraphs configured.
    ///
    /// Suitable for tests, which register only the networks they exercise.
    pub fn minimal() -> Self {
        Self {
            subgraph_urls: HashMap::new(),
            defillama_url: constants::endpoints::DEFILLAMA_COINS.to_string(),
            rpc_url: constants::endpoints::MAINNET_RPC.to_string(),
            gauges_source: GaugeSource::Url(constants::endpoints::VOTING_GAUGES.to_string()),
            page_size: PageSize::default(),
            max_concurrency: 16,
            request_timeout: Duration::from_secs(300),
            http_timeout: Duration::from_secs(30),
            min_tvl: 10_000.0,
            max_tvl: 10_000_000_000.0,
            snapshot_cadence: Duration::from_secs(86_400),
            excluded_networks: vec![Network::Sepolia, Network::Goerli],
            max_range_days: 366,
            api_port: 3000,
        }
    }

    /// Loads `.env` (if present) and applies environment overrides on top of
    /// [`AprConfig::with_common_defaults`].
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    /// Applies overrides from `lookup`.
    ///
    /// Recognized keys: `API_PORT`, `RPC_URL`, `DEFILLAMA_URL`,
    /// `GAUGES_SOURCE`, `SUBGRAPH_URL_<NETWORK>` (e.g. `SUBGRAPH_URL_POLYGON`),
    /// `MAX_CONCURRENCY`, `REQUEST_TIMEOUT_SECS`, `HTTP_TIMEOUT_SECS`,
    /// `PAGE_SIZE`, `SNAPSHOT_CADENCE_SECS`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = AprConfigBuilder::with_defaults();

        if let Some(port) = parse_var(&lookup, "API_PORT")? {
            builder = builder.api_port(port);
        }
        if let Some(url) = lookup("RPC_URL") {
            builder = builder.rpc_url(url);
        }
        if let Some(url) = lookup("DEFILLAMA_URL") {
            builder = builder.defillama_url(url);
        }
        if let Some(source) = lookup("GAUGES_SOURCE") {
            builder = builder.gauges_source(GaugeSource::parse(&source));
        }
        for network in Network::ALL {
            let key = format!("SUBGRAPH_URL_{}", network.slug().to_ascii_uppercase());
            if let Some(url) = lookup(&key) {
                builder = builder.subgraph_url(network, url);
            }
        }
        if let Some(max) = parse_var::<usize, _>(&lookup, "MAX_CONCURRENCY")? {
            if max == 0 {
                return Err(ConfigError::invalid_value("MAX_CONCURRENCY", "0", "must be positive"));
            }
            builder = builder.max_concurrency(max);
        }
        if let Some(secs) = parse_var(&lookup, "REQUEST_TIMEOUT_SECS")? {
            builder = builder.request_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = parse_var(&lookup, "HTTP_TIMEOUT_SECS")? {
            builder = builder.http_timeout(Duration::from_secs(secs));
        }
        if let Some(size) = parse_var::<u32, _>(&lookup, "PAGE_SIZE")? {
            let page_size = PageSize::new(size)
                .ok_or_else(|| ConfigError::invalid_value("PAGE_SIZE", size.to_string(), "must be 1..=1000"))?;
            builder = builder.page_size(page_size);
        }
        if let Some(secs) = parse_var(&lookup, "SNAPSHOT_CADENCE_SECS")? {
            builder = builder.snapshot_cadence(Duration::from_secs(secs));
        }

        Ok(builder.build())
    }

    /// Subgraph URL for a network, if configured
    pub fn subgraph_url(&self, network: Network) -> Option<&str> {
        self.subgraph_urls.get(&network).map(String::as_str)
    }

    pub fn set_subgraph_url(&mut self, network: Network, url: impl Into<String>) {
        self.subgraph_urls.insert(network, url.into());
    }

    /// Networks a batch run covers when no network is requested: every
    /// configured network that is not excluded, in [`Network::ALL`] order.
    pub fn batch_networks(&self) -> Vec<Network> {
        Network::ALL
            .into_iter()
            .filter(|n| self.subgraph_urls.contains_key(n) && !self.excluded_networks.contains(n))
            .collect()
    }

    /// Snapshot cadence in whole seconds
    pub fn snapshot_cadence_secs(&self) -> i64 {
        i64::try_from(self.snapshot_cadence.as_secs()).unwrap_or(i64::MAX)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::invalid_value(key, raw.clone(), e)),
    }
}

/// Builder for [`AprConfig`]
///
/// # Example
///
/// ```rust
/// use aprscan::{AprConfigBuilder, Network};
///
/// let config = AprConfigBuilder::new()
///     .subgraph_url(Network::Ethereum, "http://localhost:8000/subgraphs/name/balancer")
///     .max_concurrency(2)
///     .build();
/// assert_eq!(config.batch_networks(), vec![Network::Ethereum]);
/// ```
#[derive(Debug, Clone)]
pub struct AprConfigBuilder {
    config: AprConfig,
}

impl Default for AprConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AprConfigBuilder {
    /// Create a new builder from [`AprConfig::minimal`]
    pub fn new() -> Self {
        Self {
            config: AprConfig::minimal(),
        }
    }

    /// Start from [`AprConfig::with_common_defaults`]
    pub fn with_defaults() -> Self {
        Self {
            config: AprConfig::with_common_defaults(),
        }
    }

    pub fn subgraph_url(mut self, network: Network, url: impl Into<String>) -> Self {
        self.config.set_subgraph_url(network, url);
        self
    }

    pub fn defillama_url(mut self, url: impl Into<String>) -> Self {
        self.config.defillama_url = url.into();
        self
    }

    pub fn rpc_url(mut self, url: impl Into<String>) -> Self {
        self.config.rpc_url = url.into();
        self
    }

    pub fn gauges_source(mut self, source: GaugeSource) -> Self {
        self.config.gauges_source = source;
        self
    }

    pub fn page_size(mut self, page_size: PageSize) -> Self {
        self.config.page_size = page_size;
        self
    }

    pub fn max_concurrency(mut self, max: usize) -> Self {
        self.config.max_concurrency = max.max(1);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.config.http_timeout = timeout;
        self
    }

    /// Default TVL bounds for pool listings
    pub fn tvl_range(mut self, min: f64, max: f64) -> Self {
        self.config.min_tvl = min;
        self.config.max_tvl = max;
        self
    }

    pub fn snapshot_cadence(mut self, cadence: Duration) -> Self {
        self.config.snapshot_cadence = cadence;
        self
    }

    pub fn exclude_network(mut self, network: Network) -> Self {
        if !self.config.excluded_networks.contains(&network) {
            self.config.excluded_networks.push(network);
        }
        self
    }

    pub fn include_network(mut self, network: Network) -> Self {
        self.config.excluded_networks.retain(|n| *n != network);
        self
    }

    pub fn max_range_days(mut self, days: i64) -> Self {
        self.config.max_range_days = days;
        self
    }

    pub fn api_port(mut self, port: u16) -> Self {
        self.config.api_port = port;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> AprConfig {
        self.config
    }
}
