// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for upstream data sources.
//!
//! Covers the subgraph, the DefiLlama coins API, the gauge list and the
//! GaugeController RPC. Each variant names the service that failed so a unit
//! failure logged during a batch run can be traced back to its source.

use std::path::PathBuf;

use crate::types::network::Network;

/// Errors that can occur while fetching data from an upstream service.
///
/// # Examples
///
/// ```rust,ignore
/// use aprscan::{FetchError, SnapshotSource};
///
/// match source.snapshots_in_range(network, &pool_id, from, to).await {
///     Ok(snapshots) => println!("{} snapshots", snapshots.len()),
///     Err(FetchError::GraphQl { network, message }) => {
///         eprintln!("subgraph for {network} rejected the query: {message}");
///     }
///     Err(e) => eprintln!("{e}"),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transport-level failure (connect, TLS, timeout, body read).
    #[error("HTTP request to {service} failed")]
    Http {
        /// Logical name of the service (e.g. "subgraph", "defillama")
        service: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("{service} responded with status {status}: {body}")]
    Status {
        service: String,
        status: u16,
        /// Response body, truncated
        body: String,
    },

    /// The subgraph returned GraphQL errors.
    #[error("Subgraph query on {network} failed: {message}")]
    GraphQl { network: Network, message: String },

    /// The response carried no data where data was required.
    #[error("Empty response from {service}: {what}")]
    EmptyResponse { service: String, what: String },

    /// The response could not be decoded into the expected shape.
    #[error("Failed to decode {what}: {details}")]
    Decode { what: String, details: String },

    /// The price API had no price for the coin at the timestamp.
    #[error("No price for {coin} at {timestamp}")]
    MissingPrice { coin: String, timestamp: i64 },

    /// No subgraph is configured for the network.
    #[error("No subgraph configured for network {network}")]
    UnsupportedNetwork { network: Network },

    /// The GaugeController call failed.
    #[error("RPC call {operation} failed: {details}")]
    Rpc { operation: String, details: String },

    /// A configured URL could not be used.
    #[error("Invalid URL '{url}': {details}")]
    InvalidUrl { url: String, details: String },

    /// Reading a local file failed.
    #[error("Failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub fn http(service: impl Into<String>, source: reqwest::Error) -> Self {
        FetchError::Http {
            service: service.into(),
            source,
        }
    }

    pub fn status(service: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        let mut body = body.into();
        if body.len() > 512 {
            let mut cut = 512;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }
        FetchError::Status {
            service: service.into(),
            status,
            body,
        }
    }

    pub fn graphql(network: Network, message: impl Into<String>) -> Self {
        FetchError::GraphQl {
            network,
            message: message.into(),
        }
    }

    pub fn empty_response(service: impl Into<String>, what: impl Into<String>) -> Self {
        FetchError::EmptyResponse {
            service: service.into(),
            what: what.into(),
        }
    }

    pub fn decode(what: impl Into<String>, details: impl ToString) -> Self {
        FetchError::Decode {
            what: what.into(),
            details: details.to_string(),
        }
    }

    pub fn missing_price(coin: impl Into<String>, timestamp: i64) -> Self {
        FetchError::MissingPrice {
            coin: coin.into(),
            timestamp,
        }
    }

    pub fn unsupported_network(network: Network) -> Self {
        FetchError::UnsupportedNetwork { network }
    }

    pub fn rpc(operation: impl Into<String>, details: impl ToString) -> Self {
        FetchError::Rpc {
            operation: operation.into(),
            details: details.to_string(),
        }
    }

    pub fn invalid_url(url: impl Into<String>, details: impl ToString) -> Self {
        FetchError::InvalidUrl {
            url: url.into(),
            details: details.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FetchError::Io {
            path: path.into(),
            source,
        }
    }
}
