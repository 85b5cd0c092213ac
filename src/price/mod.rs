// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Historical token prices and block lookups.
//!
//! The calculators need two time-indexed facts from outside the chain data:
//! the USD price of BAL when a window closes, and the block a network was at
//! when a date range ends (to list the pools that existed then). Both sit
//! behind traits so tests can substitute fixed data.
//!
//! [`DefiLlamaClient`] implements both over the DefiLlama coins API.
//!
//! # Example: A fixed price source
//!
//! ```rust
//! use aprscan::{FetchError, Network, PriceSource, UnixTimestamp};
//! use alloy_primitives::Address;
//! use async_trait::async_trait;
//!
//! struct FixedPrice(f64);
//!
//! #[async_trait]
//! impl PriceSource for FixedPrice {
//!     async fn price_at(
//!         &self,
//!         _network: Network,
//!         _token: Address,
//!         _timestamp: UnixTimestamp,
//!     ) -> Result<f64, FetchError> {
//!         Ok(self.0)
//!     }
//! }
//! ```

use alloy_primitives::Address;
use async_trait::async_trait;

use crate::errors::FetchError;
use crate::rounds::UnixTimestamp;
use crate::types::network::Network;

mod defillama;

pub use defillama::DefiLlamaClient;

/// USD price of a token at a point in time.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn price_at(
        &self,
        network: Network,
        token: Address,
        timestamp: UnixTimestamp,
    ) -> Result<f64, FetchError>;
}

/// Block height of a network at a point in time.
#[async_trait]
pub trait BlockSource: Send + Sync {
    /// The last block at or before `timestamp`.
    async fn block_at(&self, network: Network, timestamp: UnixTimestamp) -> Result<u64, FetchError>;
}
