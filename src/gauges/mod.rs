// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Gauge voting weights.
//!
//! A pool earns veBAL emissions in proportion to the share of gauge votes its
//! gauge received. [`GaugeRegistry`] maps pools to gauges using the Balancer
//! voting-gauge list, and [`GaugeControllerClient`] reads the share from the
//! mainnet GaugeController.

use async_trait::async_trait;

use crate::errors::FetchError;
use crate::rounds::UnixTimestamp;

mod controller;
mod registry;

pub use controller::{wad_to_f64, GaugeControllerClient};
pub use registry::{GaugePool, GaugeRegistry, VotingGauge};

/// Share of gauge votes a pool received, in `[0, 1]`.
#[async_trait]
pub trait RelativeWeightSource: Send + Sync {
    /// Pools without a gauge have a weight of `0`.
    async fn relative_weight(&self, pool_id: &str, timestamp: UnixTimestamp)
        -> Result<f64, FetchError>;
}
