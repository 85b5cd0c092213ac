// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use alloy_rpc_types::{TransactionInput, TransactionRequest};
use alloy_sol_types::{sol, SolCall};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, Instrument};

use super::{GaugeRegistry, RelativeWeightSource};
use crate::config::constants::contracts::GAUGE_CONTROLLER;
use crate::errors::FetchError;
use crate::rounds::UnixTimestamp;
use crate::tracing::spans;

sol! {
    function gauge_relative_weight(address addr, uint256 time) external view returns (uint256);
}

const WAD: f64 = 1e18;

/// Converts an 18-decimal fixed point value to `f64`.
///
/// Values beyond `u128` become infinite, which the emission calculator treats
/// as unusable.
pub fn wad_to_f64(value: U256) -> f64 {
    u128::try_from(value)
        .map(|small| small as f64 / WAD)
        .unwrap_or(f64::INFINITY)
}

/// Reads gauge voting shares from the veBAL GaugeController.
pub struct GaugeControllerClient<P> {
    provider: P,
    registry: Arc<GaugeRegistry>,
    controller: Address,
}

impl<P: Provider> GaugeControllerClient<P> {
    pub fn new(provider: P, registry: Arc<GaugeRegistry>) -> Self {
        Self {
            provider,
            registry,
            controller: GAUGE_CONTROLLER,
        }
    }

    pub fn with_controller(mut self, controller: Address) -> Self {
        self.controller = controller;
        self
    }

    /// `gauge_relative_weight(gauge, timestamp)` scaled to `[0, 1]`.
    pub async fn gauge_relative_weight(
        &self,
        gauge: Address,
        timestamp: UnixTimestamp,
    ) -> Result<f64, FetchError> {
        let call = gauge_relative_weightCall {
            addr: gauge,
            time: U256::from(timestamp.as_u64()),
        };
        let request = TransactionRequest::default()
            .to(self.controller)
            .input(TransactionInput::new(call.abi_encode().into()));

        async move {
            let output = self
                .provider
                .call(request)
                .await
                .map_err(|e| FetchError::rpc("gauge_relative_weight", e))?;
            let raw = gauge_relative_weightCall::abi_decode_returns(&output)
                .map_err(|e| FetchError::decode("gauge_relative_weight return", e))?;

            let weight = wad_to_f64(raw);
            debug!(weight, "Fetched gauge relative weight");
            Ok(weight)
        }
        .instrument(spans::relative_weight(gauge, timestamp))
        .await
    }
}

#[async_trait]
impl<P: Provider> RelativeWeightSource for GaugeControllerClient<P> {
    async fn relative_weight(
        &self,
        pool_id: &str,
        timestamp: UnixTimestamp,
    ) -> Result<f64, FetchError> {
        match self.registry.gauge_for_pool(pool_id) {
            Some(gauge) => self.gauge_relative_weight(gauge.address, timestamp).await,
            None => {
                debug!(pool_id, "Pool has no voting gauge");
                Ok(0.0)
            }
        }
    }
}
