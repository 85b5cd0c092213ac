// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Span creation helpers for aprscan operations.
//!
//! Telemetry concerns are kept apart from business logic: instead of
//! `#[instrument]` attributes, each instrumented operation has a span helper
//! here, and the operation attaches it to its future.
//!
//! Usage pattern:
//! ```rust,ignore
//! pub async fn my_operation(&self, param: Type) -> Result<T> {
//!     let span = spans::my_operation(param_value);
//!     async move {
//!         // Business logic here
//!     }
//!     .instrument(span)
//!     .await
//! }
//! ```

use alloy_primitives::Address;
use chrono::NaiveDate;
use tracing::{Level, Span};

use crate::rounds::UnixTimestamp;
use crate::types::network::Network;

/// Create span for handling one APR API request.
///
/// Parent: None (root span for this operation)
/// Children: fetch_data_for_date_range / fetch_data_for_pool_date_range /
/// fetch_data_for_round spans
#[inline]
pub(crate) fn handle_apr_request(mode: &'static str) -> Span {
    tracing::info_span!("aprscan.handle_apr_request", mode = mode)
}

/// Create span for a batch over every listed pool and every day of a range.
///
/// Parent: handle_apr_request span
/// Children: list_pools spans (one per network), calculate_pool_stats spans
#[inline]
pub(crate) fn fetch_data_for_date_range(start: NaiveDate, end: NaiveDate) -> Span {
    tracing::info_span!(
        "aprscan.fetch_data_for_date_range",
        start = %start,
        end = %end,
    )
}

/// Create span for one pool over every day of a range.
///
/// Parent: handle_apr_request span
/// Children: calculate_pool_stats spans (one per day)
#[inline]
pub(crate) fn fetch_data_for_pool_date_range(
    pool_id: &str,
    network: Network,
    start: NaiveDate,
    end: NaiveDate,
) -> Span {
    tracing::info_span!(
        "aprscan.fetch_data_for_pool_date_range",
        pool_id = pool_id,
        network = %network,
        start = %start,
        end = %end,
    )
}

/// Create span for every registry gauge over one round.
///
/// Parent: handle_apr_request span
/// Children: calculate_pool_stats spans (one per gauge)
#[inline]
pub(crate) fn fetch_data_for_round(round_id: u32) -> Span {
    tracing::info_span!("aprscan.fetch_data_for_round", round_id = round_id)
}

/// Create span for computing the stats of one pool over one window.
///
/// Parent: a batch span, or None for direct callers
/// Children: fetch_snapshots, fetch_price, relative_weight spans
#[inline]
pub(crate) fn calculate_pool_stats(pool_id: &str, network: Network, window: &str) -> Span {
    tracing::debug_span!(
        "aprscan.calculate_pool_stats",
        pool_id = pool_id,
        chain_id = network.chain_id(),
        window = window,
    )
}

/// Create span for listing the pools of a network at a block.
///
/// Parent: fetch_data_for_date_range span
/// Children: subgraph page requests
#[inline]
pub(crate) fn list_pools(network: Network, created_before: UnixTimestamp) -> Span {
    tracing::debug_span!(
        "aprscan.list_pools",
        network = %network,
        created_before = created_before.0,
    )
}

/// Create span for fetching the snapshots of a pool in a time range.
///
/// Parent: calculate_pool_stats span
/// Children: subgraph page requests
#[inline]
pub(crate) fn fetch_snapshots(
    network: Network,
    pool_id: &str,
    from: UnixTimestamp,
    to: UnixTimestamp,
) -> Span {
    tracing::trace_span!(
        "aprscan.fetch_snapshots",
        network = %network,
        pool_id = pool_id,
        from = from.0,
        to = to.0,
    )
}

/// Create span for a historical price lookup.
///
/// Parent: calculate_pool_stats span
/// Children: None
#[inline]
pub(crate) fn fetch_price(coin: &str, timestamp: UnixTimestamp) -> Span {
    tracing::span!(
        Level::DEBUG,
        "aprscan.fetch_price",
        coin = coin,
        timestamp = timestamp.0,
    )
}

/// Create span for a block-at-timestamp lookup.
///
/// Parent: list_pools span
/// Children: None
#[inline]
pub(crate) fn fetch_block(network: Network, timestamp: UnixTimestamp) -> Span {
    tracing::debug_span!(
        "aprscan.fetch_block",
        network = %network,
        timestamp = timestamp.0,
    )
}

/// Create span for a GaugeController relative weight read.
///
/// Parent: calculate_pool_stats span
/// Children: eth_call
#[inline]
pub(crate) fn relative_weight(gauge: Address, timestamp: UnixTimestamp) -> Span {
    tracing::debug_span!(
        "aprscan.relative_weight",
        gauge = %gauge,
        timestamp = timestamp.0,
    )
}

/// Create span for loading the voting-gauge list.
///
/// Parent: None (startup)
/// Children: None
#[inline]
pub(crate) fn load_gauges(source: &str) -> Span {
    tracing::info_span!("aprscan.load_gauges", source = source)
}
