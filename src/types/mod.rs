// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Domain types shared across the calculators, sources and the HTTP surface.
//!
//! - [`network`]: Balancer deployments and their identifiers
//! - [`pool`]: pool metadata and snapshots
//! - [`stats`]: APR breakdowns and pool stats records
//! - [`decimal`]: serde helpers for decimal strings

pub mod decimal;
pub mod network;
pub mod pool;
pub mod stats;
