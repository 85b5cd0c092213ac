// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the aprscan library.
//!
//! Follows a hybrid approach:
//!
//! - **Module-specific errors** for fine-grained handling ([`RoundError`],
//!   [`FetchError`], [`QueryError`], [`ConfigError`])
//! - **Unified error type** ([`AprError`]) for entry points that combine
//!   several sources
//!
//! Two conditions are deliberately *not* errors: a veBAL APR that cannot be
//! computed is reported as the `-1` sentinel inside the record, and a fee APR
//! that does not evaluate to a finite number is reported as `0`.
//!
//! # Examples
//!
//! ```rust,ignore
//! use aprscan::{AprError, FetchError, Round};
//!
//! match calculator.calculate_round_stats(&cache, "52", pool_id).await {
//!     Ok(stats) => println!("{:.2}%", stats.apr.total),
//!     Err(AprError::Round(e)) => eprintln!("bad round: {e}"),
//!     Err(AprError::Fetch(FetchError::Status { status, .. })) if status == 429 => {
//!         eprintln!("rate limited, retry later");
//!     }
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```

mod config;
mod fetch;
mod query;
mod round;

pub use config::ConfigError;
pub use fetch::FetchError;
pub use query::{FieldIssue, QueryError};
pub use round::RoundError;

/// Unified error type for all aprscan operations.
///
/// All module-specific error types convert to `AprError` via `From`, so `?`
/// propagates naturally across module boundaries.
#[derive(Debug, thiserror::Error)]
pub enum AprError {
    /// Round or window resolution failed.
    #[error("Round error: {0}")]
    Round(#[from] RoundError),

    /// An upstream source (subgraph, price API, RPC) failed.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Request parameters were rejected.
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// Invalid configuration.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The pool id is unknown to both the gauge registry and the subgraph.
    #[error("Unknown pool {pool_id}")]
    UnknownPool {
        /// The requested pool id
        pool_id: String,
    },
}

impl AprError {
    pub fn unknown_pool(pool_id: impl Into<String>) -> Self {
        AprError::UnknownPool {
            pool_id: pool_id.into(),
        }
    }
}
