// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for round and window resolution.

use chrono::NaiveDate;

use crate::rounds::UnixTimestamp;

/// Errors that can occur when resolving a round identifier, a date, or an
/// aggregation window.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoundError {
    /// The identifier is not a positive integer.
    #[error("Invalid round identifier '{value}'")]
    InvalidRound {
        /// The identifier as received
        value: String,
    },

    /// The round has not started yet.
    #[error("Round {round} has not started (current round is {current})")]
    RoundNotStarted {
        /// The requested round
        round: u32,
        /// The round in progress
        current: u32,
    },

    /// The date precedes the first voting round.
    #[error("{date} is before the first voting round")]
    BeforeFirstRound {
        /// The requested date
        date: NaiveDate,
    },

    /// A window whose end does not come after its start.
    #[error("Invalid window: start {start} is not before end {end}")]
    InvalidWindow {
        start: UnixTimestamp,
        end: UnixTimestamp,
    },
}

impl RoundError {
    pub fn invalid_round(value: impl Into<String>) -> Self {
        RoundError::InvalidRound {
            value: value.into(),
        }
    }

    pub fn not_started(round: u32, current: u32) -> Self {
        RoundError::RoundNotStarted { round, current }
    }

    pub fn before_first_round(date: NaiveDate) -> Self {
        RoundError::BeforeFirstRound { date }
    }

    pub fn invalid_window(start: UnixTimestamp, end: UnixTimestamp) -> Self {
        RoundError::InvalidWindow { start, end }
    }
}
