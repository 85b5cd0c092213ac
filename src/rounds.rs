// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Voting rounds and aggregation windows.
//!
//! veBAL gauge votes are tallied in weekly rounds. Round 1 starts on Thursday
//! 2022-04-14 00:00:00 UTC and every round lasts exactly seven days, so the
//! window of round `n` is `[first + 7(n-1) days, first + 7n days)`.
//!
//! APR is computed over an [`AprWindow`], which is either a whole round or a
//! single UTC day inside one.
//!
//! # Examples
//!
//! ```rust
//! use aprscan::{AprWindow, Round};
//! use chrono::NaiveDate;
//!
//! let round = Round::from_date(NaiveDate::from_ymd_opt(2022, 4, 20).unwrap()).unwrap();
//! assert_eq!(round.id, 1);
//!
//! let window = AprWindow::for_round(&round);
//! assert_eq!(window.end.0 - window.start.0, 7 * 86_400);
//! ```

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{FieldIssue, RoundError};

/// Unix timestamp in seconds (always UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnixTimestamp(pub i64);

impl UnixTimestamp {
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp())
    }

    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Converts to u64 for use with on-chain timestamps
    pub fn as_u64(&self) -> u64 {
        self.0.max(0) as u64
    }

    pub fn add_seconds(&self, seconds: i64) -> Self {
        Self(self.0.saturating_add(seconds))
    }
}

impl fmt::Display for UnixTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Start of round 1: 2022-04-14T00:00:00Z.
pub const FIRST_ROUND_START: UnixTimestamp = UnixTimestamp(1_649_894_400);

/// Length of a voting round in seconds.
pub const ROUND_DURATION_SECS: i64 = 7 * 86_400;

/// A weekly veBAL voting round, `[start_date, end_date)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub id: u32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl Round {
    fn first_start() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(FIRST_ROUND_START.0)
    }

    /// Builds round `id` without checking it against the clock.
    fn nth(id: u32) -> Self {
        let start_date =
            Self::first_start() + TimeDelta::seconds(ROUND_DURATION_SECS * (i64::from(id) - 1));
        Self {
            id,
            start_date,
            end_date: start_date + TimeDelta::seconds(ROUND_DURATION_SECS),
        }
    }

    /// Resolves a round number, rejecting rounds that have not started.
    pub fn from_number(id: u32) -> Result<Self, RoundError> {
        Self::from_number_at(id, Utc::now())
    }

    /// Like [`Round::from_number`] with an explicit clock.
    pub fn from_number_at(id: u32, now: DateTime<Utc>) -> Result<Self, RoundError> {
        if id == 0 {
            return Err(RoundError::invalid_round(id.to_string()));
        }
        let current = Self::at(now)?;
        if id > current.id {
            return Err(RoundError::not_started(id, current.id));
        }
        Ok(Self::nth(id))
    }

    /// The round in progress at `instant`.
    pub fn at(instant: DateTime<Utc>) -> Result<Self, RoundError> {
        let elapsed = instant.timestamp() - FIRST_ROUND_START.0;
        if elapsed < 0 {
            return Err(RoundError::before_first_round(instant.date_naive()));
        }
        let index = elapsed / ROUND_DURATION_SECS;
        let id = u32::try_from(index + 1)
            .map_err(|_| RoundError::invalid_round((index + 1).to_string()))?;
        Ok(Self::nth(id))
    }

    /// The round containing the given UTC day.
    pub fn from_date(date: NaiveDate) -> Result<Self, RoundError> {
        Self::at(date.and_time(NaiveTime::MIN).and_utc())
    }

    pub fn current() -> Result<Self, RoundError> {
        Self::at(Utc::now())
    }

    /// The seven UTC dates of the round, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let first = self.start_date.date_naive();
        first.iter_days().take(7)
    }

    pub fn start(&self) -> UnixTimestamp {
        UnixTimestamp::from_datetime(self.start_date)
    }

    pub fn end(&self) -> UnixTimestamp {
        UnixTimestamp::from_datetime(self.end_date)
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl FromStr for Round {
    type Err = RoundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let id = trimmed
            .parse::<u32>()
            .map_err(|_| RoundError::invalid_round(trimmed))?;
        Self::from_number(id)
    }
}

/// The time window a single pool stats record is computed over.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AprWindow {
    /// Round id for round windows, `YYYY-MM-DD` for day windows
    pub label: String,
    /// Round the window belongs to
    pub round_id: u32,
    pub start: UnixTimestamp,
    /// Exclusive
    pub end: UnixTimestamp,
}

impl AprWindow {
    pub fn new(
        label: impl Into<String>,
        round_id: u32,
        start: UnixTimestamp,
        end: UnixTimestamp,
    ) -> Result<Self, RoundError> {
        if start >= end {
            return Err(RoundError::invalid_window(start, end));
        }
        Ok(Self {
            label: label.into(),
            round_id,
            start,
            end,
        })
    }

    pub fn for_round(round: &Round) -> Self {
        Self {
            label: round.id.to_string(),
            round_id: round.id,
            start: round.start(),
            end: round.end(),
        }
    }

    /// A single UTC day. Days before round 1 have no round to report under.
    pub fn for_day(date: NaiveDate) -> Result<Self, RoundError> {
        let round = Round::from_date(date)?;
        let start = UnixTimestamp::from_datetime(date.and_time(NaiveTime::MIN).and_utc());
        Ok(Self {
            label: date.format("%Y-%m-%d").to_string(),
            round_id: round.id,
            start,
            end: start.add_seconds(86_400),
        })
    }

    pub fn duration_secs(&self) -> i64 {
        self.end.0 - self.start.0
    }
}

impl fmt::Display for AprWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}, {})", self.label, self.start, self.end)
    }
}

/// Parses a query date, `YYYY-MM-DD` or `MM/DD/YYYY`.
pub fn parse_query_date(value: &str) -> Result<NaiveDate, FieldIssue> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%m/%d/%Y"))
        .map_err(|_| FieldIssue::new("date", format!("'{trimmed}' is not a valid date")))
}

/// Every date in `[start, end]`. Empty when `end < start`.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day <= end)
}
