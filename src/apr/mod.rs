// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! APR component calculators.
//!
//! - [`fee`]: swap fee APR from the first and last snapshot of a fee window
//! - [`emissions`]: veBAL APR from weekly emissions, voting share and price
//!
//! Both are pure functions over already-fetched inputs. Values that cannot be
//! computed are expressed in-band: a non-finite fee APR becomes `0` and a
//! veBAL APR with missing inputs becomes the `-1` sentinel.

pub mod emissions;
pub mod fee;

pub use emissions::calculate_vebal_apr;
pub use fee::{fee_apr_between, FeeWindowStats};

pub const WEEKS_IN_YEAR: f64 = 52.0;
pub const SECONDS_IN_DAY: i64 = 86_400;
pub const SECONDS_IN_YEAR: i64 = 365 * SECONDS_IN_DAY;

/// Maps NaN and infinities to `0`.
pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
