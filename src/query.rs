// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! APR request parameters.
//!
//! [`AprQuery::from_params`] validates the `/apr/api` query string and decides
//! which kind of request it is. Every invalid parameter is reported, not only
//! the first one found.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::str::FromStr;

use crate::errors::{FieldIssue, QueryError};
use crate::pipeline::{PipelineOptions, PoolStatsFilter};
use crate::rounds::{parse_query_date, Round};
use crate::stats::DateRangeQuery;
use crate::types::network::Network;
use crate::types::pool::PoolType;

/// What data a request asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum AprRequest {
    /// One pool, one record per day of `[start, end]`
    PoolDateRange {
        pool_id: String,
        network: Option<Network>,
        start: NaiveDate,
        end: NaiveDate,
    },
    /// Every listed pool, one record per pool per day of `[start, end]`
    DateRange {
        start: NaiveDate,
        end: NaiveDate,
        query: DateRangeQuery,
    },
    /// One pool, or every registry gauge, over a voting round
    Round {
        round: Round,
        pool_id: Option<String>,
        networks: Vec<Network>,
    },
}

impl AprRequest {
    pub fn mode(&self) -> &'static str {
        match self {
            AprRequest::PoolDateRange { .. } => "pool_date_range",
            AprRequest::DateRange { .. } => "date_range",
            AprRequest::Round { pool_id: Some(_), .. } => "pool_round",
            AprRequest::Round { pool_id: None, .. } => "round",
        }
    }
}

/// A validated `/apr/api` request.
#[derive(Debug, Clone, PartialEq)]
pub struct AprQuery {
    pub request: AprRequest,
    pub options: PipelineOptions,
}

/// Collects issues while reading parameters.
struct Params<'a> {
    values: &'a HashMap<String, String>,
    issues: Vec<FieldIssue>,
}

impl<'a> Params<'a> {
    /// A present, non-blank value.
    fn raw(&self, key: &str) -> Option<&'a str> {
        self.values
            .get(key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    fn parse<T, F>(&mut self, key: &str, parse: F) -> Option<T>
    where
        F: FnOnce(&str) -> Result<T, FieldIssue>,
    {
        let raw = self.raw(key)?;
        match parse(raw) {
            Ok(value) => Some(value),
            Err(issue) => {
                self.issues.push(issue.for_field(key));
                None
            }
        }
    }

    fn number<T: FromStr>(&mut self, key: &str, expected: &str) -> Option<T> {
        self.parse(key, |raw| {
            raw.parse::<T>()
                .map_err(|_| FieldIssue::new(key, format!("expected {expected}, got '{raw}'")))
        })
    }

    fn finite(&mut self, key: &str) -> Option<f64> {
        self.parse(key, |raw| {
            raw.parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| FieldIssue::new(key, format!("expected a number, got '{raw}'")))
        })
    }

    fn list<T, F>(&mut self, key: &str, parse: F) -> Vec<T>
    where
        F: Fn(&str) -> Result<T, FieldIssue>,
    {
        self.parse(key, |raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(&parse)
                .collect::<Result<Vec<_>, _>>()
        })
        .unwrap_or_default()
    }

    fn issue(&mut self, field: &str, message: impl Into<String>) {
        self.issues.push(FieldIssue::new(field, message));
    }
}

fn parse_pool_id(raw: &str) -> Result<String, FieldIssue> {
    let hex = raw.strip_prefix("0x").unwrap_or_default();
    if hex.len() != 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(FieldIssue::new(
            "poolId",
            "expected a 0x-prefixed 32 byte hex pool id",
        ));
    }
    Ok(raw.to_ascii_lowercase())
}

impl AprQuery {
    /// Validates query parameters.
    ///
    /// `max_range_days` bounds the number of days a date range may cover.
    pub fn from_params(
        values: &HashMap<String, String>,
        max_range_days: i64,
    ) -> Result<Self, QueryError> {
        let mut params = Params {
            values,
            issues: Vec::new(),
        };

        let pool_id = params.parse("poolId", parse_pool_id);
        let round = params.parse("roundId", |raw| {
            raw.parse::<Round>()
                .map_err(|e| FieldIssue::new("roundId", e.to_string()))
        });
        let start = params.parse("startAt", parse_query_date);
        let end = params.parse("endAt", parse_query_date);
        let networks = params.list("network", Network::from_str);

        let options = PipelineOptions {
            filter: PoolStatsFilter {
                min_tvl: params.finite("minTVL"),
                max_tvl: params.finite("maxTVL"),
                min_apr: params.finite("minAPR"),
                max_apr: params.finite("maxAPR"),
                tokens: params.list("tokens", |token| Ok(token.to_string())),
                types: params.list("type", PoolType::from_str),
                networks: networks.clone(),
            },
            sort: params.parse("sort", str::parse).unwrap_or_default(),
            order: params.parse("order", str::parse).unwrap_or_default(),
            offset: params.number("offset", "a non-negative integer").unwrap_or(0),
            limit: params.number("limit", "a non-negative integer"),
        };

        let has_start = params.raw("startAt").is_some();
        let has_end = params.raw("endAt").is_some();
        let has_round = params.raw("roundId").is_some();

        if has_round && (has_start || has_end) {
            params.issue("roundId", "cannot be combined with startAt/endAt");
        }
        if !has_round && has_start != has_end {
            let missing = if has_start { "endAt" } else { "startAt" };
            params.issue(missing, "startAt and endAt must be given together");
        }
        if let (Some(start), Some(end)) = (start, end) {
            let days = (end - start).num_days() + 1;
            if days < 1 {
                params.issue("endAt", "must not be before startAt");
            } else if days > max_range_days {
                params.issue(
                    "endAt",
                    format!("range covers {days} days, at most {max_range_days} allowed"),
                );
            }
        }
        if pool_id.is_some() && networks.len() > 1 {
            params.issue("network", "a single network is expected with poolId");
        }

        if !params.issues.is_empty() {
            return Err(QueryError::invalid(params.issues));
        }

        let request = match (round, start, end) {
            (Some(round), _, _) => AprRequest::Round {
                round,
                pool_id,
                networks,
            },
            (None, Some(start), Some(end)) => match pool_id {
                Some(pool_id) => AprRequest::PoolDateRange {
                    pool_id,
                    network: networks.first().copied(),
                    start,
                    end,
                },
                None => AprRequest::DateRange {
                    start,
                    end,
                    query: DateRangeQuery {
                        networks,
                        min_tvl: options.filter.min_tvl,
                        max_tvl: options.filter.max_tvl,
                        tokens: options.filter.tokens.clone(),
                    },
                },
            },
            _ => return Err(QueryError::MissingRange),
        };

        Ok(Self { request, options })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{Order, SortKey};

    const POOL: &str = "0x5c6ee304399dbdb9c8ef030ab642b10820db8f56000200000000000000000014";

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_range_with_defaults() {
        let query = AprQuery::from_params(
            &params(&[("startAt", "2023-06-01"), ("endAt", "2023-06-07")]),
            366,
        )
        .unwrap();

        assert_eq!(
            query.request,
            AprRequest::DateRange {
                start: date(2023, 6, 1),
                end: date(2023, 6, 7),
                query: DateRangeQuery::default(),
            }
        );
        assert_eq!(query.options.sort, SortKey::AprTotal);
        assert_eq!(query.options.order, Order::Desc);
        assert_eq!(query.options.offset, 0);
        assert_eq!(query.options.limit, None);
    }

    #[test]
    fn pool_date_range_accepts_us_dates() {
        let upper = POOL.to_uppercase().replace("0X", "0x");
        let query = AprQuery::from_params(
            &params(&[
                ("poolId", upper.as_str()),
                ("startAt", "06/01/2023"),
                ("endAt", "06/02/2023"),
                ("network", "polygon"),
            ]),
            366,
        )
        .unwrap();

        assert_eq!(
            query.request,
            AprRequest::PoolDateRange {
                pool_id: POOL.to_string(),
                network: Some(Network::Polygon),
                start: date(2023, 6, 1),
                end: date(2023, 6, 2),
            }
        );
        assert_eq!(query.request.mode(), "pool_date_range");
    }

    #[test]
    fn round_request() {
        let query = AprQuery::from_params(&params(&[("roundId", "1"), ("network", "1,137")]), 366)
            .unwrap();
        match query.request {
            AprRequest::Round {
                round,
                pool_id,
                networks,
            } => {
                assert_eq!(round.id, 1);
                assert!(pool_id.is_none());
                assert_eq!(networks, vec![Network::Ethereum, Network::Polygon]);
            }
            other => panic!("unexpected request {other:?}"),
        }
    }

    #[test]
    fn pipeline_options_are_parsed() {
        let query = AprQuery::from_params(
            &params(&[
                ("startAt", "2023-06-01"),
                ("endAt", "2023-06-01"),
                ("sort", "tvl"),
                ("order", "asc"),
                ("limit", "10"),
                ("offset", "20"),
                ("minTVL", "1000"),
                ("maxAPR", "250.5"),
                ("tokens", "BAL, WETH"),
                ("type", "WEIGHTED,ComposableStable"),
            ]),
            366,
        )
        .unwrap();

        let options = &query.options;
        assert_eq!(options.sort, SortKey::Tvl);
        assert_eq!(options.order, Order::Asc);
        assert_eq!(options.limit, Some(10));
        assert_eq!(options.offset, 20);
        assert_eq!(options.filter.min_tvl, Some(1000.0));
        assert_eq!(options.filter.max_apr, Some(250.5));
        assert_eq!(options.filter.tokens, vec!["BAL", "WETH"]);
        assert_eq!(
            options.filter.types,
            vec![PoolType::Weighted, PoolType::PhantomStable]
        );

        match &query.request {
            AprRequest::DateRange { query, .. } => {
                assert_eq!(query.min_tvl, Some(1000.0));
                assert_eq!(query.tokens, vec!["BAL", "WETH"]);
            }
            other => panic!("unexpected request {other:?}"),
        }
    }

    #[test]
    fn every_issue_is_reported() {
        let err = AprQuery::from_params(
            &params(&[
                ("poolId", "0x1234"),
                ("startAt", "yesterday"),
                ("endAt", "2023-06-01"),
                ("limit", "-1"),
                ("sort", "color"),
                ("network", "solana"),
            ]),
            366,
        )
        .unwrap_err();

        let fields: Vec<_> = err.issues().into_iter().map(|i| i.field).collect();
        for field in ["poolId", "startAt", "limit", "sort", "network"] {
            assert!(fields.contains(&field.to_string()), "missing issue for {field}");
        }
    }

    #[test]
    fn range_must_be_ordered_and_bounded() {
        let err = AprQuery::from_params(
            &params(&[("startAt", "2023-06-02"), ("endAt", "2023-06-01")]),
            366,
        )
        .unwrap_err();
        assert_eq!(err.issues()[0].field, "endAt");

        let err = AprQuery::from_params(
            &params(&[("startAt", "2023-01-01"), ("endAt", "2023-12-31")]),
            30,
        )
        .unwrap_err();
        assert!(err.issues()[0].message.contains("365 days"));
    }

    #[test]
    fn half_a_range_is_rejected() {
        let err = AprQuery::from_params(&params(&[("startAt", "2023-06-01")]), 366).unwrap_err();
        assert_eq!(err.issues()[0].field, "endAt");
    }

    #[test]
    fn missing_range_and_round() {
        let err = AprQuery::from_params(&params(&[("poolId", POOL)]), 366).unwrap_err();
        assert_eq!(err, QueryError::MissingRange);
    }

    #[test]
    fn round_cannot_be_combined_with_dates() {
        let err = AprQuery::from_params(
            &params(&[("roundId", "1"), ("startAt", "2023-06-01"), ("endAt", "2023-06-02")]),
            366,
        )
        .unwrap_err();
        assert_eq!(err.issues()[0].field, "roundId");
    }
}
