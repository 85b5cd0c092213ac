// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for request parameter validation.

use serde::Serialize;

/// One rejected parameter, reported in the `details` of a 400 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{field}: {message}")]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Re-labels the issue with the name of the parameter it came from.
    pub fn for_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }
}

/// Errors raised while validating APR query parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    /// One or more parameters failed validation.
    #[error("Invalid query parameters")]
    InvalidParameters {
        /// Every issue found, not only the first
        issues: Vec<FieldIssue>,
    },

    /// Neither a date range nor a round was requested.
    #[error("A date range (startAt and endAt) or a roundId is required")]
    MissingRange,
}

impl QueryError {
    pub fn invalid(issues: Vec<FieldIssue>) -> Self {
        QueryError::InvalidParameters { issues }
    }

    /// The per-field details for the error response body.
    pub fn issues(&self) -> Vec<FieldIssue> {
        match self {
            QueryError::InvalidParameters { issues } => issues.clone(),
            QueryError::MissingRange => vec![FieldIssue::new(
                "startAt",
                "startAt and endAt are required when roundId is absent",
            )],
        }
    }
}
