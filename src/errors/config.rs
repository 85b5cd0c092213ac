// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for configuration loading.

/// Errors that can occur while building an [`crate::AprConfig`] from the
/// environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable is set but cannot be parsed.
    #[error("Invalid value '{value}' for {key}: {details}")]
    InvalidValue {
        key: String,
        value: String,
        details: String,
    },

    /// A required value is missing.
    #[error("Missing required setting {key}")]
    Missing { key: String },
}

impl ConfigError {
    pub fn invalid_value(
        key: impl Into<String>,
        value: impl Into<String>,
        details: impl ToString,
    ) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            value: value.into(),
            details: details.to_string(),
        }
    }

    pub fn missing(key: impl Into<String>) -> Self {
        ConfigError::Missing { key: key.into() }
    }
}
