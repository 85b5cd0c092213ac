// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Serde helpers for decimal values.
//!
//! The Balancer subgraph encodes `BigDecimal` fields as JSON strings, and the
//! voting-gauge list mixes strings, numbers and `null` for token weights.

use serde::de::{Deserializer, Error as _};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum DecimalRepr {
    Text(String),
    Number(f64),
}

/// Deserializes a decimal encoded as a string or number into `f64`.
pub fn deserialize_decimal_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match DecimalRepr::deserialize(deserializer)? {
        DecimalRepr::Text(text) => text.trim().parse::<f64>().map_err(D::Error::custom),
        DecimalRepr::Number(value) => Ok(value),
    }
}

/// Lenient variant for optional decimals: `null`, missing and unparsable
/// values all become `None`.
pub fn deserialize_optional_decimal_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let repr = Option::<DecimalRepr>::deserialize(deserializer)?;
    Ok(match repr {
        Some(DecimalRepr::Text(text)) => text.trim().parse::<f64>().ok(),
        Some(DecimalRepr::Number(value)) => Some(value),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(deserialize_with = "deserialize_decimal_f64")]
        value: f64,
        #[serde(default, deserialize_with = "deserialize_optional_decimal_f64")]
        weight: Option<f64>,
    }

    #[test]
    fn parses_string_and_number_decimals() {
        let row: Row = serde_json::from_value(json!({ "value": "156588648.02037278" })).unwrap();
        assert!((row.value - 156_588_648.020_372_78).abs() < 1e-6);
        assert_eq!(row.weight, None);

        let row: Row = serde_json::from_value(json!({ "value": 12.5, "weight": "0.8" })).unwrap();
        assert_eq!(row.value, 12.5);
        assert_eq!(row.weight, Some(0.8));
    }

    #[test]
    fn optional_weight_tolerates_null_and_garbage() {
        let row: Row = serde_json::from_value(json!({ "value": "1", "weight": null })).unwrap();
        assert_eq!(row.weight, None);

        let row: Row = serde_json::from_value(json!({ "value": "1", "weight": "n/a" })).unwrap();
        assert_eq!(row.weight, None);
    }

    #[test]
    fn rejects_non_numeric_required_decimal() {
        let result: Result<Row, _> = serde_json::from_value(json!({ "value": "abc" }));
        assert!(result.is_err());
    }
}
