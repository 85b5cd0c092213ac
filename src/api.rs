// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP surface: `GET /apr/api` and `GET /health`.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Json, Router};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::errors::{AprError, FieldIssue};
use crate::query::AprQuery;
use crate::stats::PoolStatsCalculator;
use crate::types::stats::PoolStatsResults;

/// Shared state of the API handlers.
#[derive(Clone)]
pub struct AppState {
    pub calculator: Arc<PoolStatsCalculator>,
    pub request_timeout: Duration,
    pub max_range_days: i64,
}

impl AppState {
    /// Limits are taken from the calculator's configuration.
    pub fn new(calculator: Arc<PoolStatsCalculator>) -> Self {
        let config = calculator.config();
        Self {
            request_timeout: config.request_timeout,
            max_range_days: config.max_range_days,
            calculator,
        }
    }
}

/// Body of every non-success response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub details: Vec<FieldIssue>,
}

/// Failure of an APR request, mapped to a status code and [`ErrorBody`].
#[derive(Debug)]
pub enum ApiError {
    Apr(AprError),
    Timeout(Duration),
}

impl From<AprError> for ApiError {
    fn from(err: AprError) -> Self {
        ApiError::Apr(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Apr(AprError::Query(err)) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: err.to_string(),
                    details: err.issues(),
                },
            ),
            ApiError::Apr(AprError::Round(err)) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "Invalid query parameters".to_string(),
                    details: vec![FieldIssue::new("roundId", err.to_string())],
                },
            ),
            ApiError::Apr(err @ AprError::UnknownPool { .. }) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: err.to_string(),
                    details: vec![FieldIssue::new("poolId", "not found in any gauge or subgraph")],
                },
            ),
            ApiError::Apr(err) => {
                error!(error = %err, "APR request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorBody {
                        error: "error fetching data".to_string(),
                        details: Vec::new(),
                    },
                )
            }
            ApiError::Timeout(after) => {
                warn!(timeout_secs = after.as_secs(), "APR request timed out");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    ErrorBody {
                        error: format!("request exceeded {}s", after.as_secs()),
                        details: Vec::new(),
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Handler for `GET /apr/api`.
async fn get_apr(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<PoolStatsResults>, ApiError> {
    info!(params = ?params, "Received APR request");

    let query =
        AprQuery::from_params(&params, state.max_range_days).map_err(AprError::from)?;

    let results = tokio::time::timeout(state.request_timeout, state.calculator.handle(&query))
        .await
        .map_err(|_| ApiError::Timeout(state.request_timeout))??;

    Ok(Json(results))
}

async fn health() -> &'static str {
    "ok"
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/apr/api", get(get_apr))
        .route("/health", get(health))
        .with_state(state)
}

/// Starts the API server.
pub async fn serve_api(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    let app = router(state);

    let addr = listener.local_addr()?;

    tracing::info!(address = ?addr, "Starting server");

    axum::serve(listener, app).await?;

    Ok(())
}
