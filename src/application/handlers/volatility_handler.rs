use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::application::services::volatility_service::VolatilityService;
use crate::domain::errors::ApiError;

/// Confirmation label echoed on every successful calculation.
pub const RULE_NAME: &str = "Robust Volatility Series";

/// Body of `POST /robust_volatility`.
#[derive(Debug, Serialize, Deserialize)]
pub struct VolatilityRequest {
    pub instrument: String,
    /// Unix timestamp (seconds) of the first observation to include.
    pub start_time: i64,
}

/// Success response. Deliberately carries only a confirmation, not the
/// computed series; extending it is a contract change for the consumer.
#[derive(Debug, Serialize, Deserialize)]
pub struct VolatilityResponse {
    pub rule: String,
    pub instrument: String,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(err: ApiError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match err {
        ApiError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
        ApiError::RetrievalFailed => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

/// Compute the robust volatility series for an instrument.
///
/// Malformed bodies are rejected before any store query. Store failures are
/// logged with their cause and surfaced as a generic retrieval error.
pub async fn robust_volatility(
    State(service): State<Arc<VolatilityService>>,
    body: Result<Json<VolatilityRequest>, JsonRejection>,
) -> Result<Json<VolatilityResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Json(request) =
        body.map_err(|rejection| error_response(ApiError::MalformedRequest(rejection.body_text())))?;

    if request.instrument.trim().is_empty() {
        return Err(error_response(ApiError::MalformedRequest(
            "instrument must not be empty".to_string(),
        )));
    }

    match service
        .robust_volatility(&request.instrument, request.start_time)
        .await
    {
        Ok(series) => {
            info!(
                instrument = %request.instrument,
                days = series.len(),
                "robust volatility computed"
            );
            Ok(Json(VolatilityResponse {
                rule: RULE_NAME.to_string(),
                instrument: request.instrument,
            }))
        }
        Err(cause) => {
            error!(
                instrument = %request.instrument,
                %cause,
                "error occurred while retrieving prices from store"
            );
            Err(error_response(ApiError::RetrievalFailed))
        }
    }
}

/// Liveness probe.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}
