//! Request handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use core_kernel::ClaimId;

use crate::dto::{ClaimDecisionResponse, SubmitClaimRequest};
use crate::error::ApiError;
use crate::AppState;

/// Submits a claim for evaluation
///
/// Returns the definitive outcome synchronously. Resubmitting the same
/// claim id returns the recorded outcome unchanged.
pub async fn submit_claim(
    State(state): State<AppState>,
    Json(request): Json<SubmitClaimRequest>,
) -> Result<Json<ClaimDecisionResponse>, ApiError> {
    let claim = request.into_claim()?;
    let outcome = state.pipeline.process(claim).await?;
    Ok(Json(ClaimDecisionResponse::from_outcome(&outcome)))
}

/// Returns the recorded outcome for a claim
pub async fn get_claim(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClaimDecisionResponse>, ApiError> {
    let outcome = state
        .pipeline
        .outcome(ClaimId::from_uuid(id))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("no outcome recorded for claim {id}")))?;
    Ok(Json(ClaimDecisionResponse::from_outcome(&outcome)))
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check; not ready without scoring providers
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, StatusCode> {
    if state.pipeline.provider_count() == 0 {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(Json(HealthResponse {
        status: "ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
