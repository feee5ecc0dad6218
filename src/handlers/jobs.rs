//! Job trigger handlers
//!
//! The daily accrual batch is driven by an external clock-based caller
//! hitting one idempotent endpoint, authenticated with a shared secret
//! rather than a user identity.

use axum::{extract::State, http::HeaderMap, Json};
use chrono::Utc;

use crate::accrual::AccrualReport;
use crate::error::ApiError;
use crate::models::ApiResponse;
use crate::state::AppState;

const JOB_SECRET_HEADER: &str = "x-job-secret";

/// POST /api/jobs/accrual
///
/// Fail-closed: with no secret configured, every trigger is rejected.
pub async fn run_accrual(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<AccrualReport>>, ApiError> {
    match &state.job_trigger_secret {
        Some(secret) if !secret.is_empty() => {
            let provided = headers
                .get(JOB_SECRET_HEADER)
                .and_then(|h| h.to_str().ok())
                .unwrap_or_default();

            if provided != secret {
                return Err(ApiError::Unauthorized(
                    "Invalid job trigger secret".to_string(),
                ));
            }
        }
        _ => {
            tracing::error!("Job trigger secret not configured - rejecting request");
            return Err(ApiError::InternalError(
                "Job trigger is not configured".to_string(),
            ));
        }
    }

    let report = state.accrual_service.run_daily_accrual(Utc::now()).await?;

    Ok(Json(ApiResponse::ok(report)))
}
