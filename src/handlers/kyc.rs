//! KYC handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::error::ApiError;
use crate::handlers::AuthenticatedUser;
use crate::models::{ApiResponse, KycDocument, KycSubmission};
use crate::state::AppState;

/// POST /api/kyc - submit an identity document for review
pub async fn submit_kyc(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(document): Json<KycDocument>,
) -> Result<(StatusCode, Json<ApiResponse<KycSubmission>>), ApiError> {
    let submission = state.kyc_service.submit(user.user_id, document).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(submission))))
}

/// GET /api/kyc - the caller's latest submission
pub async fn my_kyc(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<Option<KycSubmission>>>, ApiError> {
    let submission = state.kyc_service.latest_for_user(user.user_id).await?;
    Ok(Json(ApiResponse::ok(submission)))
}
