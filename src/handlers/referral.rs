//! Referral handlers

use axum::{extract::State, Json};

use crate::error::ApiError;
use crate::handlers::AuthenticatedUser;
use crate::models::ApiResponse;
use crate::referral::ReferralSummary;
use crate::state::AppState;

/// GET /api/referrals - the caller's code, signups, and rewards
pub async fn my_referrals(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<ReferralSummary>>, ApiError> {
    let summary = state.referral_service.summary(user.user_id).await?;
    Ok(Json(ApiResponse::ok(summary)))
}
