//! User registration and account handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::error::ApiError;
use crate::handlers::{AuthenticatedUser, IdentityClaims};
use crate::ledger::{self, LedgerEntry};
use crate::models::{ApiResponse, PaginationParams, UserResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    /// Referral code of the member who invited this user
    pub referral_code: Option<String>,
}

/// POST /api/users/register - provision the caller's internal account.
/// Idempotent: an already-registered subject gets its existing account back.
pub async fn register(
    State(state): State<AppState>,
    IdentityClaims(claims): IdentityClaims,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    let name = req.name.or_else(|| claims.name.clone());
    let user = state
        .user_service
        .register(&claims.sub, claims.email.clone(), name, req.referral_code)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user.into()))))
}

/// GET /api/users/me - the caller's account with current balances
pub async fn me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let account = state.user_service.get(user.user_id).await?;
    Ok(Json(ApiResponse::ok(account.into())))
}

/// GET /api/ledger - the caller's ledger entries, newest first
pub async fn list_ledger(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    axum::extract::Query(pagination): axum::extract::Query<PaginationParams>,
) -> Result<Json<ApiResponse<Vec<LedgerEntry>>>, ApiError> {
    let (limit, offset) = pagination.to_limit_offset();
    let entries = ledger::list_for_user(&state.db_pool, user.user_id, limit, offset).await?;
    Ok(Json(ApiResponse::ok(entries)))
}
