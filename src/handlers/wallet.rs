//! Deposit and withdrawal handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::error::ApiError;
use crate::handlers::AuthenticatedUser;
use crate::models::ApiResponse;
use crate::state::AppState;
use crate::wallet::{
    CreateDepositRequest, CreateWithdrawalRequest, DepositRequest, WithdrawalRequest,
};

/// POST /api/deposits
pub async fn create_deposit(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<CreateDepositRequest>,
) -> Result<(StatusCode, Json<ApiResponse<DepositRequest>>), ApiError> {
    let deposit = state.wallet_service.create_deposit(user.user_id, req).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(deposit))))
}

/// POST /api/withdrawals - the response echoes the computed charges and
/// net amount stored on the request
pub async fn create_withdrawal(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<CreateWithdrawalRequest>,
) -> Result<(StatusCode, Json<ApiResponse<WithdrawalRequest>>), ApiError> {
    let withdrawal = state
        .wallet_service
        .create_withdrawal(user.user_id, req)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(withdrawal))))
}
