//! Admin handlers: the approval queue, platform settings, reward grants,
//! and KYC review

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::approval::Decision;
use crate::error::ApiError;
use crate::handlers::AdminUser;
use crate::investment::Investment;
use crate::models::{ApiResponse, KycSubmission};
use crate::referral::GrantRewardRequest;
use crate::settings::PlatformSettings;
use crate::state::AppState;
use crate::wallet::{DepositRequest, WithdrawalRequest};

/// Everything currently waiting on an admin decision
#[derive(Debug, Serialize)]
pub struct PendingRequests {
    pub deposits: Vec<DepositRequest>,
    pub withdrawals: Vec<WithdrawalRequest>,
    pub investments: Vec<Investment>,
}

/// GET /api/admin/requests
pub async fn list_pending_requests(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<ApiResponse<PendingRequests>>, ApiError> {
    let deposits = state.wallet_service.list_pending_deposits().await?;
    let withdrawals = state.wallet_service.list_pending_withdrawals().await?;
    let investments = state.investment_service.list_pending().await?;

    Ok(Json(ApiResponse::ok(PendingRequests {
        deposits,
        withdrawals,
        investments,
    })))
}

/// POST /api/admin/deposits/:id/approve
pub async fn approve_deposit(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.wallet_service.resolve_deposit(id, Decision::Approve).await?;
    Ok(Json(ApiResponse::ok(())))
}

/// POST /api/admin/deposits/:id/reject
pub async fn reject_deposit(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.wallet_service.resolve_deposit(id, Decision::Reject).await?;
    Ok(Json(ApiResponse::ok(())))
}

/// POST /api/admin/withdrawals/:id/approve
pub async fn approve_withdrawal(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .wallet_service
        .resolve_withdrawal(id, Decision::Approve)
        .await?;
    Ok(Json(ApiResponse::ok(())))
}

/// POST /api/admin/withdrawals/:id/reject
pub async fn reject_withdrawal(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .wallet_service
        .resolve_withdrawal(id, Decision::Reject)
        .await?;
    Ok(Json(ApiResponse::ok(())))
}

/// POST /api/admin/investments/:id/approve
pub async fn approve_investment(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .investment_service
        .resolve_pending(id, Decision::Approve)
        .await?;
    Ok(Json(ApiResponse::ok(())))
}

/// POST /api/admin/investments/:id/reject
pub async fn reject_investment(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .investment_service
        .resolve_pending(id, Decision::Reject)
        .await?;
    Ok(Json(ApiResponse::ok(())))
}

#[derive(Debug, Deserialize)]
pub struct WithdrawalsToggleRequest {
    pub enabled: bool,
}

/// POST /api/admin/settings/withdrawals - flip the global withdrawals gate
pub async fn set_withdrawals_enabled(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(req): Json<WithdrawalsToggleRequest>,
) -> Result<Json<ApiResponse<PlatformSettings>>, ApiError> {
    let settings = state
        .settings_service
        .set_withdrawals_enabled(req.enabled, admin.user_id)
        .await?;

    Ok(Json(ApiResponse::ok(settings)))
}

/// GET /api/admin/settings
pub async fn get_settings(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<ApiResponse<PlatformSettings>>, ApiError> {
    let settings = state.settings_service.current().await?;
    Ok(Json(ApiResponse::ok(settings)))
}

/// POST /api/admin/referrals/bonus - flat referral/bonus grant
pub async fn grant_reward(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(req): Json<GrantRewardRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.referral_service.grant_reward(req).await?;
    Ok(Json(ApiResponse::ok(())))
}

/// GET /api/admin/kyc - submissions awaiting review
pub async fn list_pending_kyc(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<ApiResponse<Vec<KycSubmission>>>, ApiError> {
    let submissions = state.kyc_service.list_pending().await?;
    Ok(Json(ApiResponse::ok(submissions)))
}

#[derive(Debug, Deserialize)]
pub struct KycReviewRequest {
    pub approve: bool,
    pub reason: Option<String>,
}

/// POST /api/admin/kyc/:id/review
pub async fn review_kyc(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(req): Json<KycReviewRequest>,
) -> Result<Json<ApiResponse<KycSubmission>>, ApiError> {
    let submission = state
        .kyc_service
        .review(id, req.approve, req.reason)
        .await?;

    Ok(Json(ApiResponse::ok(submission)))
}
