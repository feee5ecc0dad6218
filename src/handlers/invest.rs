//! Investment handlers

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;

use crate::error::ApiError;
use crate::handlers::AuthenticatedUser;
use crate::investment::{CreateInvestmentRequest, Investment, InvestmentView};
use crate::models::ApiResponse;
use crate::state::AppState;

/// POST /api/investments
pub async fn create_investment(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<CreateInvestmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Investment>>), ApiError> {
    let investment = state
        .investment_service
        .create(user.user_id, req)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(investment))))
}

/// GET /api/investments - the caller's investments with accrual positions
pub async fn list_investments(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<Vec<InvestmentView>>>, ApiError> {
    let investments = state
        .investment_service
        .views_for_user(user.user_id, Utc::now())
        .await?;

    Ok(Json(ApiResponse::ok(investments)))
}
