//! Dashboard handler
//!
//! The dashboard read path is also the settlement trigger: matured
//! investments are settled for the caller before their balances are read, so
//! the response never shows a matured-but-unsettled position.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use crate::error::ApiError;
use crate::handlers::AuthenticatedUser;
use crate::investment::{InvestmentView, SettlementReport};
use crate::ledger::{self, LedgerEntry};
use crate::models::{ApiResponse, UserResponse};
use crate::state::AppState;

const RECENT_ENTRIES: i64 = 20;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub account: UserResponse,
    pub investments: Vec<InvestmentView>,
    /// What this request settled on its way in
    pub settlement: SettlementReport,
    pub recent_entries: Vec<LedgerEntry>,
}

/// GET /api/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<DashboardResponse>>, ApiError> {
    let now = Utc::now();

    let settlement = state
        .investment_service
        .settle_matured(user.user_id, now)
        .await?;

    let account = state.user_service.get(user.user_id).await?;
    let investments = state
        .investment_service
        .views_for_user(user.user_id, now)
        .await?;
    let recent_entries =
        ledger::list_for_user(&state.db_pool, user.user_id, RECENT_ENTRIES, 0).await?;

    Ok(Json(ApiResponse::ok(DashboardResponse {
        account: account.into(),
        investments,
        settlement,
        recent_entries,
    })))
}
