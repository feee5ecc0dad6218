//! Admin route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::admin::*;
use crate::state::AppState;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/requests", get(list_pending_requests))
        .route("/api/admin/deposits/:id/approve", post(approve_deposit))
        .route("/api/admin/deposits/:id/reject", post(reject_deposit))
        .route("/api/admin/withdrawals/:id/approve", post(approve_withdrawal))
        .route("/api/admin/withdrawals/:id/reject", post(reject_withdrawal))
        .route("/api/admin/investments/:id/approve", post(approve_investment))
        .route("/api/admin/investments/:id/reject", post(reject_investment))
        .route("/api/admin/settings", get(get_settings))
        .route("/api/admin/settings/withdrawals", post(set_withdrawals_enabled))
        .route("/api/admin/referrals/bonus", post(grant_reward))
        .route("/api/admin/kyc", get(list_pending_kyc))
        .route("/api/admin/kyc/:id/review", post(review_kyc))
}
