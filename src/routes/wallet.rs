//! Wallet route definitions

use axum::{routing::post, Router};

use crate::handlers::wallet::*;
use crate::state::AppState;

pub fn wallet_routes() -> Router<AppState> {
    Router::new()
        .route("/api/deposits", post(create_deposit))
        .route("/api/withdrawals", post(create_withdrawal))
}
