//! Referral route definitions

use axum::{routing::get, Router};

use crate::handlers::referral::*;
use crate::state::AppState;

pub fn referral_routes() -> Router<AppState> {
    Router::new().route("/api/referrals", get(my_referrals))
}
