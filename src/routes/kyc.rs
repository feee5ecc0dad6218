//! KYC route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::kyc::*;
use crate::state::AppState;

pub fn kyc_routes() -> Router<AppState> {
    Router::new()
        .route("/api/kyc", post(submit_kyc))
        .route("/api/kyc", get(my_kyc))
}
