//! User route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::users::*;
use crate::state::AppState;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users/register", post(register))
        .route("/api/users/me", get(me))
        .route("/api/ledger", get(list_ledger))
}
