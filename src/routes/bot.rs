//! Bot catalog route definitions

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::bot::*;
use crate::state::AppState;

pub fn bot_routes() -> Router<AppState> {
    Router::new()
        .route("/api/bots", get(list_bots))
        .route("/api/admin/bots", get(list_all_bots))
        .route("/api/admin/bots", post(create_bot))
        .route("/api/admin/bots/:id", put(update_bot))
}
