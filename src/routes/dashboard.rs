//! Dashboard route definitions

use axum::{routing::get, Router};

use crate::handlers::dashboard::*;
use crate::state::AppState;

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/api/dashboard", get(get_dashboard))
}
