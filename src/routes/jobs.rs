//! Job trigger route definitions

use axum::{routing::post, Router};

use crate::handlers::jobs::*;
use crate::state::AppState;

pub fn job_routes() -> Router<AppState> {
    Router::new().route("/api/jobs/accrual", post(run_accrual))
}
