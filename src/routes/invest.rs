//! Investment route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::invest::*;
use crate::state::AppState;

pub fn invest_routes() -> Router<AppState> {
    Router::new()
        .route("/api/investments", post(create_investment))
        .route("/api/investments", get(list_investments))
}
