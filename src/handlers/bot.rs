//! Bot catalog handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::bot::{Bot, CreateBotRequest, UpdateBotRequest};
use crate::error::ApiError;
use crate::handlers::AdminUser;
use crate::models::ApiResponse;
use crate::state::AppState;

/// GET /api/bots - plans open for investment
pub async fn list_bots(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Bot>>>, ApiError> {
    let bots = state.bot_service.list_active().await?;
    Ok(Json(ApiResponse::ok(bots)))
}

/// GET /api/admin/bots - every plan, including retired ones
pub async fn list_all_bots(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<ApiResponse<Vec<Bot>>>, ApiError> {
    let bots = state.bot_service.list_all().await?;
    Ok(Json(ApiResponse::ok(bots)))
}

/// POST /api/admin/bots
pub async fn create_bot(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(req): Json<CreateBotRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Bot>>), ApiError> {
    req.validate()?;
    req.validate_amounts().map_err(ApiError::BadRequest)?;

    let bot = state.bot_service.create(req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(bot))))
}

/// PUT /api/admin/bots/:id
pub async fn update_bot(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBotRequest>,
) -> Result<Json<ApiResponse<Bot>>, ApiError> {
    let bot = state.bot_service.update(id, req).await?;
    Ok(Json(ApiResponse::ok(bot)))
}
