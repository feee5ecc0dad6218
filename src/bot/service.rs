//! Bot catalog service

use sqlx::PgPool;
use uuid::Uuid;

use crate::bot::{Bot, CreateBotRequest, UpdateBotRequest};
use crate::error::EngineError;

/// Catalog access for investment plans
#[derive(Clone)]
pub struct BotService {
    db_pool: PgPool,
}

impl BotService {
    /// Create a new bot service instance
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Plans currently open for investment
    pub async fn list_active(&self) -> Result<Vec<Bot>, EngineError> {
        let bots =
            sqlx::query_as::<_, Bot>("SELECT * FROM bots WHERE is_active ORDER BY created_at")
                .fetch_all(&self.db_pool)
                .await?;

        Ok(bots)
    }

    /// All plans, including retired ones (admin view)
    pub async fn list_all(&self) -> Result<Vec<Bot>, EngineError> {
        let bots = sqlx::query_as::<_, Bot>("SELECT * FROM bots ORDER BY created_at")
            .fetch_all(&self.db_pool)
            .await?;

        Ok(bots)
    }

    /// Fetch one plan
    pub async fn get(&self, id: Uuid) -> Result<Option<Bot>, EngineError> {
        let bot = sqlx::query_as::<_, Bot>("SELECT * FROM bots WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(bot)
    }

    /// Create a plan
    pub async fn create(&self, request: CreateBotRequest) -> Result<Bot, EngineError> {
        let bot = sqlx::query_as::<_, Bot>(
            r#"
            INSERT INTO bots (
                id, name, return_percentage, duration_days, min_invest, max_invest,
                is_active, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, true, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.name)
        .bind(request.return_percentage)
        .bind(request.duration_days)
        .bind(request.min_invest)
        .bind(request.max_invest)
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(bot_id = %bot.id, name = %bot.name, "Bot created");

        Ok(bot)
    }

    /// Apply a partial update. Running investments are unaffected: they carry
    /// rate/duration snapshots taken at creation.
    pub async fn update(&self, id: Uuid, request: UpdateBotRequest) -> Result<Bot, EngineError> {
        let current = self.get(id).await?.ok_or(EngineError::NotFound("bot"))?;

        let bot = sqlx::query_as::<_, Bot>(
            r#"
            UPDATE bots
            SET name = $1, return_percentage = $2, duration_days = $3,
                min_invest = $4, max_invest = $5, is_active = $6, updated_at = NOW()
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(request.name.unwrap_or(current.name))
        .bind(request.return_percentage.unwrap_or(current.return_percentage))
        .bind(request.duration_days.unwrap_or(current.duration_days))
        .bind(request.min_invest.unwrap_or(current.min_invest))
        .bind(request.max_invest.unwrap_or(current.max_invest))
        .bind(request.is_active.unwrap_or(current.is_active))
        .bind(id)
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(bot_id = %bot.id, "Bot updated");

        Ok(bot)
    }
}
