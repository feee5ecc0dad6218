//! Platform settings: a versioned configuration record.
//!
//! The withdrawals toggle lives in a single append-only settings table - the
//! current configuration is the highest version. Flipping the toggle appends
//! a new version instead of sweeping a flag across every user row, so a
//! toggle is atomic and leaves an audit trail of who changed what when.

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::EngineError;

/// One version of the platform configuration
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct PlatformSettings {
    pub id: Uuid,
    pub withdrawals_enabled: bool,
    pub version: i32,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

/// Access to the versioned platform configuration
#[derive(Clone)]
pub struct SettingsService {
    db_pool: PgPool,
}

impl SettingsService {
    /// Create a new settings service instance
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// The current configuration (highest version). A fresh database with no
    /// settings row yet behaves as withdrawals-enabled defaults.
    pub async fn current(&self) -> Result<PlatformSettings, EngineError> {
        let settings = sqlx::query_as::<_, PlatformSettings>(
            "SELECT * FROM platform_settings ORDER BY version DESC LIMIT 1",
        )
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(settings.unwrap_or(PlatformSettings {
            id: Uuid::nil(),
            withdrawals_enabled: true,
            version: 0,
            updated_by: None,
            updated_at: Utc::now(),
        }))
    }

    /// Append a new configuration version with the toggle flipped
    pub async fn set_withdrawals_enabled(
        &self,
        enabled: bool,
        updated_by: Uuid,
    ) -> Result<PlatformSettings, EngineError> {
        let mut tx = self.db_pool.begin().await?;

        // Serialize concurrent bumps on the latest row
        let current_version = sqlx::query_scalar::<_, i32>(
            "SELECT version FROM platform_settings ORDER BY version DESC LIMIT 1 FOR UPDATE",
        )
        .fetch_optional(&mut *tx)
        .await?
        .unwrap_or(0);

        let settings = sqlx::query_as::<_, PlatformSettings>(
            r#"
            INSERT INTO platform_settings (id, withdrawals_enabled, version, updated_by, updated_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(enabled)
        .bind(current_version + 1)
        .bind(updated_by)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            version = settings.version,
            withdrawals_enabled = settings.withdrawals_enabled,
            updated_by = %updated_by,
            "Platform settings updated"
        );

        Ok(settings)
    }
}
