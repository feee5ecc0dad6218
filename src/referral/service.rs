//! Referral service layer
//!
//! Only flat reward grants are supported: a tiered commission computed from
//! referred investment volume needs a product decision on the algorithm
//! before anything is paid out automatically (see DESIGN.md).

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::EngineError;
use crate::ledger::{self, BalanceSource, EntryStatus, EntryType};
use crate::models::User;
use crate::referral::{GrantRewardRequest, ReferralSummary, ReferredUser, RewardKind};

/// Referral linkage and reward grants
#[derive(Clone)]
pub struct ReferralService {
    db_pool: PgPool,
}

impl ReferralService {
    /// Create a new referral service instance
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// A user's referral code, referred signups, and completed rewards
    pub async fn summary(&self, user_id: Uuid) -> Result<ReferralSummary, EngineError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or(EngineError::NotFound("user"))?;

        let referred_users = sqlx::query_as::<_, ReferredUser>(
            "SELECT id, name, email, created_at FROM users WHERE referred_by = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await?;

        let total_rewards = sqlx::query_scalar::<_, Option<Decimal>>(
            r#"
            SELECT SUM(amount) FROM ledger_entries
            WHERE user_id = $1 AND entry_type IN ('referral', 'bonus') AND status = 'completed'
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.db_pool)
        .await?
        .unwrap_or(Decimal::ZERO);

        Ok(ReferralSummary {
            referral_code: user.referral_code,
            referred_users,
            total_rewards,
        })
    }

    /// Credit a flat referral/bonus reward to a user's main balance,
    /// atomically with its ledger entry
    pub async fn grant_reward(&self, request: GrantRewardRequest) -> Result<(), EngineError> {
        if request.amount <= Decimal::ZERO {
            return Err(EngineError::Validation(
                "Reward amount must be greater than 0".to_string(),
            ));
        }

        let entry_type = match request.kind {
            RewardKind::Referral => EntryType::Referral,
            RewardKind::Bonus => EntryType::Bonus,
        };
        let description = request
            .description
            .unwrap_or_else(|| "Referral reward".to_string());

        let mut tx = self.db_pool.begin().await?;

        let user = ledger::lock_user(&mut *tx, request.user_id).await?;
        ledger::credit_balance(&mut *tx, user.id, BalanceSource::Main, request.amount).await?;
        ledger::insert_entry(
            &mut *tx,
            user.id,
            request.amount,
            entry_type,
            EntryStatus::Completed,
            &description,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            user_id = %request.user_id,
            amount = %request.amount,
            kind = ?request.kind,
            "Reward granted"
        );

        Ok(())
    }
}
