//! Referral models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

/// A user referred by the caller
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ReferredUser {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Summary of a user's referral standing
#[derive(Debug, Serialize)]
pub struct ReferralSummary {
    pub referral_code: String,
    pub referred_users: Vec<ReferredUser>,
    /// Sum of completed referral/bonus ledger entries
    pub total_rewards: Decimal,
}

/// Admin grant of a flat referral or bonus credit
#[derive(Debug, Deserialize)]
pub struct GrantRewardRequest {
    pub user_id: Uuid,
    pub amount: Decimal,
    pub kind: RewardKind,
    pub description: Option<String>,
}

/// Which ledger entry type a grant records
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RewardKind {
    Referral,
    Bonus,
}
