//! Ledger entry models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

/// One row of the append-only audit trail. Balances are denormalized onto the
/// user row; the engine never derives them from this log.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub entry_type: EntryType,
    pub status: EntryStatus,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Type tag on every ledger entry
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "entry_type", rename_all = "snake_case")]
pub enum EntryType {
    Deposit,
    Investment,
    Interest,
    CapitalReturn,
    ProfitCompletion,
    Withdrawal,
    Referral,
    Bonus,
}

/// Entry status; pending entries are stubs awaiting an approval decision
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "entry_status", rename_all = "lowercase")]
pub enum EntryStatus {
    Pending,
    Completed,
    Failed,
}

/// Which denormalized balance field an operation targets
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "balance_source", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BalanceSource {
    /// Principal / withdrawable funds (`balance`)
    Main,
    /// Accrued interest (`profit_balance`)
    Profit,
}

impl BalanceSource {
    /// Column name of the targeted balance field
    pub fn column(&self) -> &'static str {
        match self {
            BalanceSource::Main => "balance",
            BalanceSource::Profit => "profit_balance",
        }
    }
}
