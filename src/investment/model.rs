//! Investment models and the accrual arithmetic shared by the daily job,
//! settlement, and the dashboard read path.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One user investment into a bot plan
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Investment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bot_id: Uuid,
    /// Paired ledger entry created with this investment
    pub transaction_id: Uuid,
    pub amount: Decimal,
    pub wallet: WalletSource,
    pub status: InvestmentStatus,
    /// Rate snapshot taken from the bot at creation
    pub interest_rate: Decimal,
    /// Duration snapshot taken from the bot at creation; None = perpetual
    pub duration_days: Option<i32>,
    pub capital_back: bool,
    /// Watermark: whole elapsed days already credited by the accrual job
    pub days_credited: i32,
    pub last_credited_at: Option<DateTime<Utc>>,
    /// Finalized at settlement; None while the investment is running
    pub total_profit_amount: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Investment lifecycle: pending -> ongoing -> completed, or pending -> rejected.
/// Ongoing investments are never deleted.
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "investment_status", rename_all = "lowercase")]
pub enum InvestmentStatus {
    Pending,
    Ongoing,
    Completed,
    Rejected,
}

/// Funding source for an investment
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "wallet_source", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WalletSource {
    /// On-platform balance, debited synchronously; the investment starts
    /// ongoing immediately
    Main,
    /// Off-platform payment plus proof upload; pending until an admin approves
    Gateway,
}

/// Payment proof attached to a gateway investment. Deleted if the investment
/// is rejected.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct PaymentProof {
    pub id: Uuid,
    pub investment_id: Uuid,
    pub proof_url: String,
    pub created_at: DateTime<Utc>,
}

/// Request to open an investment
#[derive(Debug, Deserialize)]
pub struct CreateInvestmentRequest {
    pub bot_id: Uuid,
    pub amount: Decimal,
    pub wallet: WalletSource,
    /// Required for gateway investments
    pub proof_url: Option<String>,
}

/// An investment with its accrual position re-derived for display
#[derive(Debug, Serialize)]
pub struct InvestmentView {
    #[serde(flatten)]
    pub investment: Investment,
    pub days_elapsed: i64,
    pub daily_profit: Decimal,
    /// Whole days elapsed but not yet credited by the accrual job
    pub uncredited_days: i64,
    pub uncredited_profit: Decimal,
    pub matured: bool,
}

/// Outcome of one per-user settlement pass
#[derive(Debug, Serialize, Default)]
pub struct SettlementReport {
    pub settled_investments: usize,
    pub capital_returned: Decimal,
    pub profit_returned: Decimal,
}

/// Whole days elapsed since the investment started
pub fn days_elapsed(created_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - created_at).num_days()
}

/// Maturity predicate. The accrual job and the settlement pass MUST both use
/// this expression: accrual stops crediting exactly where settlement takes
/// over, so no day is ever credited twice or dropped between them.
pub fn is_matured(duration_days: Option<i32>, elapsed_days: i64) -> bool {
    matches!(duration_days, Some(days) if elapsed_days >= days as i64)
}

/// Profit credited per whole elapsed day.
///
/// The plan's return percentage is applied as a flat daily rate with no
/// division by the plan duration. This matches the upstream arithmetic the
/// platform's books were built on; changing it means migrating every
/// already-credited balance (see DESIGN.md).
pub fn daily_profit(amount: Decimal, return_percentage: Decimal) -> Decimal {
    amount * return_percentage / Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_days_elapsed_floors_partial_days() {
        let start = Utc::now();
        assert_eq!(days_elapsed(start, start + Duration::hours(23)), 0);
        assert_eq!(days_elapsed(start, start + Duration::hours(24)), 1);
        assert_eq!(days_elapsed(start, start + Duration::hours(49)), 2);
    }

    #[test]
    fn test_maturity_predicate() {
        assert!(!is_matured(Some(30), 29));
        assert!(is_matured(Some(30), 30));
        assert!(is_matured(Some(30), 31));

        // Perpetual plans never mature
        assert!(!is_matured(None, 10_000));
    }

    #[test]
    fn test_daily_profit_flat_rate() {
        // 300 at 10% => 30 per day, with no division by the plan duration
        let profit = daily_profit(Decimal::new(300, 0), Decimal::new(10, 0));
        assert_eq!(profit, Decimal::new(30, 0));
    }

    #[test]
    fn test_daily_profit_fractional_rate() {
        // 250 at 2.5% => 6.25 per day
        let profit = daily_profit(Decimal::new(250, 0), Decimal::new(25, 1));
        assert_eq!(profit, Decimal::new(625, 2));
    }
}
