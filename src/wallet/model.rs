//! Deposit/withdrawal request models and the withdrawal fee arithmetic

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::ledger::BalanceSource;

/// Terminal-state machine shared by deposit and withdrawal requests
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

/// A pending-approval deposit ("add money") request
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct DepositRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    /// Durable URL of the payment proof, returned by the object store
    pub proof_url: String,
    pub status: RequestStatus,
    /// Paired pending ledger entry
    pub transaction_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A pending-approval withdrawal request. `amount` is the gross figure the
/// ledger debits; `charges` and `net_amount` are advisory for the
/// off-platform payout.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct WithdrawalRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub balance_source: BalanceSource,
    pub charges: Decimal,
    pub net_amount: Decimal,
    pub status: RequestStatus,
    pub transaction_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to add money
#[derive(Debug, Deserialize)]
pub struct CreateDepositRequest {
    pub amount: Decimal,
    pub proof_url: String,
}

/// Request to withdraw funds
#[derive(Debug, Deserialize)]
pub struct CreateWithdrawalRequest {
    pub amount: Decimal,
    pub balance_source: BalanceSource,
}

/// Flat percentage fee applied to every withdrawal at creation time
pub fn withdrawal_fee_rate() -> Decimal {
    Decimal::new(5, 2) // 5%
}

/// Fee split for a gross withdrawal amount: `(charges, net_amount)`.
///
/// The gross amount is what is debited from the user and recorded in the
/// ledger; the net figure only tells the operator what to pay out.
pub fn compute_withdrawal_fee(amount: Decimal) -> (Decimal, Decimal) {
    let charges = amount * withdrawal_fee_rate();
    (charges, amount - charges)
}
