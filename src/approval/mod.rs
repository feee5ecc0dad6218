//! Generic approvable-request state machine
//!
//! Deposits, gateway investments, and withdrawals share the same lifecycle:
//! a user creates a pending request plus a pending ledger entry, and an admin
//! later approves or rejects it. The driver here owns the transaction and the
//! re-check-before-mutate discipline; each flow supplies the row locking, the
//! paired balance mutation, and its terminal statuses. A request that is no
//! longer pending is a conflict, never a silent no-op.

use axum::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::EngineError;

/// Admin decision on a pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approve => "approve",
            Decision::Reject => "reject",
        }
    }
}

/// Snapshot of a locked pending request, re-read inside the driver's
/// transaction so the decision never acts on stale state.
#[derive(Debug, Clone)]
pub struct PendingTicket {
    pub request_id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    /// The paired pending ledger entry
    pub entry_id: Uuid,
}

/// One approvable request kind (deposit, gateway investment, withdrawal)
#[async_trait]
pub trait ApprovableFlow: Send + Sync {
    /// Request kind label used in logs and error messages
    fn kind(&self) -> &'static str;

    /// Lock the request row (`FOR UPDATE`) and verify it is still pending.
    /// Must error `Conflict` if it has already been processed.
    async fn lock_pending(
        &self,
        conn: &mut PgConnection,
        request_id: Uuid,
    ) -> Result<PendingTicket, EngineError>;

    /// Apply the paired balance mutation, terminal request status, and ledger
    /// entry flip for an approval.
    async fn approve(
        &self,
        conn: &mut PgConnection,
        ticket: &PendingTicket,
    ) -> Result<(), EngineError>;

    /// Apply the terminal statuses for a rejection. Must not touch balances.
    async fn reject(
        &self,
        conn: &mut PgConnection,
        ticket: &PendingTicket,
    ) -> Result<(), EngineError>;
}

/// Resolve a pending request in one transaction.
///
/// Any error from the flow aborts the whole transaction, so a failed
/// approval leaves the request pending and balances untouched.
pub async fn resolve_request<F: ApprovableFlow>(
    pool: &PgPool,
    flow: &F,
    request_id: Uuid,
    decision: Decision,
) -> Result<PendingTicket, EngineError> {
    let mut tx = pool.begin().await?;

    let ticket = flow.lock_pending(&mut *tx, request_id).await?;

    match decision {
        Decision::Approve => flow.approve(&mut *tx, &ticket).await?,
        Decision::Reject => flow.reject(&mut *tx, &ticket).await?,
    }

    tx.commit().await?;

    tracing::info!(
        kind = flow.kind(),
        request_id = %request_id,
        user_id = %ticket.user_id,
        decision = decision.as_str(),
        amount = %ticket.amount,
        "Request resolved"
    );

    Ok(ticket)
}
