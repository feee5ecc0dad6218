//! Wallet service layer - deposit and withdrawal request handling

use axum::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::approval::{resolve_request, ApprovableFlow, Decision, PendingTicket};
use crate::error::EngineError;
use crate::ledger::{self, BalanceSource, EntryStatus, EntryType};
use crate::settings::SettingsService;
use crate::wallet::{
    compute_withdrawal_fee, CreateDepositRequest, CreateWithdrawalRequest, DepositRequest,
    RequestStatus, WithdrawalRequest,
};

/// Deposit and withdrawal request service
#[derive(Clone)]
pub struct WalletService {
    db_pool: PgPool,
    settings: SettingsService,
}

impl WalletService {
    /// Create a new wallet service instance
    pub fn new(db_pool: PgPool, settings: SettingsService) -> Self {
        Self { db_pool, settings }
    }

    /// Create a pending deposit request plus its ledger stub.
    ///
    /// The request is only persisted once the proof URL is in hand; a failed
    /// upload upstream means nothing reaches this method.
    pub async fn create_deposit(
        &self,
        user_id: Uuid,
        request: CreateDepositRequest,
    ) -> Result<DepositRequest, EngineError> {
        if request.amount <= Decimal::ZERO {
            return Err(EngineError::Validation(
                "Deposit amount must be greater than 0".to_string(),
            ));
        }
        if request.proof_url.is_empty() {
            return Err(EngineError::Validation(
                "A payment proof is required".to_string(),
            ));
        }

        let mut tx = self.db_pool.begin().await?;

        let has_pending = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM deposit_requests WHERE user_id = $1 AND status = 'pending')",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        if has_pending {
            return Err(EngineError::Conflict(
                "A pending deposit request already exists".to_string(),
            ));
        }

        let entry = ledger::insert_entry(
            &mut *tx,
            user_id,
            request.amount,
            EntryType::Deposit,
            EntryStatus::Pending,
            "Deposit awaiting approval",
        )
        .await?;

        let deposit = sqlx::query_as::<_, DepositRequest>(
            r#"
            INSERT INTO deposit_requests (
                id, user_id, amount, proof_url, status, transaction_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, 'pending', $5, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(request.amount)
        .bind(&request.proof_url)
        .bind(entry.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            request_id = %deposit.id,
            user_id = %user_id,
            amount = %deposit.amount,
            "Deposit request submitted"
        );

        Ok(deposit)
    }

    /// Create a pending withdrawal request plus its ledger stub.
    ///
    /// The fee split is computed here and stored on the request; nothing is
    /// debited until an admin approves.
    pub async fn create_withdrawal(
        &self,
        user_id: Uuid,
        request: CreateWithdrawalRequest,
    ) -> Result<WithdrawalRequest, EngineError> {
        if request.amount <= Decimal::ZERO {
            return Err(EngineError::Validation(
                "Withdrawal amount must be greater than 0".to_string(),
            ));
        }

        if !self.settings.current().await?.withdrawals_enabled {
            return Err(EngineError::WithdrawalsDisabled);
        }

        let (charges, net_amount) = compute_withdrawal_fee(request.amount);

        let mut tx = self.db_pool.begin().await?;

        let has_pending = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM withdrawal_requests WHERE user_id = $1 AND status = 'pending')",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        if has_pending {
            return Err(EngineError::Conflict(
                "A pending withdrawal request already exists".to_string(),
            ));
        }

        // The ledger stub carries the GROSS amount; net-of-fee is advisory
        let entry = ledger::insert_entry(
            &mut *tx,
            user_id,
            request.amount,
            EntryType::Withdrawal,
            EntryStatus::Pending,
            "Withdrawal awaiting approval",
        )
        .await?;

        let withdrawal = sqlx::query_as::<_, WithdrawalRequest>(
            r#"
            INSERT INTO withdrawal_requests (
                id, user_id, amount, balance_source, charges, net_amount,
                status, transaction_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(request.amount)
        .bind(request.balance_source)
        .bind(charges)
        .bind(net_amount)
        .bind(entry.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            request_id = %withdrawal.id,
            user_id = %user_id,
            amount = %withdrawal.amount,
            charges = %withdrawal.charges,
            "Withdrawal request submitted"
        );

        Ok(withdrawal)
    }

    /// Pending deposit requests awaiting an admin decision
    pub async fn list_pending_deposits(&self) -> Result<Vec<DepositRequest>, EngineError> {
        let requests = sqlx::query_as::<_, DepositRequest>(
            "SELECT * FROM deposit_requests WHERE status = 'pending' ORDER BY created_at",
        )
        .fetch_all(&self.db_pool)
        .await?;

        Ok(requests)
    }

    /// Pending withdrawal requests awaiting an admin decision
    pub async fn list_pending_withdrawals(&self) -> Result<Vec<WithdrawalRequest>, EngineError> {
        let requests = sqlx::query_as::<_, WithdrawalRequest>(
            "SELECT * FROM withdrawal_requests WHERE status = 'pending' ORDER BY created_at",
        )
        .fetch_all(&self.db_pool)
        .await?;

        Ok(requests)
    }

    /// Admin decision on a pending deposit
    pub async fn resolve_deposit(
        &self,
        request_id: Uuid,
        decision: Decision,
    ) -> Result<(), EngineError> {
        resolve_request(&self.db_pool, &DepositFlow, request_id, decision).await?;
        Ok(())
    }

    /// Admin decision on a pending withdrawal
    pub async fn resolve_withdrawal(
        &self,
        request_id: Uuid,
        decision: Decision,
    ) -> Result<(), EngineError> {
        resolve_request(&self.db_pool, &WithdrawalFlow, request_id, decision).await?;
        Ok(())
    }
}

/// Approval flow for deposits: approval credits the main balance
pub struct DepositFlow;

#[async_trait]
impl ApprovableFlow for DepositFlow {
    fn kind(&self) -> &'static str {
        "deposit"
    }

    async fn lock_pending(
        &self,
        conn: &mut PgConnection,
        request_id: Uuid,
    ) -> Result<PendingTicket, EngineError> {
        let request = sqlx::query_as::<_, DepositRequest>(
            "SELECT * FROM deposit_requests WHERE id = $1 FOR UPDATE",
        )
        .bind(request_id)
        .fetch_optional(conn)
        .await?
        .ok_or(EngineError::NotFound("deposit request"))?;

        if request.status != RequestStatus::Pending {
            return Err(EngineError::Conflict(
                "Deposit request has already been processed".to_string(),
            ));
        }

        Ok(PendingTicket {
            request_id: request.id,
            user_id: request.user_id,
            amount: request.amount,
            entry_id: request.transaction_id,
        })
    }

    async fn approve(
        &self,
        conn: &mut PgConnection,
        ticket: &PendingTicket,
    ) -> Result<(), EngineError> {
        let user = ledger::lock_user(&mut *conn, ticket.user_id).await?;
        ledger::credit_balance(&mut *conn, user.id, BalanceSource::Main, ticket.amount).await?;

        sqlx::query("UPDATE deposit_requests SET status = 'approved', updated_at = NOW() WHERE id = $1")
            .bind(ticket.request_id)
            .execute(&mut *conn)
            .await?;

        ledger::mark_entry(conn, ticket.entry_id, EntryStatus::Completed).await?;

        Ok(())
    }

    async fn reject(
        &self,
        conn: &mut PgConnection,
        ticket: &PendingTicket,
    ) -> Result<(), EngineError> {
        // The request flips terminal; its entry and proof are retained
        sqlx::query("UPDATE deposit_requests SET status = 'rejected', updated_at = NOW() WHERE id = $1")
            .bind(ticket.request_id)
            .execute(conn)
            .await?;

        Ok(())
    }
}

/// Approval flow for withdrawals: approval re-checks funds and debits the
/// GROSS amount from the selected balance
pub struct WithdrawalFlow;

#[async_trait]
impl ApprovableFlow for WithdrawalFlow {
    fn kind(&self) -> &'static str {
        "withdrawal"
    }

    async fn lock_pending(
        &self,
        conn: &mut PgConnection,
        request_id: Uuid,
    ) -> Result<PendingTicket, EngineError> {
        let request = sqlx::query_as::<_, WithdrawalRequest>(
            "SELECT * FROM withdrawal_requests WHERE id = $1 FOR UPDATE",
        )
        .bind(request_id)
        .fetch_optional(conn)
        .await?
        .ok_or(EngineError::NotFound("withdrawal request"))?;

        if request.status != RequestStatus::Pending {
            return Err(EngineError::Conflict(
                "Withdrawal request has already been processed".to_string(),
            ));
        }

        Ok(PendingTicket {
            request_id: request.id,
            user_id: request.user_id,
            amount: request.amount,
            entry_id: request.transaction_id,
        })
    }

    async fn approve(
        &self,
        conn: &mut PgConnection,
        ticket: &PendingTicket,
    ) -> Result<(), EngineError> {
        let source = sqlx::query_scalar::<_, BalanceSource>(
            "SELECT balance_source FROM withdrawal_requests WHERE id = $1",
        )
        .bind(ticket.request_id)
        .fetch_one(&mut *conn)
        .await?;

        // Sufficiency is re-checked here, against the locked row - the
        // balance at creation time is not trusted
        let user = ledger::lock_user(&mut *conn, ticket.user_id).await?;
        ledger::debit_balance(&mut *conn, &user, source, ticket.amount).await?;

        sqlx::query(
            "UPDATE withdrawal_requests SET status = 'approved', updated_at = NOW() WHERE id = $1",
        )
        .bind(ticket.request_id)
        .execute(&mut *conn)
        .await?;

        ledger::mark_entry(conn, ticket.entry_id, EntryStatus::Completed).await?;

        Ok(())
    }

    async fn reject(
        &self,
        conn: &mut PgConnection,
        ticket: &PendingTicket,
    ) -> Result<(), EngineError> {
        sqlx::query(
            "UPDATE withdrawal_requests SET status = 'rejected', updated_at = NOW() WHERE id = $1",
        )
        .bind(ticket.request_id)
        .execute(conn)
        .await?;

        Ok(())
    }
}
