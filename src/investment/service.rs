//! Investment service layer - lifecycle and settlement logic

use axum::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::approval::{resolve_request, ApprovableFlow, Decision, PendingTicket};
use crate::bot::Bot;
use crate::error::EngineError;
use crate::investment::{
    daily_profit, days_elapsed, is_matured, CreateInvestmentRequest, Investment, InvestmentStatus,
    InvestmentView, PaymentProof, SettlementReport, WalletSource,
};
use crate::ledger::{self, BalanceSource, EntryStatus, EntryType};

/// Investment service for the full investment lifecycle
#[derive(Clone)]
pub struct InvestmentService {
    db_pool: PgPool,
}

impl InvestmentService {
    /// Create a new investment service instance
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Open an investment for a user.
    ///
    /// Main-wallet investments debit the balance synchronously and start
    /// ongoing; gateway investments are persisted pending (with their payment
    /// proof) and wait for admin approval, with no debit.
    pub async fn create(
        &self,
        user_id: Uuid,
        request: CreateInvestmentRequest,
    ) -> Result<Investment, EngineError> {
        if request.amount <= Decimal::ZERO {
            return Err(EngineError::Validation(
                "Investment amount must be greater than 0".to_string(),
            ));
        }

        let bot = sqlx::query_as::<_, Bot>("SELECT * FROM bots WHERE id = $1")
            .bind(request.bot_id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or(EngineError::NotFound("bot"))?;

        if !bot.is_active {
            return Err(EngineError::Validation(format!(
                "Bot '{}' is not open for investment",
                bot.name
            )));
        }
        if request.amount < bot.min_invest || request.amount > bot.max_invest {
            return Err(EngineError::Validation(format!(
                "Amount must be between {} and {} for bot '{}'",
                bot.min_invest, bot.max_invest, bot.name
            )));
        }

        match request.wallet {
            WalletSource::Main => self.create_from_main(user_id, &bot, request.amount).await,
            WalletSource::Gateway => {
                let proof_url = request.proof_url.as_deref().filter(|u| !u.is_empty()).ok_or_else(
                    || {
                        EngineError::Validation(
                            "Gateway investments require a payment proof".to_string(),
                        )
                    },
                )?;
                self.create_from_gateway(user_id, &bot, request.amount, proof_url)
                    .await
            }
        }
    }

    /// Main-wallet path: debit and activate in one transaction
    async fn create_from_main(
        &self,
        user_id: Uuid,
        bot: &Bot,
        amount: Decimal,
    ) -> Result<Investment, EngineError> {
        let mut tx = self.db_pool.begin().await?;

        let user = ledger::lock_user(&mut *tx, user_id).await?;
        ledger::debit_balance(&mut *tx, &user, BalanceSource::Main, amount).await?;

        let entry = ledger::insert_entry(
            &mut *tx,
            user_id,
            amount,
            EntryType::Investment,
            EntryStatus::Completed,
            &format!("Investment in {}", bot.name),
        )
        .await?;

        let investment =
            insert_investment(&mut *tx, user_id, bot, entry.id, amount, WalletSource::Main).await?;

        tx.commit().await?;

        tracing::info!(
            investment_id = %investment.id,
            user_id = %user_id,
            amount = %amount,
            "Investment activated from main wallet"
        );

        Ok(investment)
    }

    /// Gateway path: pending row plus payment proof, no debit
    async fn create_from_gateway(
        &self,
        user_id: Uuid,
        bot: &Bot,
        amount: Decimal,
        proof_url: &str,
    ) -> Result<Investment, EngineError> {
        let mut tx = self.db_pool.begin().await?;

        // At most one in-flight gateway request per user
        let has_pending = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM investments WHERE user_id = $1 AND status = 'pending')",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        if has_pending {
            return Err(EngineError::Conflict(
                "A pending investment request already exists".to_string(),
            ));
        }

        let entry = ledger::insert_entry(
            &mut *tx,
            user_id,
            amount,
            EntryType::Investment,
            EntryStatus::Pending,
            &format!("Investment in {} (awaiting approval)", bot.name),
        )
        .await?;

        let investment = insert_investment(
            &mut *tx,
            user_id,
            bot,
            entry.id,
            amount,
            WalletSource::Gateway,
        )
        .await?;

        sqlx::query(
            "INSERT INTO payment_proofs (id, investment_id, proof_url, created_at) VALUES ($1, $2, $3, NOW())",
        )
        .bind(Uuid::new_v4())
        .bind(investment.id)
        .bind(proof_url)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            investment_id = %investment.id,
            user_id = %user_id,
            amount = %amount,
            "Gateway investment submitted for approval"
        );

        Ok(investment)
    }

    /// A user's investments, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Investment>, EngineError> {
        let investments = sqlx::query_as::<_, Investment>(
            "SELECT * FROM investments WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(investments)
    }

    /// A user's investments with their accrual position re-derived for display
    pub async fn views_for_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<InvestmentView>, EngineError> {
        let investments = self.list_for_user(user_id).await?;
        Ok(investments
            .into_iter()
            .map(|inv| build_view(inv, now))
            .collect())
    }

    /// Settle every matured investment of one user in a single transaction.
    ///
    /// Principal returns to `balance`, outstanding profit to `profit_balance`,
    /// with at most one combined capital-return entry and one combined
    /// profit-completion entry for the whole batch. The status flip commits
    /// atomically with the credit, so a re-invocation finds nothing left to
    /// settle. Any error aborts the whole batch.
    pub async fn settle_matured(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<SettlementReport, EngineError> {
        let mut tx = self.db_pool.begin().await?;

        // Lock order is user row first, then investments - the accrual job
        // takes the same order, so the two never deadlock on each other.
        let user = ledger::lock_user(&mut *tx, user_id).await?;

        let candidates = sqlx::query_as::<_, Investment>(
            r#"
            SELECT * FROM investments
            WHERE user_id = $1 AND status = 'ongoing' AND duration_days IS NOT NULL
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        let matured: Vec<&Investment> = candidates
            .iter()
            .filter(|inv| is_matured(inv.duration_days, days_elapsed(inv.created_at, now)))
            .collect();

        if matured.is_empty() {
            return Ok(SettlementReport::default());
        }

        let mut capital_total = Decimal::ZERO;
        let mut profit_total = Decimal::ZERO;
        for inv in &matured {
            capital_total += inv.amount;
            // Fallback for investments the accrual job never finalized
            profit_total += inv
                .total_profit_amount
                .unwrap_or_else(|| daily_profit(inv.amount, inv.interest_rate));
        }

        ledger::credit_balance(&mut *tx, user.id, BalanceSource::Main, capital_total).await?;
        ledger::credit_balance(&mut *tx, user.id, BalanceSource::Profit, profit_total).await?;

        ledger::insert_entry(
            &mut *tx,
            user_id,
            capital_total,
            EntryType::CapitalReturn,
            EntryStatus::Completed,
            &format!("Capital returned for {} matured investment(s)", matured.len()),
        )
        .await?;
        ledger::insert_entry(
            &mut *tx,
            user_id,
            profit_total,
            EntryType::ProfitCompletion,
            EntryStatus::Completed,
            &format!("Profit completed for {} matured investment(s)", matured.len()),
        )
        .await?;

        for inv in &matured {
            let final_profit = inv
                .total_profit_amount
                .unwrap_or_else(|| daily_profit(inv.amount, inv.interest_rate));
            sqlx::query(
                r#"
                UPDATE investments
                SET status = 'completed', total_profit_amount = $1, updated_at = NOW()
                WHERE id = $2
                "#,
            )
            .bind(final_profit)
            .bind(inv.id)
            .execute(&mut *tx)
            .await?;
        }

        let report = SettlementReport {
            settled_investments: matured.len(),
            capital_returned: capital_total,
            profit_returned: profit_total,
        };

        tx.commit().await?;

        tracing::info!(
            user_id = %user_id,
            settled = report.settled_investments,
            capital = %report.capital_returned,
            profit = %report.profit_returned,
            "Matured investments settled"
        );

        Ok(report)
    }

    /// Pending gateway investments awaiting an admin decision
    pub async fn list_pending(&self) -> Result<Vec<Investment>, EngineError> {
        let investments = sqlx::query_as::<_, Investment>(
            "SELECT * FROM investments WHERE status = 'pending' ORDER BY created_at",
        )
        .fetch_all(&self.db_pool)
        .await?;

        Ok(investments)
    }

    /// Payment proof for an investment, if present
    pub async fn get_proof(&self, investment_id: Uuid) -> Result<Option<PaymentProof>, EngineError> {
        let proof = sqlx::query_as::<_, PaymentProof>(
            "SELECT * FROM payment_proofs WHERE investment_id = $1",
        )
        .bind(investment_id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(proof)
    }

    /// Admin decision on a pending gateway investment
    pub async fn resolve_pending(
        &self,
        investment_id: Uuid,
        decision: Decision,
    ) -> Result<(), EngineError> {
        resolve_request(&self.db_pool, &GatewayInvestmentFlow, investment_id, decision).await?;
        Ok(())
    }
}

/// Insert an investment row with rate/duration snapshots from the bot
async fn insert_investment(
    conn: &mut PgConnection,
    user_id: Uuid,
    bot: &Bot,
    entry_id: Uuid,
    amount: Decimal,
    wallet: WalletSource,
) -> Result<Investment, EngineError> {
    let status = match wallet {
        WalletSource::Main => InvestmentStatus::Ongoing,
        WalletSource::Gateway => InvestmentStatus::Pending,
    };

    let investment = sqlx::query_as::<_, Investment>(
        r#"
        INSERT INTO investments (
            id, user_id, bot_id, transaction_id, amount, wallet, status,
            interest_rate, duration_days, capital_back, days_credited,
            last_credited_at, total_profit_amount, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, true, 0, NULL, NULL, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(bot.id)
    .bind(entry_id)
    .bind(amount)
    .bind(wallet)
    .bind(status)
    .bind(bot.return_percentage)
    .bind(bot.duration_days)
    .fetch_one(conn)
    .await?;

    Ok(investment)
}

/// Derive the display view of one investment
fn build_view(investment: Investment, now: DateTime<Utc>) -> InvestmentView {
    let elapsed = days_elapsed(investment.created_at, now);
    let matured = is_matured(investment.duration_days, elapsed);
    let daily = daily_profit(investment.amount, investment.interest_rate);

    let uncredited_days = if investment.status == InvestmentStatus::Ongoing && !matured {
        (elapsed - investment.days_credited as i64).max(0)
    } else {
        0
    };

    InvestmentView {
        days_elapsed: elapsed,
        daily_profit: daily,
        uncredited_days,
        uncredited_profit: daily * Decimal::from(uncredited_days),
        matured,
        investment,
    }
}

/// Approval flow for gateway investments. Principal was paid off-platform, so
/// approval never debits; rejection fails the paired entry and deletes the
/// payment proof.
pub struct GatewayInvestmentFlow;

#[async_trait]
impl ApprovableFlow for GatewayInvestmentFlow {
    fn kind(&self) -> &'static str {
        "investment"
    }

    async fn lock_pending(
        &self,
        conn: &mut PgConnection,
        request_id: Uuid,
    ) -> Result<PendingTicket, EngineError> {
        let investment =
            sqlx::query_as::<_, Investment>("SELECT * FROM investments WHERE id = $1 FOR UPDATE")
                .bind(request_id)
                .fetch_optional(conn)
                .await?
                .ok_or(EngineError::NotFound("investment"))?;

        if investment.status != InvestmentStatus::Pending {
            return Err(EngineError::Conflict(
                "Investment request has already been processed".to_string(),
            ));
        }

        Ok(PendingTicket {
            request_id: investment.id,
            user_id: investment.user_id,
            amount: investment.amount,
            entry_id: investment.transaction_id,
        })
    }

    async fn approve(
        &self,
        conn: &mut PgConnection,
        ticket: &PendingTicket,
    ) -> Result<(), EngineError> {
        sqlx::query("UPDATE investments SET status = 'ongoing', updated_at = NOW() WHERE id = $1")
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
        sqlx::query("UPDATE investments SET status = 'rejected', updated_at = NOW() WHERE id = $1")
            .bind(ticket.request_id)
            .execute(&mut *conn)
            .await?;

        ledger::mark_entry(&mut *conn, ticket.entry_id, EntryStatus::Failed).await?;

        // The proof of a rejected investment is not retained
        sqlx::query("DELETE FROM payment_proofs WHERE investment_id = $1")
            .bind(ticket.request_id)
            .execute(conn)
            .await?;

        Ok(())
    }
}
