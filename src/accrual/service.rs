//! Daily accrual service - credits elapsed whole days of interest on every
//! ongoing investment.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::accrual::AccrualReport;
use crate::error::EngineError;
use crate::investment::{daily_profit, days_elapsed, is_matured, Investment};
use crate::ledger::{self, BalanceSource, EntryStatus, EntryType};

/// Runs the daily accrual batch. Invoked by the external job trigger (and
/// optionally by the in-process schedule); safe to invoke any number of times
/// per day.
#[derive(Clone)]
pub struct AccrualService {
    db_pool: PgPool,
}

/// What happened to a single investment during a batch pass
enum AccrualOutcome {
    Credited(Decimal),
    Skipped,
}

impl AccrualService {
    /// Create a new accrual service instance
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// One batch pass over every ongoing investment.
    ///
    /// Each investment is credited in its own transaction: a failure rolls
    /// back that investment only and the batch continues. `days_credited` is
    /// the watermark - only days strictly above it are credited, which makes
    /// the whole pass idempotent.
    pub async fn run_daily_accrual(
        &self,
        now: DateTime<Utc>,
    ) -> Result<AccrualReport, EngineError> {
        let investments = sqlx::query_as::<_, Investment>(
            "SELECT * FROM investments WHERE status = 'ongoing' ORDER BY created_at",
        )
        .fetch_all(&self.db_pool)
        .await?;

        let mut report = AccrualReport {
            scanned: investments.len(),
            ..Default::default()
        };

        for investment in &investments {
            match self.accrue_one(investment, now).await {
                Ok(AccrualOutcome::Credited(amount)) => {
                    report.credited += 1;
                    report.total_credited += amount;
                }
                Ok(AccrualOutcome::Skipped) => report.skipped += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::error!(
                        investment_id = %investment.id,
                        user_id = %investment.user_id,
                        error = %e,
                        "Accrual failed for investment, continuing batch"
                    );
                }
            }
        }

        tracing::info!(
            scanned = report.scanned,
            credited = report.credited,
            skipped = report.skipped,
            failed = report.failed,
            total = %report.total_credited,
            "Daily accrual batch finished"
        );

        Ok(report)
    }

    /// Credit one investment's outstanding whole days, if any
    async fn accrue_one(
        &self,
        investment: &Investment,
        now: DateTime<Utc>,
    ) -> Result<AccrualOutcome, EngineError> {
        // A non-positive rate snapshot means the plan had no rate configured
        if investment.interest_rate <= Decimal::ZERO {
            tracing::debug!(investment_id = %investment.id, "No rate configured, skipping");
            return Ok(AccrualOutcome::Skipped);
        }

        let elapsed = days_elapsed(investment.created_at, now);

        // Matured investments are settlement's job; crediting them here too
        // would pay the final stretch twice
        if is_matured(investment.duration_days, elapsed) {
            tracing::debug!(investment_id = %investment.id, "Matured, deferring to settlement");
            return Ok(AccrualOutcome::Skipped);
        }

        let days_to_credit = elapsed - investment.days_credited as i64;
        if days_to_credit <= 0 {
            return Ok(AccrualOutcome::Skipped);
        }

        let credit = daily_profit(investment.amount, investment.interest_rate)
            * Decimal::from(days_to_credit);

        let mut tx = self.db_pool.begin().await?;

        // Missing user aborts this investment's transaction only
        let user = ledger::lock_user(&mut *tx, investment.user_id).await?;

        ledger::credit_balance(&mut *tx, user.id, BalanceSource::Profit, credit).await?;
        ledger::insert_entry(
            &mut *tx,
            user.id,
            credit,
            EntryType::Interest,
            EntryStatus::Completed,
            &format!("Daily interest for {} day(s)", days_to_credit),
        )
        .await?;

        sqlx::query(
            r#"
            UPDATE investments
            SET days_credited = $1, last_credited_at = $2, updated_at = NOW()
            WHERE id = $3
            "#,
        )
        .bind(elapsed as i32)
        .bind(now)
        .bind(investment.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            investment_id = %investment.id,
            user_id = %investment.user_id,
            days = days_to_credit,
            credit = %credit,
            "Interest credited"
        );

        Ok(AccrualOutcome::Credited(credit))
    }
}
