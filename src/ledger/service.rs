//! Balance mutation helpers and ledger writes.
//!
//! Every helper takes `&mut PgConnection` so it runs inside the caller's
//! transaction: a balance change and its paired ledger/status writes either
//! all commit or all roll back.

use rust_decimal::Decimal;
use sqlx::postgres::PgConnection;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::EngineError;
use crate::ledger::{BalanceSource, EntryStatus, EntryType, LedgerEntry};
use crate::models::User;

/// Re-read a user row with a row lock, so concurrent balance mutations on the
/// same user serialize instead of acting on stale values.
pub async fn lock_user(conn: &mut PgConnection, user_id: Uuid) -> Result<User, EngineError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 FOR UPDATE")
        .bind(user_id)
        .fetch_optional(conn)
        .await?
        .ok_or(EngineError::NotFound("user"))?;

    Ok(user)
}

/// Funds available on the selected balance field
pub fn available(user: &User, source: BalanceSource) -> Decimal {
    match source {
        BalanceSource::Main => user.balance,
        BalanceSource::Profit => user.profit_balance,
    }
}

/// Credit `amount` to the selected balance field
pub async fn credit_balance(
    conn: &mut PgConnection,
    user_id: Uuid,
    source: BalanceSource,
    amount: Decimal,
) -> Result<(), EngineError> {
    let sql = format!(
        "UPDATE users SET {col} = {col} + $1, updated_at = NOW() WHERE id = $2",
        col = source.column()
    );
    sqlx::query(&sql).bind(amount).bind(user_id).execute(conn).await?;

    Ok(())
}

/// Debit `amount` from the selected balance field of an already-locked user.
///
/// The caller must hold the row lock (`lock_user`) so the sufficiency check
/// and the update cannot interleave with a concurrent debit.
pub async fn debit_balance(
    conn: &mut PgConnection,
    user: &User,
    source: BalanceSource,
    amount: Decimal,
) -> Result<(), EngineError> {
    let funds = available(user, source);
    if funds < amount {
        return Err(EngineError::InsufficientBalance {
            available: funds,
            requested: amount,
        });
    }

    let sql = format!(
        "UPDATE users SET {col} = {col} - $1, updated_at = NOW() WHERE id = $2",
        col = source.column()
    );
    sqlx::query(&sql).bind(amount).bind(user.id).execute(conn).await?;

    Ok(())
}

/// Append a ledger entry
pub async fn insert_entry(
    conn: &mut PgConnection,
    user_id: Uuid,
    amount: Decimal,
    entry_type: EntryType,
    status: EntryStatus,
    description: &str,
) -> Result<LedgerEntry, EngineError> {
    let entry = sqlx::query_as::<_, LedgerEntry>(
        r#"
        INSERT INTO ledger_entries (id, user_id, amount, entry_type, status, description, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(amount)
    .bind(entry_type)
    .bind(status)
    .bind(description)
    .fetch_one(conn)
    .await?;

    Ok(entry)
}

/// Flip a pending entry to its terminal status
pub async fn mark_entry(
    conn: &mut PgConnection,
    entry_id: Uuid,
    status: EntryStatus,
) -> Result<(), EngineError> {
    sqlx::query("UPDATE ledger_entries SET status = $1 WHERE id = $2")
        .bind(status)
        .bind(entry_id)
        .execute(conn)
        .await?;

    Ok(())
}

/// A user's ledger entries, newest first
pub async fn list_for_user(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<LedgerEntry>, EngineError> {
    let entries = sqlx::query_as::<_, LedgerEntry>(
        "SELECT * FROM ledger_entries WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}
