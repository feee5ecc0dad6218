//! Shared helpers for database-backed integration tests
//!
//! These tests run against TEST_DATABASE_URL with the crate's migrations
//! applied; everything they create is keyed by fresh UUIDs so suites can
//! share one database.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use botvault_server::investment::{InvestmentStatus, WalletSource};
use botvault_server::ledger::{EntryStatus, EntryType};
use botvault_server::models::User;

/// Connect to the test database and ensure the schema is current
pub async fn setup_test_db() -> PgPool {
    let database_url = std::env::var("TEST_DATABASE_URL")
        .unwrap_or_else(|_| "postgresql://localhost/botvault_test".to_string());

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Insert a member with zeroed balances
pub async fn seed_user(pool: &PgPool) -> User {
    let id = Uuid::new_v4();
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (
            id, external_subject, email, name, role, balance, profit_balance,
            recovery_fund, referral_code, referred_by, created_at, updated_at
        )
        VALUES ($1, $2, NULL, 'Test Member', 'member', 0, 0, 0, $3, NULL, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(format!("test|{}", id))
    .bind(id.to_string().replace('-', "")[..8].to_uppercase())
    .fetch_one(pool)
    .await
    .expect("Failed to seed user")
}

/// Set a user's main balance directly
pub async fn fund_user(pool: &PgPool, user_id: Uuid, balance: Decimal) {
    sqlx::query("UPDATE users SET balance = $1 WHERE id = $2")
        .bind(balance)
        .bind(user_id)
        .execute(pool)
        .await
        .expect("Failed to fund user");
}

/// Re-read a user row
pub async fn reload_user(pool: &PgPool, user_id: Uuid) -> User {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("Failed to reload user")
}

/// Insert a bot plan
pub async fn seed_bot(
    pool: &PgPool,
    return_percentage: Decimal,
    duration_days: Option<i32>,
) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO bots (
            id, name, return_percentage, duration_days, min_invest, max_invest,
            is_active, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, 1, 1000000, TRUE, NOW(), NOW())
        "#,
    )
    .bind(id)
    .bind(format!("bot-{}", id))
    .bind(return_percentage)
    .bind(duration_days)
    .execute(pool)
    .await
    .expect("Failed to seed bot");

    id
}

/// Insert an ongoing investment started at `created_at`, with its paired
/// completed ledger entry
pub async fn seed_ongoing_investment(
    pool: &PgPool,
    user_id: Uuid,
    bot_id: Uuid,
    amount: Decimal,
    interest_rate: Decimal,
    duration_days: Option<i32>,
    created_at: DateTime<Utc>,
) -> Uuid {
    let entry_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO ledger_entries (id, user_id, amount, entry_type, status, description, created_at)
        VALUES ($1, $2, $3, $4, $5, 'Investment', $6)
        "#,
    )
    .bind(entry_id)
    .bind(user_id)
    .bind(amount)
    .bind(EntryType::Investment)
    .bind(EntryStatus::Completed)
    .bind(created_at)
    .execute(pool)
    .await
    .expect("Failed to seed ledger entry");

    let investment_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO investments (
            id, user_id, bot_id, transaction_id, amount, wallet, status,
            interest_rate, duration_days, capital_back, days_credited,
            last_credited_at, total_profit_amount, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, TRUE, 0, NULL, NULL, $10, $10)
        "#,
    )
    .bind(investment_id)
    .bind(user_id)
    .bind(bot_id)
    .bind(entry_id)
    .bind(amount)
    .bind(WalletSource::Main)
    .bind(InvestmentStatus::Ongoing)
    .bind(interest_rate)
    .bind(duration_days)
    .bind(created_at)
    .execute(pool)
    .await
    .expect("Failed to seed investment");

    investment_id
}

/// Count this user's ledger entries of one type/status
pub async fn count_entries(
    pool: &PgPool,
    user_id: Uuid,
    entry_type: EntryType,
    status: EntryStatus,
) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM ledger_entries WHERE user_id = $1 AND entry_type = $2 AND status = $3",
    )
    .bind(user_id)
    .bind(entry_type)
    .bind(status)
    .fetch_one(pool)
    .await
    .expect("Failed to count entries")
}
