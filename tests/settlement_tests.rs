//! Settlement tests: maturity detection, batching, and exactly-once crediting

mod common;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use botvault_server::investment::{InvestmentService, InvestmentStatus};
use botvault_server::ledger::{EntryStatus, EntryType};

#[tokio::test]
#[ignore] // Requires database setup
async fn test_settlement_returns_capital_and_profit() {
    let pool = common::setup_test_db().await;
    let user = common::seed_user(&pool).await;
    let bot_id = common::seed_bot(&pool, dec!(10), Some(30)).await;

    let investment_id = common::seed_ongoing_investment(
        &pool,
        user.id,
        bot_id,
        dec!(300),
        dec!(10),
        Some(30),
        Utc::now() - Duration::days(31),
    )
    .await;

    let service = InvestmentService::new(pool.clone());
    let report = service.settle_matured(user.id, Utc::now()).await.unwrap();

    assert_eq!(report.settled_investments, 1);
    assert_eq!(report.capital_returned, dec!(300));
    // Profit falls back to one daily slice when accrual never finalized it
    assert_eq!(report.profit_returned, dec!(30));

    let reloaded = common::reload_user(&pool, user.id).await;
    assert_eq!(reloaded.balance, dec!(300));
    assert_eq!(reloaded.profit_balance, dec!(30));

    let (status, total_profit) = sqlx::query_as::<_, (InvestmentStatus, Option<Decimal>)>(
        "SELECT status, total_profit_amount FROM investments WHERE id = $1",
    )
    .bind(investment_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(status, InvestmentStatus::Completed);
    assert_eq!(total_profit, Some(dec!(30)));
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_settlement_is_exactly_once() {
    let pool = common::setup_test_db().await;
    let user = common::seed_user(&pool).await;
    let bot_id = common::seed_bot(&pool, dec!(10), Some(30)).await;

    common::seed_ongoing_investment(
        &pool,
        user.id,
        bot_id,
        dec!(300),
        dec!(10),
        Some(30),
        Utc::now() - Duration::days(40),
    )
    .await;

    let service = InvestmentService::new(pool.clone());
    service.settle_matured(user.id, Utc::now()).await.unwrap();
    let second = service.settle_matured(user.id, Utc::now()).await.unwrap();
    let third = service.settle_matured(user.id, Utc::now()).await.unwrap();

    // The status flip committed with the credit, so re-invocations find
    // nothing ongoing and matured
    assert_eq!(second.settled_investments, 0);
    assert_eq!(third.settled_investments, 0);

    let reloaded = common::reload_user(&pool, user.id).await;
    assert_eq!(reloaded.balance, dec!(300));

    assert_eq!(
        common::count_entries(&pool, user.id, EntryType::CapitalReturn, EntryStatus::Completed)
            .await,
        1
    );
    assert_eq!(
        common::count_entries(
            &pool,
            user.id,
            EntryType::ProfitCompletion,
            EntryStatus::Completed
        )
        .await,
        1
    );
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_settlement_batches_into_combined_entries() {
    let pool = common::setup_test_db().await;
    let user = common::seed_user(&pool).await;
    let bot_id = common::seed_bot(&pool, dec!(10), Some(30)).await;

    for amount in [dec!(100), dec!(200), dec!(300)] {
        common::seed_ongoing_investment(
            &pool,
            user.id,
            bot_id,
            amount,
            dec!(10),
            Some(30),
            Utc::now() - Duration::days(45),
        )
        .await;
    }

    let service = InvestmentService::new(pool.clone());
    let report = service.settle_matured(user.id, Utc::now()).await.unwrap();

    assert_eq!(report.settled_investments, 3);
    assert_eq!(report.capital_returned, dec!(600));
    assert_eq!(report.profit_returned, dec!(60));

    // One combined entry per type for the whole batch, not one per investment
    assert_eq!(
        common::count_entries(&pool, user.id, EntryType::CapitalReturn, EntryStatus::Completed)
            .await,
        1
    );
    assert_eq!(
        common::count_entries(
            &pool,
            user.id,
            EntryType::ProfitCompletion,
            EntryStatus::Completed
        )
        .await,
        1
    );
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_unmatured_and_perpetual_left_alone() {
    let pool = common::setup_test_db().await;
    let user = common::seed_user(&pool).await;
    let bot_id = common::seed_bot(&pool, dec!(10), Some(30)).await;
    let perpetual_bot_id = common::seed_bot(&pool, dec!(10), None).await;

    // Five days in on a 30-day plan
    common::seed_ongoing_investment(
        &pool,
        user.id,
        bot_id,
        dec!(300),
        dec!(10),
        Some(30),
        Utc::now() - Duration::days(5),
    )
    .await;
    // Perpetual plan never matures no matter how old
    common::seed_ongoing_investment(
        &pool,
        user.id,
        perpetual_bot_id,
        dec!(500),
        dec!(10),
        None,
        Utc::now() - Duration::days(365),
    )
    .await;

    let service = InvestmentService::new(pool.clone());
    let report = service.settle_matured(user.id, Utc::now()).await.unwrap();

    assert_eq!(report.settled_investments, 0);

    let reloaded = common::reload_user(&pool, user.id).await;
    assert_eq!(reloaded.balance, Decimal::ZERO);
    assert_eq!(reloaded.profit_balance, Decimal::ZERO);
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_settlement_uses_finalized_profit_when_present() {
    let pool = common::setup_test_db().await;
    let user = common::seed_user(&pool).await;
    let bot_id = common::seed_bot(&pool, dec!(10), Some(30)).await;

    let investment_id = common::seed_ongoing_investment(
        &pool,
        user.id,
        bot_id,
        dec!(300),
        dec!(10),
        Some(30),
        Utc::now() - Duration::days(31),
    )
    .await;

    sqlx::query("UPDATE investments SET total_profit_amount = $1 WHERE id = $2")
        .bind(dec!(900))
        .bind(investment_id)
        .execute(&pool)
        .await
        .unwrap();

    let service = InvestmentService::new(pool.clone());
    let report = service.settle_matured(user.id, Utc::now()).await.unwrap();

    assert_eq!(report.profit_returned, dec!(900));
}
