//! Approval state machine tests: deposits, withdrawals, gateway investments

mod common;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use botvault_server::approval::Decision;
use botvault_server::error::EngineError;
use botvault_server::investment::{
    CreateInvestmentRequest, InvestmentService, InvestmentStatus, WalletSource,
};
use botvault_server::ledger::{BalanceSource, EntryStatus, EntryType};
use botvault_server::settings::SettingsService;
use botvault_server::wallet::{CreateDepositRequest, CreateWithdrawalRequest, WalletService};

fn wallet_service(pool: &sqlx::PgPool) -> WalletService {
    WalletService::new(pool.clone(), SettingsService::new(pool.clone()))
}

fn deposit_request(amount: Decimal) -> CreateDepositRequest {
    CreateDepositRequest {
        amount,
        proof_url: "https://img.example/proof.png".to_string(),
    }
}

// ============================================================================
// Deposits
// ============================================================================

#[tokio::test]
#[ignore] // Requires database setup
async fn test_deposit_approval_conservation() {
    let pool = common::setup_test_db().await;
    let user = common::seed_user(&pool).await;
    let service = wallet_service(&pool);

    let deposit = service
        .create_deposit(user.id, deposit_request(dec!(500)))
        .await
        .unwrap();

    // Nothing moves until approval
    assert_eq!(common::reload_user(&pool, user.id).await.balance, Decimal::ZERO);

    service
        .resolve_deposit(deposit.id, Decision::Approve)
        .await
        .unwrap();

    // Balance up by exactly the deposit, one completed deposit entry
    let reloaded = common::reload_user(&pool, user.id).await;
    assert_eq!(reloaded.balance, dec!(500));
    assert_eq!(
        common::count_entries(&pool, user.id, EntryType::Deposit, EntryStatus::Completed).await,
        1
    );
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_single_inflight_deposit_per_user() {
    let pool = common::setup_test_db().await;
    let user = common::seed_user(&pool).await;
    let service = wallet_service(&pool);

    service
        .create_deposit(user.id, deposit_request(dec!(100)))
        .await
        .unwrap();

    let second = service.create_deposit(user.id, deposit_request(dec!(200))).await;
    assert!(matches!(second, Err(EngineError::Conflict(_))));
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_already_processed_is_a_conflict() {
    let pool = common::setup_test_db().await;
    let user = common::seed_user(&pool).await;
    let service = wallet_service(&pool);

    let deposit = service
        .create_deposit(user.id, deposit_request(dec!(100)))
        .await
        .unwrap();

    service
        .resolve_deposit(deposit.id, Decision::Approve)
        .await
        .unwrap();

    // A second decision on the same request is rejected, not silently ignored
    let again = service.resolve_deposit(deposit.id, Decision::Approve).await;
    assert!(matches!(again, Err(EngineError::Conflict(_))));

    // And the balance was credited exactly once
    assert_eq!(common::reload_user(&pool, user.id).await.balance, dec!(100));
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_deposit_rejection_leaves_balances_untouched() {
    let pool = common::setup_test_db().await;
    let user = common::seed_user(&pool).await;
    let service = wallet_service(&pool);

    let deposit = service
        .create_deposit(user.id, deposit_request(dec!(750)))
        .await
        .unwrap();

    service
        .resolve_deposit(deposit.id, Decision::Reject)
        .await
        .unwrap();

    let reloaded = common::reload_user(&pool, user.id).await;
    assert_eq!(reloaded.balance, Decimal::ZERO);
    assert_eq!(reloaded.profit_balance, Decimal::ZERO);
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_zero_amount_deposit_rejected() {
    let pool = common::setup_test_db().await;
    let user = common::seed_user(&pool).await;
    let service = wallet_service(&pool);

    let result = service.create_deposit(user.id, deposit_request(Decimal::ZERO)).await;
    assert!(matches!(result, Err(EngineError::Validation(_))));
}

// ============================================================================
// Withdrawals
// ============================================================================

#[tokio::test]
#[ignore] // Requires database setup
async fn test_withdrawal_debits_gross_amount() {
    let pool = common::setup_test_db().await;
    let user = common::seed_user(&pool).await;
    common::fund_user(&pool, user.id, dec!(1000)).await;
    let service = wallet_service(&pool);

    let withdrawal = service
        .create_withdrawal(
            user.id,
            CreateWithdrawalRequest {
                amount: dec!(200),
                balance_source: BalanceSource::Main,
            },
        )
        .await
        .unwrap();

    // 5% fee split is stored on the request, advisory only
    assert_eq!(withdrawal.charges, dec!(10));
    assert_eq!(withdrawal.net_amount, dec!(190));

    service
        .resolve_withdrawal(withdrawal.id, Decision::Approve)
        .await
        .unwrap();

    // The GROSS amount comes off the balance, never the net
    let reloaded = common::reload_user(&pool, user.id).await;
    assert_eq!(reloaded.balance, dec!(800));
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_insufficient_balance_rechecked_at_approval() {
    let pool = common::setup_test_db().await;
    let user = common::seed_user(&pool).await;
    common::fund_user(&pool, user.id, dec!(500)).await;
    let service = wallet_service(&pool);

    let withdrawal = service
        .create_withdrawal(
            user.id,
            CreateWithdrawalRequest {
                amount: dec!(400),
                balance_source: BalanceSource::Main,
            },
        )
        .await
        .unwrap();

    // Funds drain between creation and approval
    common::fund_user(&pool, user.id, dec!(50)).await;

    let result = service
        .resolve_withdrawal(withdrawal.id, Decision::Approve)
        .await;
    assert!(matches!(
        result,
        Err(EngineError::InsufficientBalance { .. })
    ));

    // The whole approval rolled back: balance intact, request still pending
    assert_eq!(common::reload_user(&pool, user.id).await.balance, dec!(50));
    let status = sqlx::query_scalar::<_, String>(
        "SELECT status::text FROM withdrawal_requests WHERE id = $1",
    )
    .bind(withdrawal.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(status, "pending");
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_withdrawal_from_profit_balance() {
    let pool = common::setup_test_db().await;
    let user = common::seed_user(&pool).await;
    sqlx::query("UPDATE users SET profit_balance = $1 WHERE id = $2")
        .bind(dec!(300))
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();
    let service = wallet_service(&pool);

    let withdrawal = service
        .create_withdrawal(
            user.id,
            CreateWithdrawalRequest {
                amount: dec!(100),
                balance_source: BalanceSource::Profit,
            },
        )
        .await
        .unwrap();

    service
        .resolve_withdrawal(withdrawal.id, Decision::Approve)
        .await
        .unwrap();

    let reloaded = common::reload_user(&pool, user.id).await;
    assert_eq!(reloaded.profit_balance, dec!(200));
    assert_eq!(reloaded.balance, Decimal::ZERO);
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_withdrawals_toggle_gates_creation() {
    let pool = common::setup_test_db().await;
    let user = common::seed_user(&pool).await;
    common::fund_user(&pool, user.id, dec!(1000)).await;
    let settings = SettingsService::new(pool.clone());
    let service = WalletService::new(pool.clone(), settings.clone());

    settings.set_withdrawals_enabled(false, user.id).await.unwrap();

    let result = service
        .create_withdrawal(
            user.id,
            CreateWithdrawalRequest {
                amount: dec!(100),
                balance_source: BalanceSource::Main,
            },
        )
        .await;
    assert!(matches!(result, Err(EngineError::WithdrawalsDisabled)));

    settings.set_withdrawals_enabled(true, user.id).await.unwrap();
}

// ============================================================================
// Gateway investments
// ============================================================================

#[tokio::test]
#[ignore] // Requires database setup
async fn test_gateway_investment_approval_never_debits() {
    let pool = common::setup_test_db().await;
    let user = common::seed_user(&pool).await;
    common::fund_user(&pool, user.id, dec!(1000)).await;
    let bot_id = common::seed_bot(&pool, dec!(10), Some(30)).await;
    let service = InvestmentService::new(pool.clone());

    let investment = service
        .create(
            user.id,
            CreateInvestmentRequest {
                bot_id,
                amount: dec!(250),
                wallet: WalletSource::Gateway,
                proof_url: Some("https://img.example/payment.png".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(investment.status, InvestmentStatus::Pending);

    service
        .resolve_pending(investment.id, Decision::Approve)
        .await
        .unwrap();

    // Principal was paid off-platform: the balance is untouched
    assert_eq!(common::reload_user(&pool, user.id).await.balance, dec!(1000));

    let status = sqlx::query_scalar::<_, String>("SELECT status::text FROM investments WHERE id = $1")
        .bind(investment.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, "ongoing");
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_gateway_rejection_fails_entry_and_drops_proof() {
    let pool = common::setup_test_db().await;
    let user = common::seed_user(&pool).await;
    let bot_id = common::seed_bot(&pool, dec!(10), Some(30)).await;
    let service = InvestmentService::new(pool.clone());

    let investment = service
        .create(
            user.id,
            CreateInvestmentRequest {
                bot_id,
                amount: dec!(250),
                wallet: WalletSource::Gateway,
                proof_url: Some("https://img.example/payment.png".to_string()),
            },
        )
        .await
        .unwrap();
    assert!(service.get_proof(investment.id).await.unwrap().is_some());

    service
        .resolve_pending(investment.id, Decision::Reject)
        .await
        .unwrap();

    assert!(service.get_proof(investment.id).await.unwrap().is_none());
    assert_eq!(
        common::count_entries(&pool, user.id, EntryType::Investment, EntryStatus::Failed).await,
        1
    );
    assert_eq!(common::reload_user(&pool, user.id).await.balance, Decimal::ZERO);
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_main_wallet_investment_debits_synchronously() {
    let pool = common::setup_test_db().await;
    let user = common::seed_user(&pool).await;
    common::fund_user(&pool, user.id, dec!(1000)).await;
    let bot_id = common::seed_bot(&pool, dec!(10), Some(30)).await;
    let service = InvestmentService::new(pool.clone());

    let investment = service
        .create(
            user.id,
            CreateInvestmentRequest {
                bot_id,
                amount: dec!(400),
                wallet: WalletSource::Main,
                proof_url: None,
            },
        )
        .await
        .unwrap();

    // No approval queue: ongoing immediately, principal debited
    assert_eq!(investment.status, InvestmentStatus::Ongoing);
    assert_eq!(common::reload_user(&pool, user.id).await.balance, dec!(600));
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_main_wallet_investment_requires_funds() {
    let pool = common::setup_test_db().await;
    let user = common::seed_user(&pool).await;
    common::fund_user(&pool, user.id, dec!(100)).await;
    let bot_id = common::seed_bot(&pool, dec!(10), Some(30)).await;
    let service = InvestmentService::new(pool.clone());

    let result = service
        .create(
            user.id,
            CreateInvestmentRequest {
                bot_id,
                amount: dec!(400),
                wallet: WalletSource::Main,
                proof_url: None,
            },
        )
        .await;

    assert!(matches!(
        result,
        Err(EngineError::InsufficientBalance { .. })
    ));
    // The failed creation left nothing behind
    assert_eq!(common::reload_user(&pool, user.id).await.balance, dec!(100));
    assert_eq!(
        common::count_entries(&pool, user.id, EntryType::Investment, EntryStatus::Completed).await,
        0
    );
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_investment_bounds_enforced() {
    let pool = common::setup_test_db().await;
    let user = common::seed_user(&pool).await;
    common::fund_user(&pool, user.id, dec!(10000)).await;
    let bot_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO bots (id, name, return_percentage, duration_days, min_invest, max_invest, is_active, created_at, updated_at)
        VALUES ($1, 'bounded', 5, 30, 100, 500, TRUE, NOW(), NOW())
        "#,
    )
    .bind(bot_id)
    .execute(&pool)
    .await
    .unwrap();

    let service = InvestmentService::new(pool.clone());

    for amount in [dec!(50), dec!(600)] {
        let result = service
            .create(
                user.id,
                CreateInvestmentRequest {
                    bot_id,
                    amount,
                    wallet: WalletSource::Main,
                    proof_url: None,
                },
            )
            .await;
        assert!(matches!(result, Err(EngineError::Validation(_))));
    }
}
