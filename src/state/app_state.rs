//! Application state shared across handlers

use std::sync::Arc;

use sqlx::PgPool;

use crate::accrual::AccrualService;
use crate::bot::BotService;
use crate::config::Config;
use crate::investment::InvestmentService;
use crate::kyc::KycService;
use crate::referral::ReferralService;
use crate::settings::SettingsService;
use crate::user_service::UserService;
use crate::wallet::WalletService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub user_service: Arc<UserService>,
    pub bot_service: Arc<BotService>,
    pub investment_service: Arc<InvestmentService>,
    pub accrual_service: Arc<AccrualService>,
    pub wallet_service: Arc<WalletService>,
    pub referral_service: Arc<ReferralService>,
    pub kyc_service: Arc<KycService>,
    pub settings_service: Arc<SettingsService>,
    pub jwt_secret: String,
    pub job_trigger_secret: Option<String>,
}

impl AppState {
    /// Wire up every service over one connection pool
    pub fn new(db_pool: PgPool, config: &Config) -> Self {
        let settings_service = SettingsService::new(db_pool.clone());

        Self {
            user_service: Arc::new(UserService::new(db_pool.clone())),
            bot_service: Arc::new(BotService::new(db_pool.clone())),
            investment_service: Arc::new(InvestmentService::new(db_pool.clone())),
            accrual_service: Arc::new(AccrualService::new(db_pool.clone())),
            wallet_service: Arc::new(WalletService::new(
                db_pool.clone(),
                settings_service.clone(),
            )),
            referral_service: Arc::new(ReferralService::new(db_pool.clone())),
            kyc_service: Arc::new(KycService::new(db_pool.clone())),
            settings_service: Arc::new(settings_service),
            jwt_secret: config.jwt_secret.clone(),
            job_trigger_secret: config.job_trigger_secret.clone(),
            db_pool,
        }
    }
}
