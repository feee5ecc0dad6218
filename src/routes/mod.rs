//! Route definitions for the BotVault API

mod admin;
mod bot;
mod dashboard;
mod invest;
mod jobs;
mod kyc;
mod referral;
mod users;
mod wallet;

pub use admin::admin_routes;
pub use bot::bot_routes;
pub use dashboard::dashboard_routes;
pub use invest::invest_routes;
pub use jobs::job_routes;
pub use kyc::kyc_routes;
pub use referral::referral_routes;
pub use users::user_routes;
pub use wallet::wallet_routes;
