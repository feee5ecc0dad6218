//! HTTP handlers for the BotVault API

pub mod admin;
pub mod bot;
pub mod dashboard;
pub mod invest;
pub mod jobs;
pub mod kyc;
pub mod referral;
pub mod users;
pub mod wallet;

pub use crate::middleware::{AdminUser, AuthenticatedUser, IdentityClaims};
