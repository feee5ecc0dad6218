//! BotVault Backend Library
//!
//! This library exports the core modules for the BotVault backend server:
//! the investment accrual/settlement engine, the approval state machine, and
//! the HTTP surface around them.

pub mod accrual;
pub mod approval;
pub mod bot;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod investment;
pub mod jobs;
pub mod kyc;
pub mod ledger;
pub mod middleware;
pub mod models;
pub mod referral;
pub mod routes;
pub mod settings;
pub mod state;
pub mod user_service;
pub mod wallet;
