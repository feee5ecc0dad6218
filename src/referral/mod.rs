//! Referral codes and flat referral/bonus grants

mod model;
mod service;

pub use model::*;
pub use service::*;
