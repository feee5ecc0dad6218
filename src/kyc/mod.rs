//! KYC submission handling

mod service;

pub use service::*;
