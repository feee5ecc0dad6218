//! Daily interest accrual batch

mod service;

pub use service::*;

use rust_decimal::Decimal;
use serde::Serialize;

/// Outcome of one accrual batch run. The job is idempotent, so a re-run
/// within the same day reports everything as skipped.
#[derive(Debug, Serialize, Default)]
pub struct AccrualReport {
    pub scanned: usize,
    pub credited: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total_credited: Decimal,
}
