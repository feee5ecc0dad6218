//! Bot (investment plan) models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

/// An investment plan. Read-only to the engine; rate and duration are
/// snapshotted onto each investment at creation so later plan edits never
/// change running accruals.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Bot {
    pub id: Uuid,
    pub name: String,
    /// Return percentage applied by the accrual engine
    pub return_percentage: Decimal,
    /// Term in days; None means perpetual (never matures)
    pub duration_days: Option<i32>,
    pub min_invest: Decimal,
    pub max_invest: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a bot
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBotRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub return_percentage: Decimal,
    pub duration_days: Option<i32>,
    pub min_invest: Decimal,
    pub max_invest: Decimal,
}

impl CreateBotRequest {
    /// Checks the numeric fields validator can't express for `Decimal`
    pub fn validate_amounts(&self) -> Result<(), String> {
        if self.return_percentage <= Decimal::ZERO {
            return Err("Return percentage must be greater than 0".to_string());
        }
        if let Some(days) = self.duration_days {
            if days <= 0 {
                return Err("Duration must be at least 1 day".to_string());
            }
        }
        if self.min_invest <= Decimal::ZERO || self.max_invest < self.min_invest {
            return Err("Investment bounds must satisfy 0 < min <= max".to_string());
        }
        Ok(())
    }
}

/// Request to update a bot; absent fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateBotRequest {
    pub name: Option<String>,
    pub return_percentage: Option<Decimal>,
    pub duration_days: Option<Option<i32>>,
    pub min_invest: Option<Decimal>,
    pub max_invest: Option<Decimal>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateBotRequest {
        CreateBotRequest {
            name: "Falcon".to_string(),
            return_percentage: Decimal::new(10, 0),
            duration_days: Some(30),
            min_invest: Decimal::new(100, 0),
            max_invest: Decimal::new(10_000, 0),
        }
    }

    #[test]
    fn test_valid_bot_request() {
        assert!(valid_request().validate_amounts().is_ok());
    }

    #[test]
    fn test_rejects_zero_rate() {
        let mut req = valid_request();
        req.return_percentage = Decimal::ZERO;
        assert!(req.validate_amounts().is_err());
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let mut req = valid_request();
        req.min_invest = Decimal::new(500, 0);
        req.max_invest = Decimal::new(100, 0);
        assert!(req.validate_amounts().is_err());
    }

    #[test]
    fn test_perpetual_plan_allowed() {
        let mut req = valid_request();
        req.duration_days = None;
        assert!(req.validate_amounts().is_ok());
    }
}
