//! Shared data models for the BotVault backend

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod kyc;
pub use kyc::*;

/// User model
///
/// Carries the denormalized monetary fields every balance-changing operation
/// mutates. `balance` holds principal/withdrawable funds, `profit_balance`
/// accrued interest (separately withdrawable), `recovery_fund` is
/// informational only. All three are kept non-negative by the mutation
/// helpers in `ledger`, not by a database constraint.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: Uuid,
    /// Opaque subject issued by the external identity provider
    pub external_subject: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: UserRole,
    pub balance: Decimal,
    pub profit_balance: Decimal,
    pub recovery_fund: Decimal,
    pub referral_code: String,
    pub referred_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User roles
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum UserRole {
    Member,
    Admin,
}

/// Public view of a user, without the identity-provider linkage
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: UserRole,
    pub balance: Decimal,
    pub profit_balance: Decimal,
    pub recovery_fund: Decimal,
    pub referral_code: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            balance: user.balance,
            profit_balance: user.profit_balance,
            recovery_fund: user.recovery_fund,
            referral_code: user.referral_code,
            created_at: user.created_at,
        }
    }
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Pagination parameters
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i32>,
    pub limit: Option<i32>,
}

impl PaginationParams {
    /// Resolve to a (limit, offset) pair with sane bounds
    pub fn to_limit_offset(&self) -> (i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(20).clamp(1, 100);
        (limit as i64, ((page - 1) * limit) as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let params = PaginationParams {
            page: None,
            limit: None,
        };
        assert_eq!(params.to_limit_offset(), (20, 0));
    }

    #[test]
    fn test_pagination_bounds() {
        let params = PaginationParams {
            page: Some(0),
            limit: Some(1000),
        };
        // Page clamps to 1, limit to 100
        assert_eq!(params.to_limit_offset(), (100, 0));

        let params = PaginationParams {
            page: Some(3),
            limit: Some(10),
        };
        assert_eq!(params.to_limit_offset(), (10, 20));
    }
}
