//! User service - resolves identity-provider subjects to internal users

use rand::distributions::Alphanumeric;
use rand::Rng;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{User, UserRole};

/// Length of generated referral codes
const REFERRAL_CODE_LEN: usize = 8;

/// User provisioning and lookup. Authentication itself happens at the
/// identity provider; this service only maps its opaque subject onto an
/// internal user row.
#[derive(Clone)]
pub struct UserService {
    db_pool: PgPool,
}

impl UserService {
    /// Create a new user service instance
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Look up a user by the identity provider's subject
    pub async fn find_by_subject(&self, subject: &str) -> Result<Option<User>, EngineError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE external_subject = $1")
            .bind(subject)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(user)
    }

    /// Fetch a user by internal id
    pub async fn get(&self, user_id: Uuid) -> Result<User, EngineError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or(EngineError::NotFound("user"))?;

        Ok(user)
    }

    /// Provision a user for a new identity-provider subject, optionally
    /// linked to the referrer whose code they signed up with.
    pub async fn register(
        &self,
        subject: &str,
        email: Option<String>,
        name: Option<String>,
        referral_code: Option<String>,
    ) -> Result<User, EngineError> {
        if let Some(existing) = self.find_by_subject(subject).await? {
            tracing::debug!(user_id = %existing.id, "Subject already registered");
            return Ok(existing);
        }

        let referred_by = match referral_code.as_deref().filter(|c| !c.is_empty()) {
            Some(code) => {
                let referrer =
                    sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE referral_code = $1")
                        .bind(code)
                        .fetch_optional(&self.db_pool)
                        .await?;
                if referrer.is_none() {
                    return Err(EngineError::Validation(format!(
                        "Unknown referral code '{}'",
                        code
                    )));
                }
                referrer
            }
            None => None,
        };

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                id, external_subject, email, name, role, balance, profit_balance,
                recovery_fund, referral_code, referred_by, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, 0, 0, 0, $6, $7, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(subject)
        .bind(&email)
        .bind(&name)
        .bind(UserRole::Member)
        .bind(generate_referral_code())
        .bind(referred_by)
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(user_id = %user.id, referred = referred_by.is_some(), "User registered");

        Ok(user)
    }
}

/// Random uppercase alphanumeric referral code
fn generate_referral_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(REFERRAL_CODE_LEN)
        .map(|b| (b as char).to_ascii_uppercase())
        .collect()
}
