//! KYC service layer

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{KycDocument, KycStatus, KycSubmission};

/// KYC submission service
#[derive(Clone)]
pub struct KycService {
    db_pool: PgPool,
}

impl KycService {
    /// Create a new KYC service instance
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Submit an identity document for review. One in-flight submission per
    /// user; a rejected user may submit again.
    pub async fn submit(
        &self,
        user_id: Uuid,
        document: KycDocument,
    ) -> Result<KycSubmission, EngineError> {
        document.validate().map_err(EngineError::Validation)?;

        let mut tx = self.db_pool.begin().await?;

        let blocking = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM kyc_submissions
                WHERE user_id = $1 AND status IN ('pending', 'approved')
            )
            "#,
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        if blocking {
            return Err(EngineError::Conflict(
                "A KYC submission is already pending or approved".to_string(),
            ));
        }

        let submission = sqlx::query_as::<_, KycSubmission>(
            r#"
            INSERT INTO kyc_submissions (id, user_id, document, status, status_reason, created_at, updated_at)
            VALUES ($1, $2, $3, 'pending', NULL, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(sqlx::types::Json(document))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            submission_id = %submission.id,
            user_id = %user_id,
            kind = submission.document.kind(),
            "KYC submission received"
        );

        Ok(submission)
    }

    /// A user's latest submission, if any
    pub async fn latest_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<KycSubmission>, EngineError> {
        let submission = sqlx::query_as::<_, KycSubmission>(
            "SELECT * FROM kyc_submissions WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(submission)
    }

    /// Pending submissions awaiting review
    pub async fn list_pending(&self) -> Result<Vec<KycSubmission>, EngineError> {
        let submissions = sqlx::query_as::<_, KycSubmission>(
            "SELECT * FROM kyc_submissions WHERE status = 'pending' ORDER BY created_at",
        )
        .fetch_all(&self.db_pool)
        .await?;

        Ok(submissions)
    }

    /// Admin review decision. Rejections carry a reason shown to the user.
    pub async fn review(
        &self,
        submission_id: Uuid,
        approve: bool,
        reason: Option<String>,
    ) -> Result<KycSubmission, EngineError> {
        let mut tx = self.db_pool.begin().await?;

        let current = sqlx::query_as::<_, KycSubmission>(
            "SELECT * FROM kyc_submissions WHERE id = $1 FOR UPDATE",
        )
        .bind(submission_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(EngineError::NotFound("KYC submission"))?;

        if current.status != KycStatus::Pending {
            return Err(EngineError::Conflict(
                "KYC submission has already been reviewed".to_string(),
            ));
        }

        let status = if approve {
            KycStatus::Approved
        } else {
            KycStatus::Rejected
        };

        let submission = sqlx::query_as::<_, KycSubmission>(
            r#"
            UPDATE kyc_submissions
            SET status = $1, status_reason = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(&reason)
        .bind(submission_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            submission_id = %submission_id,
            approved = approve,
            "KYC submission reviewed"
        );

        Ok(submission)
    }
}
