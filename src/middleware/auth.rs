//! Authentication extractors
//!
//! BotVault does not authenticate users itself: tokens come from the external
//! identity provider and are verified against a shared secret. The extractors
//! here resolve the provider's opaque subject to an internal user row; the
//! engine only ever works with the internal id.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::UserRole;
use crate::state::AppState;

/// Claims issued by the identity provider
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Opaque subject identifying the account at the provider
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

/// Verify a provider token and return its claims
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;

    Ok(data.claims)
}

/// Error response for authentication failures
#[derive(Debug, Serialize)]
struct AuthError {
    error: AuthErrorDetails,
}

#[derive(Debug, Serialize)]
struct AuthErrorDetails {
    code: String,
    message: String,
}

impl AuthError {
    fn new(code: &str, message: &str) -> Self {
        Self {
            error: AuthErrorDetails {
                code: code.to_string(),
                message: message.to_string(),
            },
        }
    }

    fn response(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Verified provider claims, without requiring a provisioned user row.
/// Registration uses this; everything else wants [`AuthenticatedUser`].
#[derive(Debug, Clone)]
pub struct IdentityClaims(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for IdentityClaims
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AuthError::new(
                        "MISSING_TOKEN",
                        "Authorization header with Bearer token required",
                    )
                    .response(StatusCode::UNAUTHORIZED)
                })?;

        let app_state = AppState::from_ref(state);

        let claims = verify_token(bearer.token(), &app_state.jwt_secret).map_err(|e| {
            let (code, message) = match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    ("TOKEN_EXPIRED", "Token has expired")
                }
                _ => ("INVALID_TOKEN", "Invalid token"),
            };
            AuthError::new(code, message).response(StatusCode::UNAUTHORIZED)
        })?;

        Ok(IdentityClaims(claims))
    }
}

/// A verified caller resolved to an internal user
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub subject: String,
    pub role: UserRole,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let IdentityClaims(claims) = IdentityClaims::from_request_parts(parts, state).await?;

        let app_state = AppState::from_ref(state);

        let user = app_state
            .user_service
            .find_by_subject(&claims.sub)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "User lookup failed during authentication");
                AuthError::new("AUTH_LOOKUP_FAILED", "Authentication failed")
                    .response(StatusCode::INTERNAL_SERVER_ERROR)
            })?
            .ok_or_else(|| {
                AuthError::new("NOT_REGISTERED", "Account has not been registered")
                    .response(StatusCode::UNAUTHORIZED)
            })?;

        Ok(AuthenticatedUser {
            user_id: user.id,
            subject: claims.sub,
            role: user.role,
        })
    }
}

/// Extractor requiring the admin role. The role comes from the user row, not
/// the token, so demoting an admin takes effect immediately.
pub struct AdminUser(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;

        if user.role != UserRole::Admin {
            return Err(
                AuthError::new("FORBIDDEN", "Admin access required").response(StatusCode::FORBIDDEN)
            );
        }

        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn make_token(secret: &str, ttl_seconds: i64) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: "provider|abc123".to_string(),
            email: Some("member@example.com".to_string()),
            name: None,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_verify_round_trip() {
        let token = make_token("test-secret", 900);
        let claims = verify_token(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, "provider|abc123");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = make_token("secret-one", 900);
        assert!(verify_token(&token, "secret-two").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = make_token("test-secret", -120);
        assert!(verify_token(&token, "test-secret").is_err());
    }
}
