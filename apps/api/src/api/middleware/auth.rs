use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::auth::jwt::verify_token;
use crate::config::AuthConfig;

/// JWT authentication extractor for protected routes
///
/// Yields the id of the authenticated user:
/// ```rust,ignore
/// async fn protected_handler(JwtAuth(user_id): JwtAuth) -> Result<String, ApiError> {
///     Ok(format!("Hello user {}", user_id))
/// }
/// ```
pub struct JwtAuth(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for JwtAuth
where
    Arc<AuthConfig>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("Invalid authorization format. Use: Bearer <token>"))?;

        let config = Arc::<AuthConfig>::from_ref(state);
        let claims = verify_token(token, &config.jwt_secret).map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            ApiError::unauthorized(format!("Invalid token: {}", e))
        })?;

        Ok(JwtAuth(claims.sub))
    }
}
