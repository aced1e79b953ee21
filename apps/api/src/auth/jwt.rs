// JWT access tokens for blog users
// HS256, lifetime taken from AuthConfig

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::domain::User;

/// JWT claims structure
///
/// # Fields
/// * `sub` - Subject (user id)
/// * `email`, `name` - Profile data carried for clients
/// * `iat`, `exp` - Issue and expiry time (seconds since epoch)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn for_user(user: &User, ttl_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: user.id,
            email: user.email.to_string(),
            name: user.name.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(ttl_hours)).timestamp(),
        }
    }
}

/// Creates a signed access token for a user
///
/// # Example
/// ```
/// use blog_api::auth::jwt::{create_token, verify_token};
/// use blog_api::config::AuthConfig;
/// use blog_api::domain::user::{Email, User};
///
/// let config = AuthConfig::default();
/// let user = User::new(Email::new("keks@user.local").unwrap(), "Keks", None, "hash".into()).unwrap();
///
/// let token = create_token(&user, &config).expect("valid token");
/// let claims = verify_token(&token, &config.jwt_secret).expect("valid token");
/// assert_eq!(claims.sub, user.id);
/// ```
pub fn create_token(user: &User, config: &AuthConfig) -> Result<String, String> {
    let claims = Claims::for_user(user, config.token_ttl_hours);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_ref()),
    )
    .map_err(|e| e.to_string())
}

/// Verifies and decodes a token, rejecting bad signatures and expired tokens
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}
