//! Signed access tokens.
//!
//! HS256 JWTs carrying the account id and role. There are no refresh
//! tokens: once a token expires the client logs in again. Tokens naming a
//! role the service does not know are rejected outright, so a stale or
//! forged role can never fall through to regular-user access.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use redress_core::roles::is_known_role;
use redress_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload of every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id.
    pub sub: DbId,
    /// Role at login time (`admin` or `user`).
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    /// Per-token id, logged on rejection.
    pub jti: String,
}

/// Why a presented token was not accepted.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("token carries unknown role '{0}'")]
    UnknownRole(String),
    #[error("invalid token: {0}")]
    Invalid(jsonwebtoken::errors::Error),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid(err),
        }
    }
}

/// A freshly signed token and its lifetime.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    /// Seconds until expiry.
    pub expires_in: i64,
}

/// Signing secret and token lifetime. Loaded by
/// [`ServerConfig::from_env`](crate::config::ServerConfig::from_env).
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    pub fn expires_in_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }

    /// Sign a token for `user_id` acting as `role`.
    pub fn issue(&self, user_id: DbId, role: &str) -> Result<IssuedToken, TokenError> {
        let iat = chrono::Utc::now().timestamp();
        let expires_in = self.expires_in_secs();
        let claims = Claims {
            sub: user_id,
            role: role.to_string(),
            exp: iat + expires_in,
            iat,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;
        Ok(IssuedToken { token, expires_in })
    }

    /// Check signature, expiry and role, returning the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;

        let claims = data.claims;
        if !is_known_role(&claims.role) {
            tracing::warn!(user_id = claims.sub, jti = %claims.jti, role = %claims.role, "Token with unknown role");
            return Err(TokenError::UnknownRole(claims.role));
        }
        Ok(claims)
    }
}
