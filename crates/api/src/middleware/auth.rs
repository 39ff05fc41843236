//! Caller identity from the `Authorization: Bearer <token>` header.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use redress_core::error::CoreError;
use redress_core::types::DbId;

use crate::auth::jwt::{Claims, TokenError};
use crate::error::AppError;
use crate::state::AppState;

/// The authenticated caller. Any handler taking it requires a valid token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    /// Role as of login; a role change applies on the next login.
    pub role: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;

        let claims = state.config.jwt.verify(token).map_err(|err| {
            let message = match err {
                TokenError::Expired => "Token has expired",
                TokenError::UnknownRole(_) | TokenError::Invalid(_) => "Invalid token",
            };
            CoreError::Unauthorized(message.into())
        })?;

        Ok(claims.into())
    }
}

/// The token part of a `Bearer` authorization header. The scheme is
/// matched case-insensitively.
fn bearer_token(headers: &HeaderMap) -> Result<&str, CoreError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| CoreError::Unauthorized("Missing Authorization header".into()))?;

    value
        .to_str()
        .ok()
        .and_then(|raw| raw.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| CoreError::Unauthorized("Expected 'Authorization: Bearer <token>'".into()))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")).unwrap(), "abc.def");
        assert_eq!(bearer_token(&headers("bearer abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn other_schemes_and_empty_tokens_are_rejected() {
        assert_matches!(bearer_token(&headers("Basic dXNlcjpwdw==")), Err(CoreError::Unauthorized(_)));
        assert_matches!(bearer_token(&headers("Bearer ")), Err(CoreError::Unauthorized(_)));
        assert_matches!(bearer_token(&headers("Bearer")), Err(CoreError::Unauthorized(_)));
    }

    #[test]
    fn missing_header_is_reported() {
        assert_matches!(
            bearer_token(&HeaderMap::new()),
            Err(CoreError::Unauthorized(msg)) if msg == "Missing Authorization header"
        );
    }
}
