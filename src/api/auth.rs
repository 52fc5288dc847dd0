//! Bearer-token authentication.
//!
//! Tokens are HS256 JWTs issued by the account service with the same
//! secret. Handlers that need a caller take an [`AuthUser`] argument; the
//! resolved [`UserId`] is then passed explicitly into the service layer.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::domain::UserId;
use crate::error::BookingError;

/// JWT claims shared with the token issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated user.
    pub id_usuario: i64,
    /// User e-mail, informational.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Expiry as a Unix timestamp (seconds).
    pub exp: i64,
}

impl Claims {
    /// Claims for `user_id` expiring `ttl_secs` from now. Negative values
    /// produce an already-expired token.
    #[must_use]
    pub fn for_user(user_id: UserId, ttl_secs: i64) -> Self {
        Self {
            id_usuario: user_id.get(),
            email: None,
            exp: Utc::now().timestamp().saturating_add(ttl_secs),
        }
    }
}

/// Signing and verification keys derived from the shared secret.
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl JwtKeys {
    /// Derives HS256 keys from `secret`.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Signs `claims` into a compact token.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Internal`] if encoding fails.
    pub fn sign(&self, claims: &Claims) -> Result<String, BookingError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| BookingError::Internal(format!("token encoding failed: {e}")))
    }

    /// Verifies signature and expiry and returns the token's user.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Unauthorized`] for any invalid token.
    pub fn verify(&self, token: &str) -> Result<UserId, BookingError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| BookingError::Unauthorized(format!("invalid token: {e}")))?;
        Ok(UserId::new(data.claims.id_usuario))
    }
}

/// Extractor yielding the authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub UserId);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = BookingError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| BookingError::Unauthorized("missing authorization header".to_string()))?
            .to_str()
            .map_err(|_| BookingError::Unauthorized("malformed authorization header".to_string()))?;

        let token = bearer_token(header).ok_or_else(|| {
            BookingError::Unauthorized("expected `Bearer <token>` authorization".to_string())
        })?;

        state.jwt.verify(token).map(Self)
    }
}

/// Extracts the token from a `Bearer <token>` header value. The scheme is
/// case-insensitive.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn signed_token_verifies_to_user() {
        let keys = JwtKeys::new("secret");
        let Ok(token) = keys.sign(&Claims::for_user(UserId::new(3), 3600)) else {
            panic!("signing failed");
        };
        let Ok(user) = keys.verify(&token) else {
            panic!("verification failed");
        };
        assert_eq!(user, UserId::new(3));
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let Ok(token) = JwtKeys::new("other").sign(&Claims::for_user(UserId::new(3), 3600)) else {
            panic!("signing failed");
        };
        let Err(BookingError::Unauthorized(_)) = JwtKeys::new("secret").verify(&token) else {
            panic!("foreign token accepted");
        };
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = JwtKeys::new("secret");
        let Ok(token) = keys.sign(&Claims::for_user(UserId::new(3), -3600)) else {
            panic!("signing failed");
        };
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(JwtKeys::new("secret").verify("not-a-jwt").is_err());
    }

    #[test]
    fn bearer_scheme_parsing() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer   abc "), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("abc"), None);
    }
}
