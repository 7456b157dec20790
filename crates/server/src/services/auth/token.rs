//! Bearer token issuance and verification.
//!
//! Tokens are HS256 JWTs signed with a shared secret. The claims carry the
//! identity snapshot `{id, role, email, active}` as of issuance; `active`
//! is NOT re-read on verification (see `AuthService::current_user` for the
//! liveness-checking variant).

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use mercado_core::{Role, UserId};

use super::AuthError;
use crate::models::User;

/// Claims carried inside the bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: UserId,
    pub role: Role,
    pub email: String,
    /// Active flag as of issuance. Deactivation does not revoke
    /// outstanding tokens; they age out at `exp`.
    pub active: bool,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies signed bearer tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl TokenService {
    /// Create a token service from the shared signing secret.
    #[must_use]
    pub fn new(secret: &SecretString, ttl_secs: i64) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            ttl_secs,
        }
    }

    /// Issue a token for a user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if encoding fails (never in
    /// practice with HS256).
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            role: user.role,
            email: user.email.to_string(),
            active: user.active,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.ttl_secs)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|_| AuthError::InvalidToken)
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenExpired` for an expired token and
    /// `AuthError::InvalidToken` for any other failure (bad signature,
    /// malformed structure).
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        // Expiry is exact; the default 60s leeway would let dead tokens
        // linger past their advertised lifetime.
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use mercado_core::Email;

    use super::*;

    fn test_user(active: bool) -> User {
        User {
            id: UserId::new(7),
            email: Email::parse("ana@example.com").unwrap(),
            role: Role::Seller,
            active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(ttl_secs: i64) -> TokenService {
        TokenService::new(
            &SecretString::from("0123456789abcdef0123456789abcdef"),
            ttl_secs,
        )
    }

    #[test]
    fn test_issue_verify_roundtrip() {
        let tokens = service(3600);
        let token = tokens.issue(&test_user(true)).unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.sub, UserId::new(7));
        assert_eq!(claims.role, Role::Seller);
        assert_eq!(claims.email, "ana@example.com");
        assert!(claims.active);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_inactive_flag_survives_roundtrip() {
        let tokens = service(3600);
        let token = tokens.issue(&test_user(false)).unwrap();
        let claims = tokens.verify(&token).unwrap();
        assert!(!claims.active);
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = service(-10);
        let token = tokens.issue(&test_user(true)).unwrap();
        assert!(matches!(
            tokens.verify(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let tokens = service(3600);
        let token = tokens.issue(&test_user(true)).unwrap();

        let other = TokenService::new(
            &SecretString::from("ffffffffffffffffffffffffffffffff"),
            3600,
        );
        assert!(matches!(other.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let tokens = service(3600);
        assert!(matches!(
            tokens.verify("not-a-token"),
            Err(AuthError::InvalidToken)
        ));
    }
}
