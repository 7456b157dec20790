//! Authentication extractors.
//!
//! Handlers declare their authentication requirement through an extractor
//! argument: [`RequireAuth`] for any valid credential, [`RequireSeller`]
//! to additionally gate on role, [`OptionalAuth`] where anonymous access
//! is allowed. Verification is a pure signature/expiry check against the
//! bearer token; nothing here touches the database.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use mercado_core::{Role, UserId};

use crate::error::AppError;
use crate::services::auth::{AuthError, Claims};
use crate::state::AppState;

/// The verified identity attached to a request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: UserId,
    pub role: Role,
    pub email: String,
    /// Active flag as of token issuance; stale after deactivation until
    /// the token expires.
    pub active: bool,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            role: claims.role,
            email: claims.email,
            active: claims.active,
        }
    }
}

/// Extract the bearer token from the Authorization header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Verify the request's credential against the token service.
fn verify(parts: &Parts, state: &AppState) -> Result<AuthUser, AppError> {
    let token = bearer_token(parts).ok_or(AuthError::MissingToken)?;
    let claims = state.tokens().verify(token)?;
    Ok(AuthUser::from(claims))
}

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("hello, {}", user.email)
/// }
/// ```
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        verify(parts, state).map(Self)
    }
}

/// Extractor that requires a valid bearer token carrying the seller role.
pub struct RequireSeller(pub AuthUser);

impl FromRequestParts<AppState> for RequireSeller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = verify(parts, state)?;

        if !user.role.is_seller() {
            return Err(AppError::Forbidden("Seller role required".to_string()));
        }

        Ok(Self(user))
    }
}

/// Extractor that optionally reads the current user.
///
/// Unlike `RequireAuth`, this never rejects: an absent or invalid token
/// simply yields `None`, matching how the public catalog treats broken
/// credentials as anonymous traffic.
pub struct OptionalAuth(pub Option<AuthUser>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(verify(parts, state).ok()))
    }
}
