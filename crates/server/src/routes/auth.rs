//! Authentication route handlers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use mercado_core::Role;

use crate::error::{AppError, Result};
use crate::middleware::auth::RequireAuth;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Registration request body.
///
/// Fields are optional so missing input maps to a 400, not a decode error.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Identity payload returned by login and `me`.
#[derive(Debug, Serialize)]
pub struct UserPayload {
    pub id: mercado_core::UserId,
    pub role: Role,
    pub email: String,
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: UserPayload,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub success: bool,
    pub user: UserPayload,
}

/// Register a new account.
#[instrument(skip(state, body))]
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let (Some(email), Some(password), Some(role)) = (body.email, body.password, body.role) else {
        return Err(AppError::InvalidInput("Missing required fields".to_string()));
    };

    let role: Role = role
        .parse()
        .map_err(|_| AppError::InvalidInput("Role must be buyer or seller".to_string()))?;

    let auth = AuthService::new(state.pool(), state.tokens());
    let (_user, token) = auth.register(&email, &password, role).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            message: "Account created".to_string(),
            token,
        }),
    ))
}

/// Login with email and password.
#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let (Some(email), Some(password)) = (body.email, body.password) else {
        return Err(AppError::InvalidInput("Missing required fields".to_string()));
    };

    let auth = AuthService::new(state.pool(), state.tokens());
    let (user, token) = auth.login(&email, &password).await?;

    Ok(Json(LoginResponse {
        success: true,
        token,
        user: UserPayload {
            id: user.id,
            role: user.role,
            email: user.email.to_string(),
            active: user.active,
        },
    }))
}

/// Return the caller's identity, re-reading the store so the `active`
/// flag is current rather than the one frozen into the token.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<MeResponse>> {
    let auth = AuthService::new(state.pool(), state.tokens());
    let fresh = auth.current_user(user.id).await?;

    Ok(Json(MeResponse {
        success: true,
        user: UserPayload {
            id: fresh.id,
            role: fresh.role,
            email: fresh.email.to_string(),
            active: fresh.active,
        },
    }))
}
