//! Account lifecycle route handlers.
//!
//! Accounts are never hard-deleted. Deactivation and deletion both verify
//! the caller's password against the stored hash first, which doubles as a
//! liveness check on the subject row.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::auth::{RequireAuth, RequireSeller};
use crate::services::auth::{AuthService, hash_password};
use crate::state::AppState;

/// Body carrying the password confirmation.
#[derive(Debug, Deserialize)]
pub struct PasswordConfirmRequest {
    pub password: Option<String>,
}

fn required_password(body: PasswordConfirmRequest) -> Result<String> {
    body.password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Password is required".to_string()))
}

/// Deactivate the seller's account and all of their products.
#[instrument(skip(state, seller, body), fields(seller_id = %seller.id))]
pub async fn deactivate(
    State(state): State<AppState>,
    RequireSeller(seller): RequireSeller,
    Json(body): Json<PasswordConfirmRequest>,
) -> Result<Json<serde_json::Value>> {
    let password = required_password(body)?;

    let auth = AuthService::new(state.pool(), state.tokens());
    auth.verify_password_for(seller.id, &password).await?;

    UserRepository::new(state.pool())
        .deactivate_with_products(seller.id)
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Account and products deactivated",
    })))
}

/// Reactivate the seller's account and their in-stock products.
#[instrument(skip(state, seller), fields(seller_id = %seller.id))]
pub async fn reactivate(
    State(state): State<AppState>,
    RequireSeller(seller): RequireSeller,
) -> Result<Json<serde_json::Value>> {
    UserRepository::new(state.pool())
        .reactivate_with_products(seller.id)
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Account and products reactivated",
    })))
}

/// Soft-delete the caller's account.
///
/// The email is tombstoned with an id-scoped suffix so repeat
/// registrations of the address (and repeat deletions) can never collide.
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<PasswordConfirmRequest>,
) -> Result<Json<serde_json::Value>> {
    let password = required_password(body)?;

    let auth = AuthService::new(state.pool(), state.tokens());
    auth.verify_password_for(user.id, &password).await?;

    let tombstone = format!("{}.deleted.{}", user.email, user.id);
    // Overwrite the credential so the old password can never authenticate
    // again, even if the tombstone were somehow looked up.
    let replacement_hash = hash_password("deactivated-account")?;

    UserRepository::new(state.pool())
        .soft_delete(user.id, &tombstone, &replacement_hash)
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Account deactivated",
    })))
}
