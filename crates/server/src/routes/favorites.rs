//! Favorite route handlers. Both operations are idempotent.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use mercado_core::ProductId;

use crate::db::favorites::FavoriteRepository;
use crate::error::{AppError, Result};
use crate::middleware::auth::RequireAuth;
use crate::state::AppState;

/// Body naming the product to (un)favorite.
#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    pub product_id: Option<i32>,
}

fn product_id(body: FavoriteRequest) -> Result<ProductId> {
    body.product_id
        .map(ProductId::new)
        .ok_or_else(|| AppError::InvalidInput("Missing product id".to_string()))
}

/// Mark a product as a favorite.
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<FavoriteRequest>,
) -> Result<Json<serde_json::Value>> {
    let id = product_id(body)?;

    FavoriteRepository::new(state.pool()).add(user.id, id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Added to favorites",
    })))
}

/// Unmark a favorite.
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<FavoriteRequest>,
) -> Result<Json<serde_json::Value>> {
    let id = product_id(body)?;

    FavoriteRepository::new(state.pool())
        .remove(user.id, id)
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Removed from favorites",
    })))
}
