//! Cart route handlers, including checkout.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use mercado_core::{ProductId, Role};

use crate::error::{AppError, Result};
use crate::middleware::auth::RequireAuth;
use crate::models::CartLine;
use crate::services::cart::CartService;
use crate::services::checkout::{CheckoutOutcome, CheckoutService};
use crate::state::AppState;

/// Body for adding a product to the cart.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: Option<i32>,
    /// Desired quantity; defaults to 1. Replaces any existing line.
    pub quantity: Option<i32>,
}

/// Body for removing a product from the cart.
#[derive(Debug, Deserialize)]
pub struct RemoveItemRequest {
    pub product_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub items: Vec<CartLine>,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub success: bool,
    pub order: CheckoutOutcome,
}

/// List the caller's cart (reconciling stale lines first).
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<CartResponse>> {
    let cart = CartService::new(state.pool());
    let items = cart.list(&user).await?;

    Ok(Json(CartResponse {
        items,
        role: user.role,
    }))
}

/// Put a product in the cart at the requested quantity.
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<AddItemRequest>,
) -> Result<Json<serde_json::Value>> {
    let product_id = body
        .product_id
        .ok_or_else(|| AppError::InvalidInput("Missing product id".to_string()))?;

    let cart = CartService::new(state.pool());
    cart.add_item(&user, ProductId::new(product_id), body.quantity.unwrap_or(1))
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Product added to cart",
    })))
}

/// Remove a product from the cart. Idempotent.
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<RemoveItemRequest>,
) -> Result<Json<serde_json::Value>> {
    let product_id = body
        .product_id
        .ok_or_else(|| AppError::InvalidInput("Missing product id".to_string()))?;

    let cart = CartService::new(state.pool());
    cart.remove_item(&user, ProductId::new(product_id)).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Item removed from cart",
    })))
}

/// Convert the cart into an order, atomically.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<CheckoutResponse>> {
    let service = CheckoutService::new(state.pool());
    let order = service.checkout(user.id).await?;

    Ok(Json(CheckoutResponse {
        success: true,
        order,
    }))
}
