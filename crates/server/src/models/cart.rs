//! Cart domain types.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use mercado_core::{CartId, CartItemId, ProductId, UserId};

/// The cart row itself; one per user, created lazily.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
}

/// A live cart line joined with its product.
///
/// Only lines whose product is active and in stock survive reconciliation;
/// this type therefore always describes a purchasable line at read time.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CartLine {
    /// Cart item ID.
    pub id: CartItemId,
    /// Desired quantity; bounded by the product's stock.
    pub quantity: i32,
    pub product_id: ProductId,
    pub product_name: String,
    /// Live unit price (not yet a snapshot; that happens at checkout).
    pub price: Decimal,
    /// Live stock of the product.
    pub stock: i32,
    pub image_url: String,
    pub seller_email: String,
}
