//! Product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use mercado_core::{ProductId, UserId};

/// A product as stored, owned by one seller.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Unit price; non-negative.
    pub price: Decimal,
    /// Units in stock; non-negative. Decremented by checkout.
    pub quantity: i32,
    pub image_url: String,
    /// Seller who owns this listing.
    pub seller_id: UserId,
    /// Cleared by explicit disable or seller deactivation.
    pub active: bool,
    pub published_at: DateTime<Utc>,
}

/// A catalog row: a product joined with its seller's email and whether the
/// viewing user has favorited it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub quantity: i32,
    pub image_url: String,
    pub seller_id: UserId,
    pub published_at: DateTime<Utc>,
    /// Email of the owning seller.
    pub seller_email: String,
    /// True when the (authenticated) viewer has favorited this product.
    pub is_favorite: bool,
}

/// Input for creating a product, after validation and trimming.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub quantity: i32,
    pub image_url: String,
}
