//! Order domain types.
//!
//! An order is an immutable snapshot created at checkout. Item prices are
//! captured at purchase time and never re-read from the live product.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use mercado_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

/// An order header.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
    pub id: OrderId,
    /// Buyer who placed the order.
    pub customer_id: UserId,
    /// Snapshot total; equals the sum of item price x quantity.
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// An order line as written at checkout.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    /// Unit price at the moment of checkout.
    pub price: Decimal,
}

/// An order line joined with display data for listings.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItemDetail {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
    /// Seller of the product (order history) or buyer of the order
    /// (sales view), depending on the query.
    pub counterparty_email: String,
}

/// An order plus its line items, as returned by the listing endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemDetail>,
}
