//! Order repository: order history, seller sales, and dashboard aggregates.

use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use mercado_core::{OrderId, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderItemDetail};

const ORDER_COLUMNS: &str = "id, customer_id, total, status, created_at";

/// Units sold per product, for the best-seller aggregation.
#[derive(Debug, Clone, FromRow)]
pub struct ProductUnits {
    pub product_id: ProductId,
    pub name: String,
    pub units: i64,
}

/// Repository for order database operations.
///
/// Checkout itself lives in the checkout service because it spans several
/// tables under one transaction; this repository covers the read side.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Buyer order history
    // =========================================================================

    /// One page of a buyer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn page_for_customer(
        &self,
        customer_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders
             WHERE customer_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(customer_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// Total number of a buyer's orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_for_customer(&self, customer_id: UserId) -> Result<i64, RepositoryError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE customer_id = $1")
                .bind(customer_id)
                .fetch_one(self.pool)
                .await?;

        Ok(count)
    }

    /// Items of the given orders, with each product's seller as the
    /// counterparty (buyer-facing order history).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items_with_sellers(
        &self,
        order_ids: &[OrderId],
    ) -> Result<Vec<OrderItemDetail>, RepositoryError> {
        let ids: Vec<i32> = order_ids.iter().map(|id| id.as_i32()).collect();

        let items = sqlx::query_as::<_, OrderItemDetail>(
            "SELECT oi.id, oi.order_id, oi.product_id, p.name AS product_name,
                    oi.quantity, oi.price,
                    u.email AS counterparty_email
             FROM order_items oi
             JOIN products p ON p.id = oi.product_id
             JOIN users u ON u.id = p.seller_id
             WHERE oi.order_id = ANY($1)
             ORDER BY oi.id",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    // =========================================================================
    // Seller sales view
    // =========================================================================

    /// One page of orders containing at least one of the seller's products,
    /// newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn sales_page_for_seller(
        &self,
        seller_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT DISTINCT o.id, o.customer_id, o.total, o.status, o.created_at
             FROM orders o
             JOIN order_items oi ON oi.order_id = o.id
             JOIN products p ON p.id = oi.product_id
             WHERE p.seller_id = $1
             ORDER BY o.created_at DESC, o.id DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(seller_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// Number of orders containing at least one of the seller's products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn sales_count_for_seller(
        &self,
        seller_id: UserId,
    ) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(DISTINCT o.id)
             FROM orders o
             JOIN order_items oi ON oi.order_id = o.id
             JOIN products p ON p.id = oi.product_id
             WHERE p.seller_id = $1",
        )
        .bind(seller_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Items of the given orders restricted to one seller's products, with
    /// the buying customer as the counterparty (seller-facing sales view).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items_for_seller(
        &self,
        order_ids: &[OrderId],
        seller_id: UserId,
    ) -> Result<Vec<OrderItemDetail>, RepositoryError> {
        let ids: Vec<i32> = order_ids.iter().map(|id| id.as_i32()).collect();

        let items = sqlx::query_as::<_, OrderItemDetail>(
            "SELECT oi.id, oi.order_id, oi.product_id, p.name AS product_name,
                    oi.quantity, oi.price,
                    c.email AS counterparty_email
             FROM order_items oi
             JOIN products p ON p.id = oi.product_id
             JOIN orders o ON o.id = oi.order_id
             JOIN users c ON c.id = o.customer_id
             WHERE oi.order_id = ANY($1) AND p.seller_id = $2
             ORDER BY oi.id",
        )
        .bind(&ids)
        .bind(seller_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    // =========================================================================
    // Dashboard aggregates
    // =========================================================================

    /// A buyer's order count and lifetime spend, computed from order items
    /// so the figure stays honest even against a corrupted order total.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn buyer_stats(
        &self,
        customer_id: UserId,
    ) -> Result<(i64, Decimal), RepositoryError> {
        let row = sqlx::query_as::<_, (i64, Decimal)>(
            "SELECT COUNT(DISTINCT o.id),
                    COALESCE(SUM(oi.price * oi.quantity), 0)
             FROM orders o
             LEFT JOIN order_items oi ON oi.order_id = o.id
             WHERE o.customer_id = $1",
        )
        .bind(customer_id)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }

    /// Units sold and revenue across every order item referencing the
    /// seller's products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn seller_totals(
        &self,
        seller_id: UserId,
    ) -> Result<(i64, Decimal), RepositoryError> {
        let row = sqlx::query_as::<_, (i64, Decimal)>(
            "SELECT COALESCE(SUM(oi.quantity), 0),
                    COALESCE(SUM(oi.price * oi.quantity), 0)
             FROM order_items oi
             JOIN products p ON p.id = oi.product_id
             WHERE p.seller_id = $1",
        )
        .bind(seller_id)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }

    /// Units sold per product of one seller, for the best-seller pick.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn units_by_product(
        &self,
        seller_id: UserId,
    ) -> Result<Vec<ProductUnits>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductUnits>(
            "SELECT p.id AS product_id, p.name, SUM(oi.quantity) AS units
             FROM order_items oi
             JOIN products p ON p.id = oi.product_id
             WHERE p.seller_id = $1
             GROUP BY p.id, p.name",
        )
        .bind(seller_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
