//! Checkout / inventory-reservation engine.
//!
//! The one operation with a real concurrency invariant: two buyers must
//! not jointly purchase more units than exist. Everything from validation
//! to cart clearing runs inside a single transaction, and every product
//! row involved is locked up front (in id order, so concurrent checkouts
//! over overlapping carts cannot deadlock). Concurrent checkouts for the
//! last unit therefore serialize: one commits, the other sees the
//! decremented stock and aborts.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use mercado_core::{OrderStatus, ProductId, UserId};

use crate::error::{AppError, Result};
use crate::models::{Order, OrderItem};

/// A cart line joined with its locked product row.
#[derive(Debug, Clone, FromRow)]
struct CheckoutLine {
    product_id: ProductId,
    name: String,
    price: Decimal,
    stock: i32,
    active: bool,
    requested: i32,
}

/// The result of a successful checkout.
#[derive(Debug, Serialize)]
pub struct CheckoutOutcome {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Checkout service.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Convert the user's cart into an order.
    ///
    /// All-or-nothing: on any failure the transaction rolls back and
    /// neither an order, a stock decrement, nor a cart mutation survives.
    ///
    /// # Errors
    ///
    /// Returns `AppError::EmptyCart` when there is nothing to buy and
    /// `AppError::InsufficientStock` (naming the product) when any line
    /// exceeds the live stock. Database failures surface as
    /// `AppError::Database`.
    pub async fn checkout(&self, customer_id: UserId) -> Result<CheckoutOutcome> {
        let mut tx = self.pool.begin().await?;

        let cart_id = sqlx::query_scalar::<_, i32>("SELECT id FROM carts WHERE user_id = $1")
            .bind(customer_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::EmptyCart)?;

        // Lock the product rows for the duration of the transaction. The
        // id ordering gives every concurrent checkout the same lock
        // acquisition order.
        let lines = sqlx::query_as::<_, CheckoutLine>(
            "SELECT p.id AS product_id, p.name, p.price,
                    p.quantity AS stock, p.active,
                    ci.quantity AS requested
             FROM cart_items ci
             JOIN products p ON p.id = ci.product_id
             WHERE ci.cart_id = $1
             ORDER BY p.id
             FOR UPDATE OF p",
        )
        .bind(cart_id)
        .fetch_all(&mut *tx)
        .await?;

        if lines.is_empty() {
            return Err(AppError::EmptyCart);
        }

        validate_lines(&lines)?;
        let total = order_total(&lines);

        let order = sqlx::query_as::<_, Order>(
            "INSERT INTO orders (customer_id, total, status)
             VALUES ($1, $2, $3)
             RETURNING id, customer_id, total, status, created_at",
        )
        .bind(customer_id)
        .bind(total)
        .bind(OrderStatus::Completed)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(lines.len());
        for line in &lines {
            // Snapshot the unit price; later price changes must not touch
            // this order.
            let item = sqlx::query_as::<_, OrderItem>(
                "INSERT INTO order_items (order_id, product_id, quantity, price)
                 VALUES ($1, $2, $3, $4)
                 RETURNING id, order_id, product_id, quantity, price",
            )
            .bind(order.id)
            .bind(line.product_id)
            .bind(line.requested)
            .bind(line.price)
            .fetch_one(&mut *tx)
            .await?;
            items.push(item);

            sqlx::query("UPDATE products SET quantity = quantity - $2 WHERE id = $1")
                .bind(line.product_id)
                .bind(line.requested)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            customer_id = %customer_id,
            order_id = %order.id,
            total = %order.total,
            "Checkout completed"
        );

        Ok(CheckoutOutcome { order, items })
    }
}

/// Check every line against the locked stock.
///
/// Fails on the first line whose request exceeds stock or whose product
/// has been deactivated; no partial order may be created.
fn validate_lines(lines: &[CheckoutLine]) -> Result<()> {
    for line in lines {
        if !line.active || line.requested > line.stock {
            return Err(AppError::InsufficientStock {
                product: line.name.clone(),
            });
        }
    }
    Ok(())
}

/// Order total from the locked rows: current unit price times requested
/// quantity, never a client-supplied figure.
fn order_total(lines: &[CheckoutLine]) -> Decimal {
    lines
        .iter()
        .map(|line| line.price * Decimal::from(line.requested))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: i32, name: &str, price_cents: i64, stock: i32, requested: i32) -> CheckoutLine {
        CheckoutLine {
            product_id: ProductId::new(id),
            name: name.to_string(),
            price: Decimal::new(price_cents, 2),
            stock,
            active: true,
            requested,
        }
    }

    #[test]
    fn test_validate_accepts_exact_stock() {
        let lines = vec![line(1, "gourd", 1000, 3, 3)];
        assert!(validate_lines(&lines).is_ok());
    }

    #[test]
    fn test_validate_names_offending_product() {
        let lines = vec![line(1, "gourd", 1000, 3, 2), line(2, "bombilla", 500, 1, 4)];
        match validate_lines(&lines) {
            Err(AppError::InsufficientStock { product }) => assert_eq!(product, "bombilla"),
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_inactive_product() {
        let mut stale = line(1, "gourd", 1000, 5, 1);
        stale.active = false;
        assert!(matches!(
            validate_lines(&[stale]),
            Err(AppError::InsufficientStock { .. })
        ));
    }

    #[test]
    fn test_total_uses_current_price_times_quantity() {
        let lines = vec![line(1, "gourd", 1050, 5, 2), line(2, "bombilla", 299, 9, 3)];
        // 2 x 10.50 + 3 x 2.99 = 29.97
        assert_eq!(order_total(&lines), Decimal::new(2997, 2));
    }

    #[test]
    fn test_total_of_single_line() {
        let lines = vec![line(1, "gourd", 1000, 3, 2)];
        assert_eq!(order_total(&lines), Decimal::new(2000, 2));
    }
}
