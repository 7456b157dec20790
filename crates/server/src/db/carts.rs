//! Cart repository.
//!
//! A cart is created lazily the first time a user touches it. Lines are
//! keyed by `(cart_id, product_id)`; writing an existing line replaces its
//! quantity rather than incrementing it.

use sqlx::PgPool;

use mercado_core::{CartId, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Cart, CartLine};

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user's cart, if they have one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        let cart = sqlx::query_as::<_, Cart>("SELECT id, user_id FROM carts WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(self.pool)
            .await?;

        Ok(cart)
    }

    /// Get a user's cart, creating it if this is their first access.
    ///
    /// The upsert makes concurrent first accesses converge on one row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Cart, RepositoryError> {
        let cart = sqlx::query_as::<_, Cart>(
            "INSERT INTO carts (user_id) VALUES ($1)
             ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
             RETURNING id, user_id",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(cart)
    }

    /// Write a cart line, replacing the quantity if the product is already
    /// in the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn upsert_line(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO cart_items (cart_id, product_id, quantity)
             VALUES ($1, $2, $3)
             ON CONFLICT (cart_id, product_id) DO UPDATE SET quantity = EXCLUDED.quantity",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Remove a product's line from a cart. Removing an absent line is a
    /// no-op, so the operation is idempotent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn remove_line(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND product_id = $2")
            .bind(cart_id)
            .bind(product_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete every line whose product has gone out of stock or inactive.
    ///
    /// Idempotent: running it twice in a row deletes nothing the second
    /// time. Returns the number of lines pruned.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn prune_stale_lines(&self, cart_id: CartId) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM cart_items ci
             USING products p
             WHERE ci.product_id = p.id
               AND ci.cart_id = $1
               AND (p.quantity <= 0 OR p.active = FALSE)",
        )
        .bind(cart_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// List a cart's lines joined with live product data.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines(&self, cart_id: CartId) -> Result<Vec<CartLine>, RepositoryError> {
        let lines = sqlx::query_as::<_, CartLine>(
            "SELECT ci.id, ci.quantity,
                    p.id AS product_id, p.name AS product_name, p.price,
                    p.quantity AS stock, p.image_url,
                    u.email AS seller_email
             FROM cart_items ci
             JOIN products p ON p.id = ci.product_id
             JOIN users u ON u.id = p.seller_id
             WHERE ci.cart_id = $1
             ORDER BY ci.id",
        )
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        Ok(lines)
    }

    /// Sum of line quantities across a user's cart (dashboard stat).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn total_quantity(&self, user_id: UserId) -> Result<i64, RepositoryError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(ci.quantity), 0)
             FROM cart_items ci
             JOIN carts c ON c.id = ci.cart_id
             WHERE c.user_id = $1",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(total)
    }
}
