//! Cart aggregator.
//!
//! Maintains the per-user product -> desired quantity mapping. The stock
//! check at add time is advisory: stock can change between add and
//! checkout, so [`CartService::reconcile`] re-enforces it at read time and
//! the checkout transaction enforces it definitively.

use sqlx::PgPool;

use mercado_core::ProductId;

use crate::db::carts::CartRepository;
use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::CartLine;

/// Cart service.
pub struct CartService<'a> {
    carts: CartRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            carts: CartRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    /// Put a product in the user's cart at the given quantity.
    ///
    /// If the product is already in the cart the quantity is replaced, not
    /// incremented. The cart is created on first use.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for a non-positive quantity,
    /// `AppError::NotFound` for an unknown product, and
    /// `AppError::OutOfStock` when the requested quantity exceeds the
    /// product's live stock.
    pub async fn add_item(
        &self,
        user: &AuthUser,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<()> {
        if quantity < 1 {
            return Err(AppError::InvalidInput(
                "Quantity must be at least 1".to_string(),
            ));
        }

        let product = self
            .products
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        if quantity > product.quantity {
            return Err(AppError::OutOfStock);
        }

        let cart = self.carts.get_or_create(user.id).await?;
        self.carts.upsert_line(cart.id, product_id, quantity).await?;

        Ok(())
    }

    /// Remove a product from the user's cart. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the user has no cart at all.
    pub async fn remove_item(&self, user: &AuthUser, product_id: ProductId) -> Result<()> {
        let cart = self
            .carts
            .get(user.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cart not found".to_string()))?;

        self.carts.remove_line(cart.id, product_id).await?;
        Ok(())
    }

    /// List the user's cart after reconciling it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if any query fails.
    pub async fn list(&self, user: &AuthUser) -> Result<Vec<CartLine>> {
        let cart = self.carts.get_or_create(user.id).await?;

        let pruned = self.carts.prune_stale_lines(cart.id).await?;
        if pruned > 0 {
            tracing::debug!(user_id = %user.id, pruned, "Pruned stale cart lines");
        }

        Ok(self.carts.lines(cart.id).await?)
    }
}
