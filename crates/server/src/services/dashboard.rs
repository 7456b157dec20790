//! Dashboard aggregator.
//!
//! Pure read-side computation: the reported numbers must equal a direct
//! recomputation from the same rows. Buyer and seller dashboards differ in
//! shape, so the stats type is an untagged enum.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use mercado_core::Role;

use crate::db::carts::CartRepository;
use crate::db::favorites::FavoriteRepository;
use crate::db::orders::{OrderRepository, ProductUnits};
use crate::db::products::ProductRepository;
use crate::error::Result;
use crate::middleware::auth::AuthUser;

/// The seller's most-sold product.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BestSeller {
    pub name: String,
    pub units: i64,
}

/// Buyer-side dashboard numbers.
#[derive(Debug, Serialize)]
pub struct BuyerStats {
    pub total_orders: i64,
    pub total_spent: Decimal,
    pub total_favorites: i64,
    pub cart_items: i64,
}

/// Seller-side dashboard numbers.
#[derive(Debug, Serialize)]
pub struct SellerStats {
    pub total_products: i64,
    pub total_sales: i64,
    pub total_revenue: Decimal,
    pub best_seller: Option<BestSeller>,
}

/// Role-dependent dashboard statistics.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DashboardStats {
    Buyer(BuyerStats),
    Seller(SellerStats),
}

/// Dashboard service.
pub struct DashboardService<'a> {
    pool: &'a PgPool,
}

impl<'a> DashboardService<'a> {
    /// Create a new dashboard service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Compute the caller's dashboard statistics.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if any query fails.
    pub async fn stats(&self, user: &AuthUser) -> Result<DashboardStats> {
        match user.role {
            Role::Buyer => self.buyer_stats(user).await,
            Role::Seller => self.seller_stats(user).await,
        }
    }

    async fn buyer_stats(&self, user: &AuthUser) -> Result<DashboardStats> {
        let orders = OrderRepository::new(self.pool);
        let favorites = FavoriteRepository::new(self.pool);
        let carts = CartRepository::new(self.pool);

        let (total_orders, total_spent) = orders.buyer_stats(user.id).await?;
        let total_favorites = favorites.count_for_user(user.id).await?;
        let cart_items = carts.total_quantity(user.id).await?;

        Ok(DashboardStats::Buyer(BuyerStats {
            total_orders,
            total_spent,
            total_favorites,
            cart_items,
        }))
    }

    async fn seller_stats(&self, user: &AuthUser) -> Result<DashboardStats> {
        let orders = OrderRepository::new(self.pool);
        let products = ProductRepository::new(self.pool);

        let total_products = products.count_for_seller(user.id).await?;
        let (total_sales, total_revenue) = orders.seller_totals(user.id).await?;
        let best_seller = best_seller(orders.units_by_product(user.id).await?);

        Ok(DashboardStats::Seller(SellerStats {
            total_products,
            total_sales,
            total_revenue,
            best_seller,
        }))
    }
}

/// Pick the best-selling product from per-product unit counts.
///
/// Ties break toward the lowest product id, making the result
/// deterministic regardless of row order.
fn best_seller(rows: Vec<ProductUnits>) -> Option<BestSeller> {
    rows.into_iter()
        .max_by(|a, b| {
            a.units
                .cmp(&b.units)
                .then_with(|| b.product_id.cmp(&a.product_id))
        })
        .map(|row| BestSeller {
            name: row.name,
            units: row.units,
        })
}
