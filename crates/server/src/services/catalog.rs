//! Catalog query service.
//!
//! Paginated, filterable, sortable reads over the product table. Only
//! purchasable products (stock above zero, active) are ever visible; a
//! seller browsing the catalog sees their own products only.
//!
//! Favorites-first ordering is applied per page: the fetched page is
//! stably partitioned so the viewer's favorites lead, but no product is
//! pulled forward from a later page. (The alternative whole-catalog
//! ordering would require a second sort key server-side; the per-page
//! behavior is what the reference listing implements.)

use sqlx::PgPool;

use crate::db::products::{CatalogFilter, CatalogSort, ProductRepository};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::CatalogProduct;

/// Default page size for catalog listings.
pub const DEFAULT_PAGE_SIZE: i64 = 20;
/// Upper bound on the page size a client may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// One page of catalog results.
#[derive(Debug)]
pub struct CatalogPage {
    pub products: Vec<CatalogProduct>,
    pub total_pages: i64,
}

/// Catalog query service.
pub struct CatalogService<'a> {
    products: ProductRepository<'a>,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            products: ProductRepository::new(pool),
        }
    }

    /// Fetch one page of the catalog as seen by `viewer`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if any query fails; no partial results
    /// are synthesized.
    pub async fn page(
        &self,
        viewer: Option<&AuthUser>,
        page: i64,
        limit: i64,
        search: Option<String>,
        sort: CatalogSort,
    ) -> Result<CatalogPage> {
        let page = page.max(1);
        let limit = limit.clamp(1, MAX_PAGE_SIZE);

        let filter = CatalogFilter {
            search,
            // Sellers manage stock through the same listing, so they see
            // only their own products.
            seller_id: viewer
                .filter(|v| v.role.is_seller())
                .map(|v| v.id),
            viewer_id: viewer.map(|v| v.id),
            sort,
        };

        let total = self.products.catalog_count(&filter).await?;
        let total_pages = (total + limit - 1).div_euclid(limit).max(1);

        let offset = (page - 1) * limit;
        let mut products = self.products.catalog_page(&filter, limit, offset).await?;

        if viewer.is_some() {
            products = partition_favorites_first(products);
        }

        Ok(CatalogPage {
            products,
            total_pages,
        })
    }
}

/// Stably reorder a page so favorited products come first.
///
/// Relative order inside each partition is preserved, so the underlying
/// sort still reads correctly within both groups.
fn partition_favorites_first(products: Vec<CatalogProduct>) -> Vec<CatalogProduct> {
    let (mut favorites, rest): (Vec<_>, Vec<_>) =
        products.into_iter().partition(|p| p.is_favorite);
    favorites.extend(rest);
    favorites
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use mercado_core::{ProductId, UserId};

    use super::*;

    fn product(id: i32, is_favorite: bool) -> CatalogProduct {
        CatalogProduct {
            id: ProductId::new(id),
            name: format!("product {id}"),
            description: String::new(),
            price: Decimal::new(1000, 2),
            quantity: 5,
            image_url: String::new(),
            seller_id: UserId::new(1),
            published_at: Utc::now(),
            seller_email: "seller@example.com".to_string(),
            is_favorite,
        }
    }

    fn ids(products: &[CatalogProduct]) -> Vec<i32> {
        products.iter().map(|p| p.id.as_i32()).collect()
    }

    #[test]
    fn test_favorites_float_to_front() {
        let page = vec![
            product(1, false),
            product(2, true),
            product(3, false),
            product(4, true),
        ];
        let reordered = partition_favorites_first(page);
        assert_eq!(ids(&reordered), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_partition_is_stable() {
        // Order within each group must match the incoming sort
        let page = vec![
            product(9, true),
            product(5, false),
            product(3, true),
            product(1, false),
        ];
        let reordered = partition_favorites_first(page);
        assert_eq!(ids(&reordered), vec![9, 3, 5, 1]);
    }

    #[test]
    fn test_no_favorites_is_identity() {
        let page = vec![product(1, false), product(2, false)];
        let reordered = partition_favorites_first(page);
        assert_eq!(ids(&reordered), vec![1, 2]);
    }

    #[test]
    fn test_all_favorites_is_identity() {
        let page = vec![product(1, true), product(2, true)];
        let reordered = partition_favorites_first(page);
        assert_eq!(ids(&reordered), vec![1, 2]);
    }
}
