//! Product repository: catalog queries and seller-side management.

use sqlx::PgPool;

use mercado_core::{ProductId, UserId};

use super::RepositoryError;
use crate::models::{CatalogProduct, NewProduct, Product};

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, quantity, image_url, seller_id, active, published_at";

/// Sort order for catalog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogSort {
    /// Most recently published first.
    #[default]
    Newest,
    /// Oldest listings first.
    Oldest,
    /// Cheapest first.
    PriceAsc,
    /// Most expensive first.
    PriceDesc,
}

impl CatalogSort {
    /// Parse a query-string value; unknown values fall back to newest,
    /// matching lenient query-parameter handling elsewhere.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("oldest") => Self::Oldest,
            Some("price_asc") => Self::PriceAsc,
            Some("price_desc") => Self::PriceDesc,
            _ => Self::Newest,
        }
    }

    /// The ORDER BY fragment for this sort. Values are fixed strings from
    /// the enum, never caller input.
    const fn order_clause(self) -> &'static str {
        match self {
            Self::Newest => "p.published_at DESC",
            Self::Oldest => "p.published_at ASC",
            Self::PriceAsc => "p.price ASC",
            Self::PriceDesc => "p.price DESC",
        }
    }
}

/// Filter for a catalog page.
///
/// Visibility (`quantity > 0 AND active`) is not part of the filter; it is
/// unconditional for every catalog read.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    /// Case-insensitive substring matched against name or description.
    pub search: Option<String>,
    /// Restrict to one seller's products (sellers browse their own stock).
    pub seller_id: Option<UserId>,
    /// Authenticated viewer, used to mark favorites.
    pub viewer_id: Option<UserId>,
    pub sort: CatalogSort,
}

impl CatalogFilter {
    /// `ILIKE` pattern for the search term, if any.
    fn search_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{s}%"))
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Insert a single product for a seller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        seller_id: UserId,
        product: &NewProduct,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (name, description, price, quantity, image_url, seller_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.quantity)
        .bind(&product.image_url)
        .bind(seller_id)
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// Insert a batch of products in one transaction.
    ///
    /// Either every row is inserted or none are; the caller has already
    /// filtered out malformed candidates.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails (the whole
    /// batch rolls back).
    pub async fn create_bulk(
        &self,
        seller_id: UserId,
        products: &[NewProduct],
    ) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0u64;

        for product in products {
            sqlx::query(
                "INSERT INTO products (name, description, price, quantity, image_url, seller_id)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(product.quantity)
            .bind(&product.image_url)
            .bind(seller_id)
            .execute(&mut *tx)
            .await?;
            inserted += 1;
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// Disable a product owned by the given seller: zero the stock and
    /// clear the active flag. Products are never hard-deleted.
    ///
    /// Returns `false` when the product does not exist or belongs to a
    /// different seller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn disable(
        &self,
        id: ProductId,
        seller_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE products SET quantity = 0, active = FALSE
             WHERE id = $1 AND seller_id = $2",
        )
        .bind(id)
        .bind(seller_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Fetch one catalog page.
    ///
    /// Only purchasable products (stock above zero, active) are visible.
    /// The page is in plain sort order; favorites-first reordering is the
    /// catalog service's concern.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn catalog_page(
        &self,
        filter: &CatalogFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CatalogProduct>, RepositoryError> {
        let order = filter.sort.order_clause();
        let rows = sqlx::query_as::<_, CatalogProduct>(&format!(
            "SELECT p.id, p.name, p.description, p.price, p.quantity, p.image_url,
                    p.seller_id, p.published_at,
                    u.email AS seller_email,
                    (f.id IS NOT NULL) AS is_favorite
             FROM products p
             JOIN users u ON u.id = p.seller_id
             LEFT JOIN favorites f ON f.product_id = p.id AND f.user_id = $1
             WHERE p.quantity > 0 AND p.active = TRUE
               AND ($2::text IS NULL OR p.name ILIKE $2 OR p.description ILIKE $2)
               AND ($3::int4 IS NULL OR p.seller_id = $3)
             ORDER BY {order}
             LIMIT $4 OFFSET $5"
        ))
        .bind(filter.viewer_id)
        .bind(filter.search_pattern())
        .bind(filter.seller_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Count the products matching a catalog filter (for pagination).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn catalog_count(&self, filter: &CatalogFilter) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)
             FROM products p
             WHERE p.quantity > 0 AND p.active = TRUE
               AND ($1::text IS NULL OR p.name ILIKE $1 OR p.description ILIKE $1)
               AND ($2::int4 IS NULL OR p.seller_id = $2)",
        )
        .bind(filter.search_pattern())
        .bind(filter.seller_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Count a seller's products (active or not), for the dashboard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_for_seller(&self, seller_id: UserId) -> Result<i64, RepositoryError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE seller_id = $1")
                .bind(seller_id)
                .fetch_one(self.pool)
                .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_from_query() {
        assert_eq!(CatalogSort::from_query(None), CatalogSort::Newest);
        assert_eq!(CatalogSort::from_query(Some("oldest")), CatalogSort::Oldest);
        assert_eq!(
            CatalogSort::from_query(Some("price_asc")),
            CatalogSort::PriceAsc
        );
        assert_eq!(
            CatalogSort::from_query(Some("price_desc")),
            CatalogSort::PriceDesc
        );
        // Unknown values fall back to the default rather than erroring
        assert_eq!(CatalogSort::from_query(Some("bogus")), CatalogSort::Newest);
    }

    #[test]
    fn test_search_pattern_trims_and_wraps() {
        let filter = CatalogFilter {
            search: Some("  mate  ".to_string()),
            ..CatalogFilter::default()
        };
        assert_eq!(filter.search_pattern().as_deref(), Some("%mate%"));

        let blank = CatalogFilter {
            search: Some("   ".to_string()),
            ..CatalogFilter::default()
        };
        assert_eq!(blank.search_pattern(), None);
    }
}
