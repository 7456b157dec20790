//! Product route handlers: public catalog plus seller-side management.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use mercado_core::{ProductId, Role};

use crate::db::products::{CatalogSort, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::auth::{OptionalAuth, RequireSeller};
use crate::models::{CatalogProduct, NewProduct, Product};
use crate::services::catalog::{CatalogService, DEFAULT_PAGE_SIZE};
use crate::state::AppState;

/// Catalog listing query parameters.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub products: Vec<CatalogProduct>,
    pub total_pages: i64,
    /// The viewer's role, if authenticated.
    pub role: Option<Role>,
}

/// Product creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub quantity: Option<i32>,
    pub image_url: Option<String>,
}

/// One candidate row of a bulk import. Rows missing any field are
/// silently discarded rather than failing the batch.
#[derive(Debug, Deserialize)]
pub struct BulkProductRow {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub quantity: Option<i32>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BulkImportRequest {
    pub products: Option<Vec<BulkProductRow>>,
}

#[derive(Debug, Serialize)]
pub struct CreateProductResponse {
    pub success: bool,
    pub product: Product,
}

#[derive(Debug, Serialize)]
pub struct BulkImportResponse {
    pub success: bool,
    pub inserted_count: u64,
}

/// List the catalog: paginated, searchable, sortable, favorites first for
/// authenticated viewers. Sellers see their own products only.
#[instrument(skip(state, viewer))]
pub async fn list(
    State(state): State<AppState>,
    OptionalAuth(viewer): OptionalAuth,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<CatalogResponse>> {
    let catalog = CatalogService::new(state.pool());

    let page = catalog
        .page(
            viewer.as_ref(),
            query.page.unwrap_or(1),
            query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
            query.search,
            CatalogSort::from_query(query.sort.as_deref()),
        )
        .await?;

    Ok(Json(CatalogResponse {
        products: page.products,
        total_pages: page.total_pages,
        role: viewer.map(|v| v.role),
    }))
}

/// Create a product for the authenticated seller.
#[instrument(skip(state, seller, body), fields(seller_id = %seller.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireSeller(seller): RequireSeller,
    Json(body): Json<CreateProductRequest>,
) -> Result<impl IntoResponse> {
    let new_product = validate_product(
        body.name,
        body.price,
        body.description,
        body.quantity,
        body.image_url,
    )
    .ok_or_else(|| AppError::InvalidInput("Missing required fields".to_string()))?;

    let repo = ProductRepository::new(state.pool());
    let product = repo.create(seller.id, &new_product).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateProductResponse {
            success: true,
            product,
        }),
    ))
}

/// Bulk import: validates candidate rows, silently dropping malformed
/// ones, and inserts the valid subset in one transaction.
#[instrument(skip(state, seller, body), fields(seller_id = %seller.id))]
pub async fn bulk_import(
    State(state): State<AppState>,
    RequireSeller(seller): RequireSeller,
    Json(body): Json<BulkImportRequest>,
) -> Result<Json<BulkImportResponse>> {
    let rows = body
        .products
        .filter(|rows| !rows.is_empty())
        .ok_or_else(|| AppError::InvalidInput("No products received".to_string()))?;

    let candidates = rows.len();
    let valid = filter_valid_rows(rows);
    if valid.is_empty() {
        return Err(AppError::InvalidInput("No valid products found".to_string()));
    }

    let dropped = candidates - valid.len();
    if dropped > 0 {
        tracing::debug!(dropped, "Discarded malformed bulk import rows");
    }

    let repo = ProductRepository::new(state.pool());
    let inserted_count = repo.create_bulk(seller.id, &valid).await?;

    Ok(Json(BulkImportResponse {
        success: true,
        inserted_count,
    }))
}

/// Disable a product: zero its stock and clear the active flag.
#[instrument(skip(state, seller), fields(seller_id = %seller.id))]
pub async fn disable(
    State(state): State<AppState>,
    RequireSeller(seller): RequireSeller,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>> {
    let repo = ProductRepository::new(state.pool());
    let disabled = repo.disable(ProductId::new(id), seller.id).await?;

    if !disabled {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Product disabled (stock zeroed)",
    })))
}

/// Validate one product's worth of fields, trimming text and normalizing
/// the price to two decimal places. Returns `None` if any field is
/// missing, blank, or out of range.
fn validate_product(
    name: Option<String>,
    price: Option<f64>,
    description: Option<String>,
    quantity: Option<i32>,
    image_url: Option<String>,
) -> Option<NewProduct> {
    let name = non_blank(name)?;
    let description = non_blank(description)?;
    let image_url = non_blank(image_url)?;
    let quantity = quantity.filter(|q| *q > 0)?;
    let price = Decimal::try_from(price?).ok()?.round_dp(2);
    if price.is_sign_negative() {
        return None;
    }

    Some(NewProduct {
        name,
        description,
        price,
        quantity,
        image_url,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Keep only the well-formed rows of a bulk import.
fn filter_valid_rows(rows: Vec<BulkProductRow>) -> Vec<NewProduct> {
    rows.into_iter()
        .filter_map(|row| {
            validate_product(
                row.name,
                row.price,
                row.description,
                row.quantity,
                row.image_url,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_row() -> BulkProductRow {
        BulkProductRow {
            name: Some("Mate gourd".to_string()),
            price: Some(10.5),
            description: Some("Hand carved".to_string()),
            quantity: Some(3),
            image_url: Some("https://img.example/gourd.jpg".to_string()),
        }
    }

    #[test]
    fn test_validate_trims_and_rounds() {
        let product = validate_product(
            Some("  Mate gourd  ".to_string()),
            Some(10.005),
            Some(" Hand carved ".to_string()),
            Some(3),
            Some(" https://img.example/gourd.jpg ".to_string()),
        )
        .expect("valid product");

        assert_eq!(product.name, "Mate gourd");
        assert_eq!(product.description, "Hand carved");
        assert_eq!(product.image_url, "https://img.example/gourd.jpg");
        assert_eq!(product.price.to_string(), "10.00");
    }

    #[test]
    fn test_validate_rejects_missing_or_blank() {
        assert!(validate_product(None, Some(1.0), Some("d".into()), Some(1), Some("u".into()))
            .is_none());
        assert!(validate_product(
            Some("   ".to_string()),
            Some(1.0),
            Some("d".into()),
            Some(1),
            Some("u".into())
        )
        .is_none());
    }

    #[test]
    fn test_validate_rejects_bad_numbers() {
        assert!(
            validate_product(Some("n".into()), Some(-1.0), Some("d".into()), Some(1), Some("u".into()))
                .is_none()
        );
        assert!(
            validate_product(Some("n".into()), Some(1.0), Some("d".into()), Some(0), Some("u".into()))
                .is_none()
        );
        assert!(
            validate_product(Some("n".into()), None, Some("d".into()), Some(1), Some("u".into()))
                .is_none()
        );
    }

    #[test]
    fn test_filter_keeps_only_wellformed_rows() {
        let mut broken = full_row();
        broken.image_url = None;
        let mut negative = full_row();
        negative.price = Some(-3.0);

        let valid = filter_valid_rows(vec![full_row(), broken, full_row(), negative]);
        assert_eq!(valid.len(), 2);
    }
}
