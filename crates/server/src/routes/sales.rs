//! Seller sales route handlers.
//!
//! A "sale" is an order containing at least one of the seller's products;
//! the items of each order are filtered down to that seller's products so
//! one seller never sees another's lines.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Serialize;
use tracing::instrument;

use mercado_core::OrderId;

use crate::db::orders::OrderRepository;
use crate::error::Result;
use crate::middleware::auth::RequireSeller;
use crate::models::OrderWithItems;
use crate::routes::orders::{PageQuery, group_items, total_pages};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 20;

#[derive(Debug, Serialize)]
pub struct SalesResponse {
    pub sales: Vec<OrderWithItems>,
    pub total_pages: i64,
}

/// List orders containing the seller's products, newest first.
#[instrument(skip(state, seller), fields(seller_id = %seller.id))]
pub async fn list(
    State(state): State<AppState>,
    RequireSeller(seller): RequireSeller,
    Query(query): Query<PageQuery>,
) -> Result<Json<SalesResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 100);

    let repo = OrderRepository::new(state.pool());

    let total = repo.sales_count_for_seller(seller.id).await?;
    let orders = repo
        .sales_page_for_seller(seller.id, limit, (page - 1) * limit)
        .await?;

    let order_ids: Vec<OrderId> = orders.iter().map(|o| o.id).collect();
    let items = repo.items_for_seller(&order_ids, seller.id).await?;

    Ok(Json(SalesResponse {
        sales: group_items(orders, items),
        total_pages: total_pages(total, limit),
    }))
}
