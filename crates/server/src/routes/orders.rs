//! Buyer order-history route handlers.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use mercado_core::OrderId;

use crate::db::orders::OrderRepository;
use crate::error::Result;
use crate::middleware::auth::RequireAuth;
use crate::models::{Order, OrderItemDetail, OrderWithItems};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 10;

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct OrdersResponse {
    pub orders: Vec<OrderWithItems>,
    pub total_pages: i64,
}

/// Attach each order's items, preserving the order page's ordering.
pub(crate) fn group_items(
    orders: Vec<Order>,
    items: Vec<OrderItemDetail>,
) -> Vec<OrderWithItems> {
    let mut by_order: HashMap<OrderId, Vec<OrderItemDetail>> = HashMap::new();
    for item in items {
        by_order.entry(item.order_id).or_default().push(item);
    }

    orders
        .into_iter()
        .map(|order| {
            let items = by_order.remove(&order.id).unwrap_or_default();
            OrderWithItems { order, items }
        })
        .collect()
}

pub(crate) fn total_pages(total: i64, limit: i64) -> i64 {
    (total + limit - 1).div_euclid(limit).max(1)
}

/// List the caller's orders, newest first.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<PageQuery>,
) -> Result<Json<OrdersResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 100);

    let repo = OrderRepository::new(state.pool());

    let total = repo.count_for_customer(user.id).await?;
    let orders = repo
        .page_for_customer(user.id, limit, (page - 1) * limit)
        .await?;

    let order_ids: Vec<OrderId> = orders.iter().map(|o| o.id).collect();
    let items = repo.items_with_sellers(&order_ids).await?;

    Ok(Json(OrdersResponse {
        orders: group_items(orders, items),
        total_pages: total_pages(total, limit),
    }))
}
