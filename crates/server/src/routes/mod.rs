//! HTTP route handlers for the Mercado API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (pings the database)
//!
//! # Auth
//! POST /api/auth/register           - Create an account, returns a token
//! POST /api/auth/login              - Login, returns a token
//! GET  /api/auth/me                 - Current identity (re-reads `active`)
//!
//! # Products
//! GET  /api/products                - Catalog (paginated, searchable, sorted)
//! POST /api/products                - Create product (seller)
//! POST /api/products/bulk           - Bulk import (seller)
//! PATCH /api/products/{id}/disable  - Disable product (seller)
//!
//! # Cart
//! GET  /api/cart                    - List cart (reconciles stale lines)
//! POST /api/cart/add                - Add/replace a line
//! POST /api/cart/remove             - Remove a line (idempotent)
//! POST /api/cart/checkout           - Atomic checkout
//!
//! # Orders & sales
//! GET  /api/orders                  - Buyer order history
//! GET  /api/sales                   - Seller sales view
//!
//! # Favorites
//! POST /api/favorites/add           - Favorite a product (idempotent)
//! POST /api/favorites/remove        - Unfavorite a product (idempotent)
//!
//! # Dashboard & account
//! GET  /api/dashboard               - Role-dependent statistics
//! POST /api/account/deactivate      - Deactivate account + products (seller)
//! POST /api/account/reactivate      - Reactivate account + products (seller)
//! POST /api/account/delete          - Soft-delete account (password confirm)
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod dashboard;
pub mod favorites;
pub mod orders;
pub mod products;
pub mod sales;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route("/bulk", post(products::bulk_import))
        .route("/{id}/disable", patch(products::disable))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/checkout", post(cart::checkout))
}

/// Create the favorites routes router.
pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(favorites::add))
        .route("/remove", post(favorites::remove))
}

/// Create the account lifecycle routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/deactivate", post(account::deactivate))
        .route("/reactivate", post(account::reactivate))
        .route("/delete", post(account::delete))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/products", product_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/favorites", favorite_routes())
        .nest("/api/account", account_routes())
        .route("/api/orders", get(orders::list))
        .route("/api/sales", get(sales::list))
        .route("/api/dashboard", get(dashboard::show))
}
