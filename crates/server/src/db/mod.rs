//! Database operations for the Mercado `PostgreSQL` store.
//!
//! ## Tables
//!
//! - `users` - Accounts (buyer/seller), soft-deleted only
//! - `products` - Seller listings; stock decremented by checkout
//! - `carts` / `cart_items` - One cart per user, lazily created
//! - `orders` / `order_items` - Immutable checkout snapshots
//! - `favorites` - Buyer-product membership relation
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p mercado-cli -- migrate
//! ```
//!
//! All queries use the runtime API (`sqlx::query` / `sqlx::query_as`) so
//! the workspace builds without a database connection.

pub mod carts;
pub mod favorites;
pub mod orders;
pub mod products;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use carts::CartRepository;
pub use favorites::FavoriteRepository;
pub use orders::OrderRepository;
pub use products::{CatalogFilter, CatalogSort, ProductRepository};
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
