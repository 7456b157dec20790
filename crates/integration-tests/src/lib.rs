//! Integration test helpers for Mercado.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! docker compose up -d postgres
//! cargo run -p mercado-cli -- migrate
//!
//! # Start the server
//! cargo run -p mercado-server
//!
//! # Run integration tests
//! cargo test -p mercado-integration-tests -- --ignored
//! ```
//!
//! Tests are `#[ignore]`d by default because they need a running server
//! and database. `MERCADO_BASE_URL` overrides the default server address.

use reqwest::Client;
use serde_json::{Value, json};

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("MERCADO_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create an HTTP client.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// Register a throwaway account and return its bearer token.
///
/// Emails are randomized so tests don't collide with each other or with
/// leftovers from previous runs.
///
/// # Panics
///
/// Panics if the registration request fails.
pub async fn register(client: &Client, role: &str) -> String {
    let email = format!("test-{}@example.com", uuid::Uuid::new_v4());
    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({
            "email": email,
            "password": "password1",
            "role": role,
        }))
        .send()
        .await
        .expect("Failed to register test account");

    assert_eq!(resp.status(), 201, "registration should succeed");
    let body: Value = resp.json().await.expect("Failed to parse response");
    body["token"]
        .as_str()
        .expect("registration response carries a token")
        .to_string()
}

/// Create a product as the given seller; returns its id.
///
/// # Panics
///
/// Panics if the creation request fails.
pub async fn create_product(client: &Client, seller_token: &str, stock: i32, price: f64) -> i64 {
    let resp = client
        .post(format!("{}/api/products", base_url()))
        .bearer_auth(seller_token)
        .json(&json!({
            "name": format!("test product {}", uuid::Uuid::new_v4()),
            "price": price,
            "description": "integration test product",
            "quantity": stock,
            "image_url": "https://img.example/test.jpg",
        }))
        .send()
        .await
        .expect("Failed to create test product");

    assert_eq!(resp.status(), 201, "product creation should succeed");
    let body: Value = resp.json().await.expect("Failed to parse response");
    body["product"]["id"]
        .as_i64()
        .expect("creation response carries the product id")
}

/// Put a product in the authenticated user's cart.
///
/// # Panics
///
/// Panics if the request itself fails (a non-2xx response is returned to
/// the caller for assertion).
pub async fn add_to_cart(
    client: &Client,
    token: &str,
    product_id: i64,
    quantity: i32,
) -> reqwest::Response {
    client
        .post(format!("{}/api/cart/add", base_url()))
        .bearer_auth(token)
        .json(&json!({ "product_id": product_id, "quantity": quantity }))
        .send()
        .await
        .expect("Failed to send add-to-cart request")
}

/// Attempt a checkout; returns the raw response for assertion.
///
/// # Panics
///
/// Panics if the request itself fails.
pub async fn checkout(client: &Client, token: &str) -> reqwest::Response {
    client
        .post(format!("{}/api/cart/checkout", base_url()))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to send checkout request")
}
