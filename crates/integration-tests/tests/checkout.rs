//! Integration tests for the checkout engine.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p mercado-server)
//!
//! Run with: cargo test -p mercado-integration-tests -- --ignored

use serde_json::Value;

use mercado_integration_tests::{add_to_cart, base_url, checkout, client, create_product, register};

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_checkout_decrements_stock_and_clears_cart() {
    let client = client();
    let seller = register(&client, "seller").await;
    let buyer = register(&client, "buyer").await;

    let product_id = create_product(&client, &seller, 3, 10.00).await;

    let resp = add_to_cart(&client, &buyer, product_id, 2).await;
    assert_eq!(resp.status(), 200);

    let resp = checkout(&client, &buyer).await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("checkout response");
    assert_eq!(body["success"], true);
    assert_eq!(body["order"]["total"], "20.00");
    assert_eq!(body["order"]["items"][0]["quantity"], 2);
    assert_eq!(body["order"]["items"][0]["price"], "10.00");

    // Stock decremented from 3 to 1: the seller's catalog shows it
    let resp = client
        .get(format!("{}/api/products", base_url()))
        .bearer_auth(&seller)
        .send()
        .await
        .expect("catalog request");
    let body: Value = resp.json().await.expect("catalog response");
    let product = body["products"]
        .as_array()
        .expect("products array")
        .iter()
        .find(|p| p["id"].as_i64() == Some(product_id))
        .expect("product still listed");
    assert_eq!(product["quantity"], 1);

    // Cart is empty afterwards
    let resp = client
        .get(format!("{}/api/cart", base_url()))
        .bearer_auth(&buyer)
        .send()
        .await
        .expect("cart request");
    let body: Value = resp.json().await.expect("cart response");
    assert_eq!(body["items"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_empty_cart_checkout_fails_without_writes() {
    let client = client();
    let buyer = register(&client, "buyer").await;

    let resp = checkout(&client, &buyer).await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.expect("error response");
    assert!(body["error"].as_str().expect("error message").contains("empty"));

    // No order was created
    let resp = client
        .get(format!("{}/api/orders", base_url()))
        .bearer_auth(&buyer)
        .send()
        .await
        .expect("orders request");
    let body: Value = resp.json().await.expect("orders response");
    assert_eq!(body["orders"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_oversell_attempt_aborts_whole_order() {
    let client = client();
    let seller = register(&client, "seller").await;
    let buyer = register(&client, "buyer").await;

    let plentiful = create_product(&client, &seller, 10, 5.00).await;
    let scarce = create_product(&client, &seller, 2, 7.00).await;

    add_to_cart(&client, &buyer, plentiful, 1).await;
    add_to_cart(&client, &buyer, scarce, 2).await;

    // Another buyer takes the scarce units first
    let rival = register(&client, "buyer").await;
    add_to_cart(&client, &rival, scarce, 2).await;
    let resp = checkout(&client, &rival).await;
    assert_eq!(resp.status(), 200);

    // The first buyer's checkout now fails as a whole; the plentiful line
    // must not be sold on its own
    let resp = checkout(&client, &buyer).await;
    assert_eq!(resp.status(), 400);

    let resp = client
        .get(format!("{}/api/orders", base_url()))
        .bearer_auth(&buyer)
        .send()
        .await
        .expect("orders request");
    let body: Value = resp.json().await.expect("orders response");
    assert_eq!(body["orders"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_concurrent_checkouts_sell_last_unit_once() {
    let client = client();
    let seller = register(&client, "seller").await;
    let product_id = create_product(&client, &seller, 1, 9.99).await;

    let buyer_a = register(&client, "buyer").await;
    let buyer_b = register(&client, "buyer").await;
    add_to_cart(&client, &buyer_a, product_id, 1).await;
    add_to_cart(&client, &buyer_b, product_id, 1).await;

    let (resp_a, resp_b) = tokio::join!(
        checkout(&client, &buyer_a),
        checkout(&client, &buyer_b)
    );

    let statuses = [resp_a.status().as_u16(), resp_b.status().as_u16()];
    let successes = statuses.iter().filter(|s| **s == 200).count();
    let failures = statuses.iter().filter(|s| **s == 400).count();

    // Exactly one buyer gets the unit; the other fails with
    // insufficient stock and the product drops out of the catalog.
    assert_eq!(successes, 1, "exactly one checkout must succeed: {statuses:?}");
    assert_eq!(failures, 1, "the losing checkout must fail: {statuses:?}");

    let resp = client
        .get(format!("{}/api/products", base_url()))
        .bearer_auth(&seller)
        .send()
        .await
        .expect("catalog request");
    let body: Value = resp.json().await.expect("catalog response");
    let still_listed = body["products"]
        .as_array()
        .expect("products array")
        .iter()
        .any(|p| p["id"].as_i64() == Some(product_id));
    assert!(!still_listed, "sold-out product must leave the catalog");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_order_snapshot_survives_price_change() {
    let client = client();
    let seller = register(&client, "seller").await;
    let buyer = register(&client, "buyer").await;

    let product_id = create_product(&client, &seller, 5, 10.00).await;
    add_to_cart(&client, &buyer, product_id, 1).await;
    let resp = checkout(&client, &buyer).await;
    assert_eq!(resp.status(), 200);

    // The order item keeps the price paid, whatever the product costs now
    let resp = client
        .get(format!("{}/api/orders", base_url()))
        .bearer_auth(&buyer)
        .send()
        .await
        .expect("orders request");
    let body: Value = resp.json().await.expect("orders response");
    let order = &body["orders"][0];
    assert_eq!(order["total"], "10.00");
    assert_eq!(order["items"][0]["price"], "10.00");
    assert_eq!(order["status"], "COMPLETED");
}
