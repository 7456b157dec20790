//! Integration tests for cart behavior.
//!
//! Run with: cargo test -p mercado-integration-tests -- --ignored

use serde_json::Value;

use mercado_integration_tests::{add_to_cart, base_url, client, create_product, register};

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_add_beyond_stock_is_rejected() {
    let client = client();
    let seller = register(&client, "seller").await;
    let buyer = register(&client, "buyer").await;

    let product_id = create_product(&client, &seller, 3, 5.00).await;

    let resp = add_to_cart(&client, &buyer, product_id, 5).await;
    assert_eq!(resp.status(), 400);

    // Cart unchanged
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
async fn test_re_adding_replaces_quantity() {
    let client = client();
    let seller = register(&client, "seller").await;
    let buyer = register(&client, "buyer").await;

    let product_id = create_product(&client, &seller, 10, 5.00).await;

    add_to_cart(&client, &buyer, product_id, 2).await;
    add_to_cart(&client, &buyer, product_id, 7).await;

    let resp = client
        .get(format!("{}/api/cart", base_url()))
        .bearer_auth(&buyer)
        .send()
        .await
        .expect("cart request");
    let body: Value = resp.json().await.expect("cart response");
    let items = body["items"].as_array().expect("items array");
    assert_eq!(items.len(), 1);
    // Replaced, not incremented to 9
    assert_eq!(items[0]["quantity"], 7);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_listing_prunes_sold_out_products() {
    let client = client();
    let seller = register(&client, "seller").await;
    let buyer = register(&client, "buyer").await;

    let product_id = create_product(&client, &seller, 1, 5.00).await;
    add_to_cart(&client, &buyer, product_id, 1).await;

    // A rival buys the only unit
    let rival = register(&client, "buyer").await;
    add_to_cart(&client, &rival, product_id, 1).await;
    let resp = mercado_integration_tests::checkout(&client, &rival).await;
    assert_eq!(resp.status(), 200);

    // The stale line disappears from the listing
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
async fn test_remove_is_idempotent() {
    let client = client();
    let seller = register(&client, "seller").await;
    let buyer = register(&client, "buyer").await;

    let product_id = create_product(&client, &seller, 5, 5.00).await;
    add_to_cart(&client, &buyer, product_id, 1).await;

    for _ in 0..2 {
        let resp = client
            .post(format!("{}/api/cart/remove", base_url()))
            .bearer_auth(&buyer)
            .json(&serde_json::json!({ "product_id": product_id }))
            .send()
            .await
            .expect("remove request");
        assert_eq!(resp.status(), 200);
    }
}
