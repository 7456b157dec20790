//! Integration tests for product bulk import.
//!
//! Run with: cargo test -p mercado-integration-tests -- --ignored

use serde_json::{Value, json};

use mercado_integration_tests::{base_url, client, register};

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_malformed_rows_are_dropped_and_counted_out() {
    let client = client();
    let seller = register(&client, "seller").await;

    // 4 candidates, 2 well-formed
    let resp = client
        .post(format!("{}/api/products/bulk", base_url()))
        .bearer_auth(&seller)
        .json(&json!({
            "products": [
                {
                    "name": "Gourd",
                    "price": 24.9,
                    "description": "Hand carved",
                    "quantity": 10,
                    "image_url": "https://img.example/gourd.jpg"
                },
                { "name": "No price", "description": "d", "quantity": 1, "image_url": "u" },
                {
                    "name": "Bombilla",
                    "price": 9.5,
                    "description": "Steel straw",
                    "quantity": 40,
                    "image_url": "https://img.example/bombilla.jpg"
                },
                { "price": 1.0, "description": "missing name", "quantity": 1, "image_url": "u" }
            ]
        }))
        .send()
        .await
        .expect("bulk import request");

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("bulk import response");
    assert_eq!(body["success"], true);
    assert_eq!(body["inserted_count"], 2);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_empty_batch_is_rejected() {
    let client = client();
    let seller = register(&client, "seller").await;

    let resp = client
        .post(format!("{}/api/products/bulk", base_url()))
        .bearer_auth(&seller)
        .json(&json!({ "products": [] }))
        .send()
        .await
        .expect("bulk import request");
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_all_invalid_batch_is_rejected() {
    let client = client();
    let seller = register(&client, "seller").await;

    let resp = client
        .post(format!("{}/api/products/bulk", base_url()))
        .bearer_auth(&seller)
        .json(&json!({
            "products": [
                { "name": "only a name" },
                { "description": "only a description" }
            ]
        }))
        .send()
        .await
        .expect("bulk import request");
    assert_eq!(resp.status(), 400);
}
