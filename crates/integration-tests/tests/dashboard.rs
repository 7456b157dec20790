//! Integration tests for the dashboard and account lifecycle.
//!
//! Run with: cargo test -p mercado-integration-tests -- --ignored

use serde_json::{Value, json};

use mercado_integration_tests::{add_to_cart, base_url, checkout, client, create_product, register};

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_buyer_total_spent_matches_orders() {
    let client = client();
    let seller = register(&client, "seller").await;
    let buyer = register(&client, "buyer").await;

    let cheap = create_product(&client, &seller, 10, 2.50).await;
    let dear = create_product(&client, &seller, 10, 20.00).await;

    // Two separate orders: 2 x 2.50, then 1 x 20.00
    add_to_cart(&client, &buyer, cheap, 2).await;
    assert_eq!(checkout(&client, &buyer).await.status(), 200);
    add_to_cart(&client, &buyer, dear, 1).await;
    assert_eq!(checkout(&client, &buyer).await.status(), 200);

    let resp = client
        .get(format!("{}/api/dashboard", base_url()))
        .bearer_auth(&buyer)
        .send()
        .await
        .expect("dashboard request");
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.expect("dashboard response");
    assert_eq!(body["role"], "buyer");
    assert_eq!(body["stats"]["total_orders"], 2);
    assert_eq!(body["stats"]["total_spent"], "25.00");
    assert_eq!(body["stats"]["cart_items"], 0);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_seller_best_seller_and_revenue() {
    let client = client();
    let seller = register(&client, "seller").await;
    let buyer = register(&client, "buyer").await;

    let gourd = create_product(&client, &seller, 10, 10.00).await;
    let straw = create_product(&client, &seller, 10, 3.00).await;

    add_to_cart(&client, &buyer, gourd, 1).await;
    add_to_cart(&client, &buyer, straw, 4).await;
    assert_eq!(checkout(&client, &buyer).await.status(), 200);

    let resp = client
        .get(format!("{}/api/dashboard", base_url()))
        .bearer_auth(&seller)
        .send()
        .await
        .expect("dashboard request");
    let body: Value = resp.json().await.expect("dashboard response");

    assert_eq!(body["role"], "seller");
    assert_eq!(body["stats"]["total_products"], 2);
    assert_eq!(body["stats"]["total_sales"], 5);
    assert_eq!(body["stats"]["total_revenue"], "22.00");
    assert_eq!(body["stats"]["best_seller"]["units"], 4);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_deactivation_hides_products_and_me_reflects_it() {
    let client = client();
    let seller = register(&client, "seller").await;
    let product_id = create_product(&client, &seller, 5, 8.00).await;

    let resp = client
        .post(format!("{}/api/account/deactivate", base_url()))
        .bearer_auth(&seller)
        .json(&json!({ "password": "password1" }))
        .send()
        .await
        .expect("deactivate request");
    assert_eq!(resp.status(), 200);

    // The still-valid token keeps working, but /me reports the live flag
    let resp = client
        .get(format!("{}/api/auth/me", base_url()))
        .bearer_auth(&seller)
        .send()
        .await
        .expect("me request");
    let body: Value = resp.json().await.expect("me response");
    assert_eq!(body["user"]["active"], false);

    // The product is gone from the public catalog
    let resp = client
        .get(format!("{}/api/products?limit=100", base_url()))
        .send()
        .await
        .expect("catalog request");
    let body: Value = resp.json().await.expect("catalog response");
    let listed = body["products"]
        .as_array()
        .expect("products array")
        .iter()
        .any(|p| p["id"].as_i64() == Some(product_id));
    assert!(!listed, "deactivated seller's products must be hidden");

    // Reactivation brings the in-stock product back
    let resp = client
        .post(format!("{}/api/account/reactivate", base_url()))
        .bearer_auth(&seller)
        .send()
        .await
        .expect("reactivate request");
    assert_eq!(resp.status(), 200);

    let resp = client
        .get(format!("{}/api/products?limit=100", base_url()))
        .send()
        .await
        .expect("catalog request");
    let body: Value = resp.json().await.expect("catalog response");
    let listed = body["products"]
        .as_array()
        .expect("products array")
        .iter()
        .any(|p| p["id"].as_i64() == Some(product_id));
    assert!(listed, "reactivated seller's products must reappear");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_delete_requires_correct_password() {
    let client = client();
    let buyer = register(&client, "buyer").await;

    let resp = client
        .post(format!("{}/api/account/delete", base_url()))
        .bearer_auth(&buyer)
        .json(&json!({ "password": "wrong-password" }))
        .send()
        .await
        .expect("delete request");
    assert_eq!(resp.status(), 401);

    let resp = client
        .post(format!("{}/api/account/delete", base_url()))
        .bearer_auth(&buyer)
        .json(&json!({ "password": "password1" }))
        .send()
        .await
        .expect("delete request");
    assert_eq!(resp.status(), 200);
}
