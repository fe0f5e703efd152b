//! Session cart, wishlist and recently viewed tests.
//!
//! Requires a running storefront with at least one product in the catalog.

use reqwest::StatusCode;
use serde_json::json;

use frameshop_integration_tests::{first_product, json_body, session_client, storefront_url};

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_new_session_has_empty_cart() {
    let client = session_client();

    let response = client
        .get(format!("{}/api/cart/count", storefront_url()))
        .send()
        .await
        .expect("cart count");
    let (status, body) = json_body(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_decrementing_last_unit_removes_line() {
    let client = session_client();
    let base = storefront_url();
    let product = first_product(&client).await;

    let response = client
        .post(format!("{base}/api/cart/items"))
        .json(&json!({ "product_id": product["id"], "quantity": 1 }))
        .send()
        .await
        .expect("add to cart");
    let (status, cart) = json_body(response).await;
    assert_eq!(status, StatusCode::OK);
    let line_id = cart["items"][0]["line_id"]
        .as_str()
        .expect("line id")
        .to_string();

    let response = client
        .post(format!("{base}/api/cart/items/{line_id}/decrement"))
        .send()
        .await
        .expect("decrement");
    let (status, cart) = json_body(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["items"], json!([]));
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_adding_same_line_twice_merges_quantity() {
    let client = session_client();
    let base = storefront_url();
    let product = first_product(&client).await;

    for _ in 0..2 {
        client
            .post(format!("{base}/api/cart/items"))
            .json(&json!({ "product_id": product["id"], "quantity": 2 }))
            .send()
            .await
            .expect("add to cart");
    }

    let response = client
        .get(format!("{base}/api/cart"))
        .send()
        .await
        .expect("get cart");
    let (_, cart) = json_body(response).await;

    assert_eq!(cart["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(cart["items"][0]["quantity"], 4);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_unknown_cart_line_is_not_found() {
    let client = session_client();

    let response = client
        .delete(format!("{}/api/cart/items/p999999-f0-s0", storefront_url()))
        .send()
        .await
        .expect("remove line");
    let (status, _) = json_body(response).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_wishlist_holds_a_product_once() {
    let client = session_client();
    let base = storefront_url();
    let product = first_product(&client).await;

    for _ in 0..2 {
        client
            .post(format!("{base}/api/wishlist"))
            .json(&json!({ "product_id": product["id"] }))
            .send()
            .await
            .expect("add to wishlist");
    }

    let response = client
        .get(format!("{base}/api/wishlist"))
        .send()
        .await
        .expect("get wishlist");
    let (_, wishlist) = json_body(response).await;

    assert_eq!(wishlist["count"], 1);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_wishlist_toggle_removes_present_product() {
    let client = session_client();
    let base = storefront_url();
    let product = first_product(&client).await;
    let toggle = || {
        client
            .post(format!("{base}/api/wishlist/toggle"))
            .json(&json!({ "product_id": product["id"] }))
            .send()
    };

    let (_, first) = json_body(toggle().await.expect("toggle on")).await;
    let (_, second) = json_body(toggle().await.expect("toggle off")).await;

    assert_eq!(first["wishlisted"], true);
    assert_eq!(second["wishlisted"], false);
    assert_eq!(second["wishlist"]["count"], 0);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_viewing_product_records_recently_viewed() {
    let client = session_client();
    let base = storefront_url();
    let product = first_product(&client).await;
    let slug = product["slug"].as_str().expect("slug");

    client
        .get(format!("{base}/api/products/{slug}"))
        .send()
        .await
        .expect("product detail");

    let response = client
        .get(format!("{base}/api/recently-viewed"))
        .send()
        .await
        .expect("recently viewed");
    let (_, body) = json_body(response).await;

    assert_eq!(body["products"][0]["slug"], slug);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_malformed_cart_line_is_bad_request() {
    let client = session_client();

    let response = client
        .delete(format!("{}/api/cart/items/not-a-line", storefront_url()))
        .send()
        .await
        .expect("remove line");
    let (status, _) = json_body(response).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
