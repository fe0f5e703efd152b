//! Admin API tests.
//!
//! Requires a running admin server and `ADMIN_TEST_EMAIL` /
//! `ADMIN_TEST_PASSWORD` for an account holding the admin role.

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use frameshop_core::{Money, StoreSettings};
use frameshop_integration_tests::{admin_login, admin_url, json_body, session_client};

async fn logged_in() -> Client {
    let client = session_client();
    admin_login(&client).await;
    client
}

async fn create_product(client: &Client, title: &str, slug: &str) -> (StatusCode, Value) {
    let response = client
        .post(format!("{}/api/products", admin_url()))
        .json(&json!({
            "title": title,
            "slug": slug,
            "price": "1499",
            "category": "Landscapes",
        }))
        .send()
        .await
        .expect("create product");
    json_body(response).await
}

async fn delete_product(client: &Client, id: &Value) {
    let response = client
        .delete(format!("{}/api/products/{id}", admin_url()))
        .send()
        .await
        .expect("delete product");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_endpoints_require_login() {
    let client = session_client();

    for path in ["/api/products", "/api/orders", "/api/settings", "/api/roles"] {
        let response = client
            .get(format!("{}{path}", admin_url()))
            .send()
            .await
            .expect("request");
        let (status, body) = json_body(response).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{path}");
        assert_eq!(body["error"], "Not logged in");
    }
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_wrong_password_is_unauthorized() {
    let response = session_client()
        .post(format!("{}/api/auth/login", admin_url()))
        .json(&json!({ "email": "nobody@example.com", "password": "not-the-password" }))
        .send()
        .await
        .expect("login");
    let (status, _) = json_body(response).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running admin server and admin credentials"]
async fn test_me_after_login() {
    let client = logged_in().await;

    let response = client
        .get(format!("{}/api/auth/me", admin_url()))
        .send()
        .await
        .expect("me");
    let (status, body) = json_body(response).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["admin"]["email"].is_string());
}

#[tokio::test]
#[ignore = "Requires running admin server and admin credentials"]
async fn test_product_lifecycle_and_slug_conflict() {
    let client = logged_in().await;
    let base = admin_url();
    let slug = format!("it-{}", uuid::Uuid::new_v4().simple());

    let (status, body) = create_product(&client, "Monsoon Over Munnar", &slug).await;
    assert_eq!(status, StatusCode::OK);
    let product = &body["product"];
    let id = product["id"].clone();
    assert_eq!(product["slug"], slug.as_str());
    assert_eq!(product["category"], "landscapes");

    let (status, body) = create_product(&client, "Another Title", &slug).await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");

    let response = client
        .put(format!("{base}/api/products/{id}"))
        .json(&json!({
            "title": "Monsoon Over Munnar",
            "slug": slug,
            "description": "Mist rolling over tea estates.",
            "price": 1599,
            "category": "landscapes",
        }))
        .send()
        .await
        .expect("update product");
    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::OK);
    let price: Money = serde_json::from_value(body["product"]["price"].clone()).expect("price");
    assert_eq!(price, Money::from_rupees(1599));

    delete_product(&client, &id).await;

    let response = client
        .get(format!("{base}/api/products/{id}"))
        .send()
        .await
        .expect("show deleted product");
    let (status, _) = json_body(response).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running admin server and admin credentials"]
async fn test_product_validation() {
    let client = logged_in().await;

    let response = client
        .post(format!("{}/api/products", admin_url()))
        .json(&json!({ "title": "Dusk", "price": "-1", "category": "posters" }))
        .send()
        .await
        .expect("create product");
    let (status, _) = json_body(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let response = client
        .post(format!("{}/api/products", admin_url()))
        .json(&json!({ "title": "Dusk" }))
        .send()
        .await
        .expect("create product");
    let (status, _) = json_body(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running admin server and admin credentials"]
async fn test_settings_round_trip_and_validation() {
    let client = logged_in().await;
    let base = admin_url();

    let response = client
        .get(format!("{base}/api/settings"))
        .send()
        .await
        .expect("settings");
    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::OK);
    let effective: StoreSettings =
        serde_json::from_value(body["effective"].clone()).expect("effective settings");

    // Writing the current value back leaves the store unchanged
    let current = effective.bulk_discount_min_frames;
    let response = client
        .put(format!("{base}/api/settings/bulk_discount_min_frames"))
        .json(&json!({ "value": current }))
        .send()
        .await
        .expect("update setting");
    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["setting"]["value"], current.to_string());

    let response = client
        .put(format!("{base}/api/settings/bulk_discount_min_frames"))
        .json(&json!({ "value": 0 }))
        .send()
        .await
        .expect("invalid setting");
    let (status, _) = json_body(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let response = client
        .put(format!("{base}/api/settings/no_such_setting"))
        .json(&json!({ "value": "1" }))
        .send()
        .await
        .expect("unknown setting");
    let (status, _) = json_body(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running admin server and admin credentials"]
async fn test_metadata_rejects_non_http_url() {
    let client = logged_in().await;

    let response = client
        .post(format!("{}/api/products/generate-metadata", admin_url()))
        .json(&json!({ "image_url": "file:///etc/passwd" }))
        .send()
        .await
        .expect("generate metadata");
    let (status, _) = json_body(response).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running admin server, admin credentials and an Anthropic API key"]
async fn test_metadata_from_image_url() {
    let client = logged_in().await;
    let image_url = std::env::var("METADATA_TEST_IMAGE_URL")
        .unwrap_or_else(|_| "https://upload.wikimedia.org/wikipedia/commons/a/a4/Mona_Lisa.jpg".to_string());

    let response = client
        .post(format!("{}/api/products/generate-metadata", admin_url()))
        .json(&json!({ "image_url": image_url }))
        .send()
        .await
        .expect("generate metadata");
    let (status, body) = json_body(response).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["fallback"].is_boolean());
    for field in ["title", "description", "slug"] {
        assert!(
            body["data"][field].as_str().is_some_and(|s| !s.is_empty()),
            "{field} missing: {body}"
        );
    }
}

#[tokio::test]
#[ignore = "Requires running admin server and admin credentials"]
async fn test_roles_list_includes_an_admin() {
    let client = logged_in().await;

    let response = client
        .get(format!("{}/api/roles", admin_url()))
        .send()
        .await
        .expect("roles");
    let (status, body) = json_body(response).await;

    assert_eq!(status, StatusCode::OK);
    let roles = body["roles"].as_array().expect("roles array");
    assert!(roles.iter().any(|r| r["role"] == "admin"));
}

#[tokio::test]
#[ignore = "Requires running admin server and admin credentials"]
async fn test_unknown_order_is_not_found() {
    let client = logged_in().await;

    let response = client
        .get(format!("{}/api/orders/999999999", admin_url()))
        .send()
        .await
        .expect("order");
    let (status, _) = json_body(response).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
