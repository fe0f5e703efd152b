//! Customer account tests.

use reqwest::StatusCode;
use serde_json::json;

use frameshop_integration_tests::{json_body, session_client, storefront_url, unique_email};

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_register_me_logout() {
    let client = session_client();
    let base = storefront_url();
    let email = unique_email();

    let response = client
        .post(format!("{base}/api/auth/register"))
        .json(&json!({ "email": email, "password": "a-long-password" }))
        .send()
        .await
        .expect("register");
    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], email.as_str());

    let response = client
        .get(format!("{base}/api/auth/me"))
        .send()
        .await
        .expect("me");
    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], email.as_str());

    client
        .post(format!("{base}/api/auth/logout"))
        .send()
        .await
        .expect("logout");

    let response = client
        .get(format!("{base}/api/auth/me"))
        .send()
        .await
        .expect("me after logout");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_duplicate_registration_conflicts() {
    let base = storefront_url();
    let email = unique_email();
    let body = json!({ "email": email, "password": "a-long-password" });

    let first = session_client()
        .post(format!("{base}/api/auth/register"))
        .json(&body)
        .send()
        .await
        .expect("register");
    assert_eq!(first.status(), StatusCode::OK);

    let second = session_client()
        .post(format!("{base}/api/auth/register"))
        .json(&body)
        .send()
        .await
        .expect("register again");
    let (status, _) = json_body(second).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_short_password_is_rejected() {
    let response = session_client()
        .post(format!("{}/api/auth/register", storefront_url()))
        .json(&json!({ "email": unique_email(), "password": "short" }))
        .send()
        .await
        .expect("register");
    let (status, _) = json_body(response).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_order_history_requires_login() {
    let response = session_client()
        .get(format!("{}/api/account/orders", storefront_url()))
        .send()
        .await
        .expect("orders");
    let (status, body) = json_body(response).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Not logged in");
}
