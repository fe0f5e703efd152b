//! Shared helpers for the Frameshop HTTP integration tests.
//!
//! # Running Tests
//!
//! The tests talk to running servers and a migrated database, so they are
//! `#[ignore]`d by default.
//!
//! ```bash
//! cargo run -p frameshop-cli -- migrate
//! cargo run -p frameshop-cli -- settings seed
//! cargo run -p frameshop-storefront &
//! cargo run -p frameshop-admin &
//! cargo test -p frameshop-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_TEST_URL` - storefront base URL (default `http://localhost:3000`)
//! - `ADMIN_TEST_URL` - admin base URL (default `http://localhost:3001`)
//! - `ADMIN_TEST_EMAIL` / `ADMIN_TEST_PASSWORD` - an account holding the admin role
//! - `RAZORPAY_KEY_SECRET` - the storefront's key secret, to sign payment callbacks

use hmac::{Hmac, Mac};
use reqwest::{Client, Response, StatusCode};
use sha2::Sha256;
use serde_json::{Value, json};

/// Storefront base URL.
#[must_use]
pub fn storefront_url() -> String {
    std::env::var("STOREFRONT_TEST_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Admin base URL.
#[must_use]
pub fn admin_url() -> String {
    std::env::var("ADMIN_TEST_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// A client with its own cookie jar, so each test gets a fresh session.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
pub fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// An email address no other test run has used.
#[must_use]
pub fn unique_email() -> String {
    format!("it-{}@example.com", uuid::Uuid::new_v4().simple())
}

/// Read a JSON body and check the `success` flag matches the status.
///
/// # Panics
///
/// Panics if the body is not JSON or the flag disagrees with the status.
pub async fn json_body(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let body: Value = response.json().await.expect("JSON body");
    assert_eq!(
        body["success"],
        json!(status.is_success()),
        "success flag disagrees with status {status}: {body}"
    );
    (status, body)
}

/// Log `client` into the admin API with the configured test admin.
///
/// # Panics
///
/// Panics if the credentials are not set or login fails.
pub async fn admin_login(client: &Client) {
    let email = std::env::var("ADMIN_TEST_EMAIL").expect("ADMIN_TEST_EMAIL not set");
    let password = std::env::var("ADMIN_TEST_PASSWORD").expect("ADMIN_TEST_PASSWORD not set");

    let response = client
        .post(format!("{}/api/auth/login", admin_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("login request");
    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::OK, "admin login failed: {body}");
}

/// The first product in the storefront catalog.
///
/// # Panics
///
/// Panics if the catalog is empty.
pub async fn first_product(client: &Client) -> Value {
    let response = client
        .get(format!("{}/api/products?per_page=1", storefront_url()))
        .send()
        .await
        .expect("list products");
    let (_, body) = json_body(response).await;
    body["products"][0].clone()
}

/// Valid checkout details for a test customer.
#[must_use]
pub fn customer_details(payment_method: &str) -> Value {
    json!({
        "name": "Integration Tester",
        "email": unique_email(),
        "phone": "9876543210",
        "address": "12 MG Road",
        "city": "Bengaluru",
        "state": "Karnataka",
        "pincode": "560001",
        "payment_method": payment_method,
    })
}

/// Register a fresh customer on `client`'s session, so later orders are
/// linked to the account and readable under `/api/account/orders`.
///
/// # Panics
///
/// Panics if registration fails.
pub async fn register_customer(client: &Client) -> String {
    let email = unique_email();
    let response = client
        .post(format!("{}/api/auth/register", storefront_url()))
        .json(&json!({ "email": email, "password": "a-long-password" }))
        .send()
        .await
        .expect("register");
    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::OK, "registration failed: {body}");
    email
}

/// The callback signature Razorpay sends: hex HMAC-SHA256 of
/// `"{order_id}|{payment_id}"` under the key secret.
///
/// # Panics
///
/// Panics if `RAZORPAY_KEY_SECRET` is not set.
#[must_use]
pub fn sign_payment(razorpay_order_id: &str, razorpay_payment_id: &str) -> String {
    let secret = std::env::var("RAZORPAY_KEY_SECRET").expect("RAZORPAY_KEY_SECRET not set");
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("any key length");
    mac.update(format!("{razorpay_order_id}|{razorpay_payment_id}").as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
