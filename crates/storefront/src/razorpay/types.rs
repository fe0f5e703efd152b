//! Razorpay Orders API payloads.

use serde::{Deserialize, Serialize};

/// Body of `POST /v1/orders`.
#[derive(Debug, Serialize)]
pub struct CreateOrderRequest<'a> {
    /// Amount in the smallest currency unit (paise).
    pub amount: i64,
    pub currency: &'a str,
    /// Our order number, shown in the Razorpay dashboard.
    pub receipt: &'a str,
}

/// A gateway order as returned by Razorpay.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayOrder {
    /// Gateway order ID (`order_...`).
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    /// `created`, `attempted` or `paid`.
    pub status: String,
}

/// Error envelope returned by Razorpay.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

/// Error details.
#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub description: String,
}
