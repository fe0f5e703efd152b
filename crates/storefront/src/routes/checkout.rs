//! Checkout route handlers: quote, order placement and payment verification.
//!
//! # Flow
//!
//! 1. `POST /api/orders` validates the customer details against the session
//!    cart and writes the order. Online orders also get a Razorpay order,
//!    whose ID and the public key ID are returned for the browser widget.
//! 2. Cash-on-delivery orders clear the cart immediately.
//! 3. `POST /api/payments/verify` checks the widget's signature, marks the
//!    order paid and clears the cart.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use frameshop_core::{
    Cart, CheckoutQuote, CustomerDetails, Money, NewOrder, OrderId, OrderStatus,
    PaymentMethod, PaymentStatus, telemetry,
};

use super::cart::{PaymentMethodQuery, load_cart, save_cart};
use super::{Success, ok};
use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::services::checkout::{CheckoutService, PlacedOrder, generate_order_number};
use crate::state::AppState;

/// Build the checkout router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/checkout/quote", get(quote))
        .route("/api/orders", post(place_order))
        .route("/api/payments/verify", post(verify_payment))
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub payment_method: PaymentMethod,
    pub quote: CheckoutQuote,
}

/// Price breakdown of the session cart.
pub async fn quote(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<PaymentMethodQuery>,
) -> Result<Json<Success<QuoteResponse>>> {
    let cart = load_cart(&session).await?;
    let settings = state.catalog().settings(state.pool()).await?;
    let method = query.method();

    Ok(ok(QuoteResponse {
        payment_method: method,
        quote: CheckoutQuote::compute(&cart, method, &settings),
    }))
}

// =============================================================================
// Order Placement
// =============================================================================

/// Place order request body: customer details plus payment method.
#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    #[serde(flatten)]
    pub customer: CustomerDetails,
    pub payment_method: PaymentMethod,
}

/// Gateway details the browser needs to open the Razorpay widget.
#[derive(Debug, Serialize)]
pub struct GatewayCheckout {
    pub razorpay_order_id: String,
    pub razorpay_key_id: String,
    /// Amount in paise.
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, Serialize)]
pub struct PlaceOrderResponse {
    pub order_id: OrderId,
    pub order_number: String,
    pub payment_method: PaymentMethod,
    pub total: Money,
    #[serde(flatten)]
    pub gateway: Option<GatewayCheckout>,
}

impl PlaceOrderResponse {
    fn new(placed: PlacedOrder, key_id: &str) -> Self {
        let PlacedOrder { order, gateway } = placed;
        Self {
            order_id: order.id,
            order_number: order.order_number,
            payment_method: order.payment_method,
            total: order.total,
            gateway: gateway.map(|g| GatewayCheckout {
                razorpay_order_id: g.id,
                razorpay_key_id: key_id.to_owned(),
                amount: g.amount,
                currency: g.currency,
            }),
        }
    }
}

/// Place an order from the session cart.
#[instrument(skip(state, session, user, payload))]
pub async fn place_order(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    payload: std::result::Result<Json<PlaceOrderRequest>, JsonRejection>,
) -> Result<Json<Success<PlaceOrderResponse>>> {
    let Json(body) = payload?;

    let cart = load_cart(&session).await?;
    let settings = state.catalog().settings(state.pool()).await?;

    let draft = NewOrder::build(
        generate_order_number(Utc::now()),
        user.map(|u| u.id),
        &body.customer,
        &cart,
        body.payment_method,
        &settings,
    )?;

    telemetry::breadcrumb(
        "checkout",
        "Placing order",
        &[
            ("order_number", draft.order_number.as_str()),
            ("payment_method", body.payment_method.to_string().as_str()),
        ],
    );

    let placed = CheckoutService::new(state.pool(), state.razorpay())
        .place_order(draft)
        .await?;

    // Online orders keep the cart until the payment is verified
    if placed.order.payment_method == PaymentMethod::Cod {
        save_cart(&session, &Cart::new()).await?;
    }

    Ok(ok(PlaceOrderResponse::new(placed, state.razorpay().key_id())))
}

// =============================================================================
// Payment Verification
// =============================================================================

/// Fields posted back by the Razorpay widget, plus our order ID.
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub order_id: OrderId,
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyPaymentResponse {
    pub order_id: OrderId,
    pub order_number: String,
    pub payment_status: PaymentStatus,
    pub status: OrderStatus,
}

/// Verify a gateway payment and mark the order paid.
#[instrument(skip(state, session, payload))]
pub async fn verify_payment(
    State(state): State<AppState>,
    session: Session,
    payload: std::result::Result<Json<VerifyPaymentRequest>, JsonRejection>,
) -> Result<Json<Success<VerifyPaymentResponse>>> {
    let Json(body) = payload?;

    let order = CheckoutService::new(state.pool(), state.razorpay())
        .verify_payment(
            body.order_id,
            &body.razorpay_order_id,
            &body.razorpay_payment_id,
            &body.razorpay_signature,
        )
        .await?;

    save_cart(&session, &Cart::new()).await?;

    Ok(ok(VerifyPaymentResponse {
        order_id: order.id,
        order_number: order.order_number,
        payment_status: order.payment_status,
        status: order.status,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_order_request_flattens_customer() {
        let body: PlaceOrderRequest = serde_json::from_str(
            r#"{
                "name": "Asha Rao",
                "email": "asha@example.com",
                "phone": "9876543210",
                "address": "12 MG Road",
                "city": "Bengaluru",
                "state": "Karnataka",
                "pincode": "560001",
                "payment_method": "online"
            }"#,
        )
        .expect("deserialize");

        assert_eq!(body.payment_method, PaymentMethod::Online);
        assert_eq!(body.customer.pincode, "560001");
        assert!(body.customer.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_still_deserialize() {
        let body: PlaceOrderRequest =
            serde_json::from_str(r#"{"payment_method": "cod"}"#).expect("deserialize");
        assert!(body.customer.validate().is_err());
    }

    #[test]
    fn test_cod_response_omits_gateway_fields() {
        let response = PlaceOrderResponse {
            order_id: OrderId::new(1),
            order_number: "FS-20261016-ABC123".to_string(),
            payment_method: PaymentMethod::Cod,
            total: Money::from_rupees(548),
            gateway: None,
        };
        let value = serde_json::to_value(&response).expect("serialize");
        assert!(value.get("razorpay_order_id").is_none());
        assert_eq!(value["order_number"], "FS-20261016-ABC123");
    }

    #[test]
    fn test_online_response_has_gateway_fields() {
        let response = PlaceOrderResponse {
            order_id: OrderId::new(2),
            order_number: "FS-20261016-XYZ789".to_string(),
            payment_method: PaymentMethod::Online,
            total: Money::from_rupees(1200),
            gateway: Some(GatewayCheckout {
                razorpay_order_id: "order_Q1".to_string(),
                razorpay_key_id: "rzp_test_1".to_string(),
                amount: 120_000,
                currency: "INR".to_string(),
            }),
        };
        let value = serde_json::to_value(&response).expect("serialize");
        assert_eq!(value["razorpay_order_id"], "order_Q1");
        assert_eq!(value["amount"], 120_000);
        assert_eq!(value["currency"], "INR");
    }
}
