//! Order placement and payment verification.
//!
//! Placing an online order creates the gateway order first, then writes the
//! order and its items. A failed write after the gateway call leaves an
//! unused gateway order behind, which Razorpay expires on its own.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distr::Alphanumeric;
use sqlx::PgPool;
use thiserror::Error;
use tracing::instrument;

use frameshop_core::order::format_order_number;
use frameshop_core::{CheckoutError, NewOrder, Order, OrderId, PaymentMethod};

use crate::db::{OrderRepository, RepositoryError};
use crate::razorpay::{GatewayOrder, PaymentError, RazorpayClient, verify_payment_signature};

/// Length of the random part of an order number.
const ORDER_SUFFIX_LENGTH: usize = 6;

/// Errors from the checkout service.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Customer details or cart failed validation.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Payment gateway call or signature check failed.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Database operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// A freshly written order, plus its gateway order for online payments.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order: Order,
    pub gateway: Option<GatewayOrder>,
}

/// Generate a public order number such as `FS-20261016-7Q2KXM`.
#[must_use]
pub fn generate_order_number(now: DateTime<Utc>) -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(ORDER_SUFFIX_LENGTH)
        .map(char::from)
        .collect();
    format_order_number(now, &suffix)
}

/// Checkout service.
pub struct CheckoutService<'a> {
    orders: OrderRepository<'a>,
    razorpay: &'a RazorpayClient,
}

impl<'a> CheckoutService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool, razorpay: &'a RazorpayClient) -> Self {
        Self {
            orders: OrderRepository::new(pool),
            razorpay,
        }
    }

    /// Place an order.
    ///
    /// For online payment a Razorpay order for the total is created first and
    /// its ID stored on the order.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Payment` if the gateway order cannot be created and
    /// `OrderError::Repository` if the order cannot be written.
    #[instrument(skip(self, draft), fields(order_number = %draft.order_number, method = %draft.payment_method))]
    pub async fn place_order(&self, mut draft: NewOrder) -> Result<PlacedOrder, OrderError> {
        let gateway = match draft.payment_method {
            PaymentMethod::Online => {
                let gateway = self
                    .razorpay
                    .create_order(draft.quote.total, &draft.order_number)
                    .await?;
                draft.razorpay_order_id = Some(gateway.id.clone());
                Some(gateway)
            }
            PaymentMethod::Cod => None,
        };

        let order = self.orders.create(&draft).await?;

        tracing::info!(order_id = %order.id, total = %order.total, "Order placed");

        Ok(PlacedOrder { order, gateway })
    }

    /// Verify a payment and mark the order paid.
    ///
    /// The signature is checked before anything is written, so a forged
    /// callback leaves the order untouched.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Payment(SignatureMismatch)` for a bad signature and
    /// `OrderError::Repository(NotFound)` if no order matches both IDs.
    #[instrument(skip(self, signature))]
    pub async fn verify_payment(
        &self,
        order_id: OrderId,
        razorpay_order_id: &str,
        razorpay_payment_id: &str,
        signature: &str,
    ) -> Result<Order, OrderError> {
        if let Err(e) = verify_payment_signature(
            self.razorpay.key_secret(),
            razorpay_order_id,
            razorpay_payment_id,
            signature,
        ) {
            tracing::warn!(%order_id, razorpay_order_id, "Payment signature rejected");
            return Err(e.into());
        }

        let order = self
            .orders
            .mark_paid(order_id, razorpay_order_id, razorpay_payment_id)
            .await?;

        tracing::info!(%order_id, razorpay_payment_id, "Payment verified");

        Ok(order)
    }
}
