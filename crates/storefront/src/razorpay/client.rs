//! Razorpay Orders API client.

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use frameshop_core::{CURRENCY_CODE, Money};

use super::PaymentError;
use super::types::{ApiErrorResponse, CreateOrderRequest, GatewayOrder};
use crate::config::RazorpayConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Razorpay API client.
///
/// Cheap to clone; the HTTP connection pool is shared.
#[derive(Clone)]
pub struct RazorpayClient {
    inner: Arc<RazorpayClientInner>,
}

struct RazorpayClientInner {
    client: reqwest::Client,
    api_base: String,
    key_id: String,
    key_secret: SecretString,
}

impl RazorpayClient {
    /// Create a new Razorpay client.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::Http` if the HTTP client cannot be built.
    pub fn new(config: &RazorpayConfig) -> Result<Self, PaymentError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(RazorpayClientInner {
                client,
                api_base: config.api_base.clone(),
                key_id: config.key_id.clone(),
                key_secret: config.key_secret.clone(),
            }),
        })
    }

    /// Public key ID for the browser checkout widget.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.inner.key_id
    }

    /// Key secret, for payment signature verification.
    #[must_use]
    pub fn key_secret(&self) -> &SecretString {
        &self.inner.key_secret
    }

    /// Create a gateway order for `amount`.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::InvalidAmount` if the amount is not a positive
    /// number of paise, `PaymentError::Api` if Razorpay rejects the request,
    /// or `PaymentError::Http`/`PaymentError::Parse` on transport failures.
    #[instrument(skip(self), fields(amount = %amount))]
    pub async fn create_order(
        &self,
        amount: Money,
        receipt: &str,
    ) -> Result<GatewayOrder, PaymentError> {
        let paise = amount
            .to_paise()
            .filter(|p| *p > 0)
            .ok_or_else(|| PaymentError::InvalidAmount(amount.to_string()))?;

        let request = CreateOrderRequest {
            amount: paise,
            currency: CURRENCY_CODE,
            receipt,
        };

        let response = self
            .inner
            .client
            .post(format!("{}/v1/orders", self.inner.api_base))
            .basic_auth(
                &self.inner.key_id,
                Some(self.inner.key_secret.expose_secret()),
            )
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            let order: GatewayOrder = serde_json::from_str(&body)
                .map_err(|e| PaymentError::Parse(format!("Failed to parse order: {e}")))?;
            tracing::info!(razorpay_order_id = %order.id, "Gateway order created");
            Ok(order)
        } else {
            Err(parse_error_body(status, &body))
        }
    }
}

/// Turn a non-success response into a `PaymentError::Api`.
fn parse_error_body(status: reqwest::StatusCode, body: &str) -> PaymentError {
    serde_json::from_str::<ApiErrorResponse>(body).map_or_else(
        |_| PaymentError::Api {
            code: status.as_u16().to_string(),
            description: body.chars().take(200).collect(),
        },
        |parsed| PaymentError::Api {
            code: parsed.error.code,
            description: parsed.error.description,
        },
    )
}
