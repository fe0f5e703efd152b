//! Razorpay payment gateway.
//!
//! # Flow
//!
//! 1. The server creates a gateway order for the order total (in paise) and
//!    hands its ID plus the public key ID to the browser.
//! 2. The browser checkout widget collects the payment and returns
//!    `razorpay_order_id`, `razorpay_payment_id` and `razorpay_signature`.
//! 3. The server recomputes the signature with the key secret
//!    (see [`verify_payment_signature`]) before marking the order paid.

mod client;
mod signature;
pub mod types;

pub use client::RazorpayClient;
pub use signature::verify_payment_signature;
pub use types::GatewayOrder;

use thiserror::Error;

/// Errors that can occur when talking to Razorpay.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Razorpay returned an error response.
    #[error("API error ({code}): {description}")]
    Api {
        /// Error code, e.g. `BAD_REQUEST_ERROR`.
        code: String,
        /// Human-readable description.
        description: String,
    },

    /// Response body could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Amount cannot be expressed in paise.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Payment signature did not match.
    #[error("payment signature mismatch")]
    SignatureMismatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_error_display() {
        let err = PaymentError::Api {
            code: "BAD_REQUEST_ERROR".to_string(),
            description: "amount must be at least INR 1.00".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API error (BAD_REQUEST_ERROR): amount must be at least INR 1.00"
        );
        assert_eq!(
            PaymentError::SignatureMismatch.to_string(),
            "payment signature mismatch"
        );
    }
}
