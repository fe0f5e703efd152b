//! Payment signature verification.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use super::PaymentError;

type HmacSha256 = Hmac<Sha256>;

/// Verify the signature the checkout widget returns after a payment.
///
/// Razorpay signs `"{order_id}|{payment_id}"` with HMAC-SHA256 keyed by the
/// API key secret and sends the digest as lowercase hex. The comparison is
/// constant time.
///
/// # Errors
///
/// Returns [`PaymentError::SignatureMismatch`] if the signature is not valid
/// hex or does not match.
pub fn verify_payment_signature(
    key_secret: &SecretString,
    razorpay_order_id: &str,
    razorpay_payment_id: &str,
    signature: &str,
) -> Result<(), PaymentError> {
    let provided = hex::decode(signature.trim()).map_err(|_| PaymentError::SignatureMismatch)?;

    let mut mac = HmacSha256::new_from_slice(key_secret.expose_secret().as_bytes())
        .map_err(|_| PaymentError::SignatureMismatch)?;
    mac.update(razorpay_order_id.as_bytes());
    mac.update(b"|");
    mac.update(razorpay_payment_id.as_bytes());

    mac.verify_slice(&provided)
        .map_err(|_| PaymentError::SignatureMismatch)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sign(secret: &str, order_id: &str, payment_id: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{order_id}|{payment_id}").as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    fn secret() -> SecretString {
        SecretString::from("wX9qL2vB7nR4tY8uK3mP")
    }

    #[test]
    fn test_valid_signature() {
        let sig = sign("wX9qL2vB7nR4tY8uK3mP", "order_A1", "pay_B2");
        assert!(verify_payment_signature(&secret(), "order_A1", "pay_B2", &sig).is_ok());
    }

    #[test]
    fn test_uppercase_hex_is_accepted() {
        let sig = sign("wX9qL2vB7nR4tY8uK3mP", "order_A1", "pay_B2").to_uppercase();
        assert!(verify_payment_signature(&secret(), "order_A1", "pay_B2", &sig).is_ok());
    }

    #[test]
    fn test_signature_for_other_payment_is_rejected() {
        let sig = sign("wX9qL2vB7nR4tY8uK3mP", "order_A1", "pay_OTHER");
        assert!(matches!(
            verify_payment_signature(&secret(), "order_A1", "pay_B2", &sig),
            Err(PaymentError::SignatureMismatch)
        ));
    }

    #[test]
    fn test_signature_with_wrong_secret_is_rejected() {
        let sig = sign("not-the-key", "order_A1", "pay_B2");
        assert!(verify_payment_signature(&secret(), "order_A1", "pay_B2", &sig).is_err());
    }

    #[test]
    fn test_garbage_signature_is_rejected() {
        for sig in ["", "zz", "deadbeef", "not hex at all"] {
            assert!(
                verify_payment_signature(&secret(), "order_A1", "pay_B2", sig).is_err(),
                "{sig}"
            );
        }
    }
}
