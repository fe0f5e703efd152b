//! Store settings and checkout arithmetic.
//!
//! Settings live in the `settings` table as key/value text. Missing or
//! unparseable values fall back to the defaults below, so a fresh database
//! still produces sensible quotes.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::types::{Money, PaymentMethod};

/// Known setting keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKey {
    ShippingCost,
    FreeShippingThreshold,
    CodCharge,
    BulkDiscountAmount,
    BulkDiscountMinFrames,
}

impl SettingKey {
    pub const ALL: [Self; 5] = [
        Self::ShippingCost,
        Self::FreeShippingThreshold,
        Self::CodCharge,
        Self::BulkDiscountAmount,
        Self::BulkDiscountMinFrames,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ShippingCost => "shipping_cost",
            Self::FreeShippingThreshold => "free_shipping_threshold",
            Self::CodCharge => "cod_charge",
            Self::BulkDiscountAmount => "bulk_discount_amount",
            Self::BulkDiscountMinFrames => "bulk_discount_min_frames",
        }
    }

    /// Default value as stored text.
    #[must_use]
    pub fn default_value(&self) -> String {
        let defaults = StoreSettings::default();
        match self {
            Self::ShippingCost => defaults.shipping_cost.amount().to_string(),
            Self::FreeShippingThreshold => defaults.free_shipping_threshold.amount().to_string(),
            Self::CodCharge => defaults.cod_charge.amount().to_string(),
            Self::BulkDiscountAmount => defaults.bulk_discount_amount.amount().to_string(),
            Self::BulkDiscountMinFrames => defaults.bulk_discount_min_frames.to_string(),
        }
    }

    /// Check and normalize a value before it is stored.
    ///
    /// Amounts must be non-negative decimals; the frame threshold must be a
    /// positive integer.
    ///
    /// # Errors
    ///
    /// Returns [`SettingError::InvalidValue`] describing the problem.
    pub fn normalize(&self, raw: &str) -> Result<String, SettingError> {
        let raw = raw.trim();
        let invalid = |reason: &str| SettingError::InvalidValue {
            key: *self,
            reason: reason.to_owned(),
        };

        if *self == Self::BulkDiscountMinFrames {
            let n: u32 = raw.parse().map_err(|_| invalid("must be a whole number"))?;
            if n == 0 {
                return Err(invalid("must be at least 1"));
            }
            return Ok(n.to_string());
        }

        let amount: Decimal = raw.parse().map_err(|_| invalid("must be a number"))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(invalid("must not be negative"));
        }
        Ok(Money::new(amount).amount().to_string())
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = SettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| SettingError::UnknownKey(s.to_owned()))
    }
}

/// Errors from settings validation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingError {
    #[error("unknown setting: {0}")]
    UnknownKey(String),
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: SettingKey, reason: String },
}

/// Effective store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    pub shipping_cost: Money,
    pub free_shipping_threshold: Money,
    pub cod_charge: Money,
    pub bulk_discount_amount: Money,
    pub bulk_discount_min_frames: u32,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            shipping_cost: Money::from_rupees(99),
            free_shipping_threshold: Money::from_rupees(999),
            cod_charge: Money::from_rupees(49),
            bulk_discount_amount: Money::from_rupees(200),
            bulk_discount_min_frames: 5,
        }
    }
}

impl StoreSettings {
    /// Build settings from stored key/value rows.
    ///
    /// Unknown keys are ignored. Values that fail [`SettingKey::normalize`]
    /// keep the default.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut settings = Self::default();
        for (key, value) in pairs {
            let Ok(key) = key.as_ref().parse::<SettingKey>() else {
                continue;
            };
            let Ok(value) = key.normalize(value.as_ref()) else {
                continue;
            };
            settings.apply(key, &value);
        }
        settings
    }

    fn apply(&mut self, key: SettingKey, value: &str) {
        if key == SettingKey::BulkDiscountMinFrames {
            if let Ok(n) = value.parse() {
                self.bulk_discount_min_frames = n;
            }
            return;
        }

        let Ok(amount) = value.parse::<Money>() else {
            return;
        };
        match key {
            SettingKey::ShippingCost => self.shipping_cost = amount,
            SettingKey::FreeShippingThreshold => self.free_shipping_threshold = amount,
            SettingKey::CodCharge => self.cod_charge = amount,
            SettingKey::BulkDiscountAmount => self.bulk_discount_amount = amount,
            SettingKey::BulkDiscountMinFrames => {}
        }
    }
}

/// Price breakdown shown at checkout and stored on the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutQuote {
    pub subtotal: Money,
    pub shipping: Money,
    pub cod_fee: Money,
    pub discount: Money,
    pub total: Money,
    pub item_count: u32,
    pub frame_count: u32,
    /// Amount still needed to reach free shipping (zero once reached).
    pub free_shipping_remaining: Money,
}

impl CheckoutQuote {
    /// Quote a cart.
    ///
    /// - shipping is waived once the subtotal reaches the threshold
    /// - cash on delivery adds the COD charge
    /// - enough frame units earn the flat bulk discount
    ///
    /// The total never goes below zero. An empty cart quotes zero across the
    /// board.
    #[must_use]
    pub fn compute(cart: &Cart, method: PaymentMethod, settings: &StoreSettings) -> Self {
        if cart.is_empty() {
            return Self::empty(settings);
        }

        let subtotal = cart.subtotal();
        let item_count = cart.item_count();
        let frame_count = cart.frame_count();

        let shipping = if subtotal >= settings.free_shipping_threshold {
            Money::ZERO
        } else {
            settings.shipping_cost
        };
        let cod_fee = match method {
            PaymentMethod::Cod => settings.cod_charge,
            PaymentMethod::Online => Money::ZERO,
        };
        let discount = if frame_count >= settings.bulk_discount_min_frames {
            settings.bulk_discount_amount
        } else {
            Money::ZERO
        };

        Self {
            subtotal,
            shipping,
            cod_fee,
            discount,
            total: (subtotal + shipping + cod_fee).saturating_sub(discount),
            item_count,
            frame_count,
            free_shipping_remaining: settings.free_shipping_threshold.saturating_sub(subtotal),
        }
    }

    fn empty(settings: &StoreSettings) -> Self {
        Self {
            subtotal: Money::ZERO,
            shipping: Money::ZERO,
            cod_fee: Money::ZERO,
            discount: Money::ZERO,
            total: Money::ZERO,
            item_count: 0,
            frame_count: 0,
            free_shipping_remaining: settings.free_shipping_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::tests::item;

    fn cart_of(items: Vec<crate::cart::CartItem>) -> Cart {
        let mut cart = Cart::new();
        for i in items {
            cart.add(i).expect("add");
        }
        cart
    }

    #[test]
    fn test_shipping_below_threshold() {
        let settings = StoreSettings::default();
        let quote = CheckoutQuote::compute(
            &cart_of(vec![item(1, "posters", 500, 1)]),
            PaymentMethod::Online,
            &settings,
        );
        assert_eq!(quote.shipping, Money::from_rupees(99));
        assert_eq!(quote.total, Money::from_rupees(599));
        assert_eq!(quote.free_shipping_remaining, Money::from_rupees(499));
    }

    #[test]
    fn test_free_shipping_at_threshold() {
        let settings = StoreSettings::default();
        let quote = CheckoutQuote::compute(
            &cart_of(vec![item(1, "posters", 999, 1)]),
            PaymentMethod::Online,
            &settings,
        );
        assert_eq!(quote.shipping, Money::ZERO);
        assert_eq!(quote.total, Money::from_rupees(999));
        assert_eq!(quote.free_shipping_remaining, Money::ZERO);
    }

    #[test]
    fn test_cod_adds_surcharge() {
        let settings = StoreSettings::default();
        let cart = cart_of(vec![item(1, "posters", 1200, 1)]);
        let cod = CheckoutQuote::compute(&cart, PaymentMethod::Cod, &settings);
        let online = CheckoutQuote::compute(&cart, PaymentMethod::Online, &settings);
        assert_eq!(cod.cod_fee, Money::from_rupees(49));
        assert_eq!(online.cod_fee, Money::ZERO);
        assert_eq!(cod.total, online.total + Money::from_rupees(49));
    }

    #[test]
    fn test_bulk_frame_discount() {
        let settings = StoreSettings::default();
        let four = cart_of(vec![item(1, "frames", 300, 4), item(2, "posters", 300, 3)]);
        let five = cart_of(vec![item(1, "frames", 300, 3), item(2, "Frames", 300, 2)]);

        let quote = CheckoutQuote::compute(&four, PaymentMethod::Online, &settings);
        assert_eq!(quote.discount, Money::ZERO);

        let quote = CheckoutQuote::compute(&five, PaymentMethod::Online, &settings);
        assert_eq!(quote.frame_count, 5);
        assert_eq!(quote.discount, Money::from_rupees(200));
        assert_eq!(quote.total, Money::from_rupees(1300));
    }

    #[test]
    fn test_total_never_negative() {
        let settings = StoreSettings {
            bulk_discount_amount: Money::from_rupees(10_000),
            bulk_discount_min_frames: 1,
            ..StoreSettings::default()
        };
        let quote = CheckoutQuote::compute(
            &cart_of(vec![item(1, "frames", 10, 1)]),
            PaymentMethod::Online,
            &settings,
        );
        assert_eq!(quote.total, Money::ZERO);
    }

    #[test]
    fn test_empty_cart_quotes_zero() {
        let quote =
            CheckoutQuote::compute(&Cart::new(), PaymentMethod::Cod, &StoreSettings::default());
        assert_eq!(quote.total, Money::ZERO);
        assert_eq!(quote.shipping, Money::ZERO);
        assert_eq!(quote.cod_fee, Money::ZERO);
    }

    #[test]
    fn test_from_pairs_overrides_and_falls_back() {
        let settings = StoreSettings::from_pairs([
            ("shipping_cost", "60"),
            ("cod_charge", "-5"),
            ("bulk_discount_min_frames", "3"),
            ("theme", "dark"),
        ]);
        assert_eq!(settings.shipping_cost, Money::from_rupees(60));
        assert_eq!(settings.cod_charge, Money::from_rupees(49));
        assert_eq!(settings.bulk_discount_min_frames, 3);
        assert_eq!(settings.free_shipping_threshold, Money::from_rupees(999));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(SettingKey::CodCharge.normalize(" 49.999 "), Ok("50.00".to_owned()));
        assert!(SettingKey::CodCharge.normalize("abc").is_err());
        assert!(SettingKey::ShippingCost.normalize("-1").is_err());
        assert!(SettingKey::BulkDiscountMinFrames.normalize("0").is_err());
        assert!(SettingKey::BulkDiscountMinFrames.normalize("2.5").is_err());
        assert_eq!(SettingKey::ShippingCost.normalize("0"), Ok("0.00".to_owned()));
    }

    #[test]
    fn test_setting_key_parse() {
        assert_eq!("cod_charge".parse(), Ok(SettingKey::CodCharge));
        assert_eq!(
            "colour".parse::<SettingKey>(),
            Err(SettingError::UnknownKey("colour".to_owned()))
        );
    }

    #[test]
    fn test_default_values_parse_back() {
        let pairs: Vec<(&str, String)> = SettingKey::ALL
            .iter()
            .map(|key| (key.as_str(), key.default_value()))
            .collect();
        assert_eq!(StoreSettings::from_pairs(pairs), StoreSettings::default());
    }
}
