//! Orders: stored records and the draft built at checkout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartItem};
use crate::pricing::{CheckoutQuote, StoreSettings};
use crate::types::{
    ContactError, Email, Money, OrderId, OrderItemId, OrderStatus, PaymentMethod, PaymentStatus,
    Phone, Pincode, ProductId, UserId,
};

/// Errors that stop an order from being placed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error(transparent)]
    Contact(#[from] ContactError),
    #[error("cart is empty")]
    EmptyCart,
}

/// Contact and shipping details as submitted by the customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub pincode: String,
}

/// Customer details that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub name: String,
    pub email: Email,
    pub phone: Phone,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: Pincode,
}

impl CustomerDetails {
    /// Check every required field.
    ///
    /// Fields are checked in form order and the first failure is reported.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MissingField`] for a blank field, or
    /// [`CheckoutError::Contact`] when email, phone or pincode is malformed.
    pub fn validate(&self) -> Result<Customer, CheckoutError> {
        let name = required("name", &self.name)?;
        let email = Email::parse(required("email", &self.email)?)?;
        let phone = Phone::parse(required("phone", &self.phone)?)?;
        let address = required("address", &self.address)?;
        let city = required("city", &self.city)?;
        let state = required("state", &self.state)?;
        let pincode = Pincode::parse(required("pincode", &self.pincode)?)?;

        Ok(Customer {
            name: name.to_owned(),
            email,
            phone,
            address: address.to_owned(),
            city: city.to_owned(),
            state: state.to_owned(),
            pincode,
        })
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, CheckoutError> {
    let value = value.trim();
    if value.is_empty() {
        Err(CheckoutError::MissingField(field))
    } else {
        Ok(value)
    }
}

/// Snapshot of a cart line written alongside the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrderItem {
    pub product_id: Option<ProductId>,
    pub title: String,
    pub category: String,
    pub frame_style_name: Option<String>,
    pub size_name: Option<String>,
    pub quantity: i32,
    pub unit_price: Money,
    pub image: Option<String>,
}

impl From<&CartItem> for NewOrderItem {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: Some(item.product_id),
            title: item.title.clone(),
            category: item.category.clone(),
            frame_style_name: item.frame_style_name.clone(),
            size_name: item.size_name.clone(),
            quantity: i32::try_from(item.quantity).unwrap_or(i32::MAX),
            unit_price: item.unit_price,
            image: item.image.clone(),
        }
    }
}

/// Everything needed to insert an order and its items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrder {
    pub order_number: String,
    pub user_id: Option<UserId>,
    pub customer: Customer,
    pub payment_method: PaymentMethod,
    pub quote: CheckoutQuote,
    pub razorpay_order_id: Option<String>,
    pub items: Vec<NewOrderItem>,
}

impl NewOrder {
    /// Build an order draft from the submitted details and the session cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart has no lines, or a
    /// validation error from [`CustomerDetails::validate`].
    pub fn build(
        order_number: String,
        user_id: Option<UserId>,
        details: &CustomerDetails,
        cart: &Cart,
        payment_method: PaymentMethod,
        settings: &StoreSettings,
    ) -> Result<Self, CheckoutError> {
        let customer = details.validate()?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        Ok(Self {
            order_number,
            user_id,
            customer,
            payment_method,
            quote: CheckoutQuote::compute(cart, payment_method, settings),
            razorpay_order_id: None,
            items: cart.items().iter().map(NewOrderItem::from).collect(),
        })
    }
}

/// Format a public order number, e.g. `FS-20261016-7Q2KXM`.
#[must_use]
pub fn format_order_number(placed_at: DateTime<Utc>, suffix: &str) -> String {
    format!("FS-{}-{}", placed_at.format("%Y%m%d"), suffix.to_ascii_uppercase())
}

/// A stored order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub user_id: Option<UserId>,
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub status: OrderStatus,
    pub subtotal: Money,
    pub shipping: Money,
    pub cod_fee: Money,
    pub discount: Money,
    pub total: Money,
    pub razorpay_order_id: Option<String>,
    pub razorpay_payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: Option<ProductId>,
    pub title: String,
    pub category: String,
    pub frame_style_name: Option<String>,
    pub size_name: Option<String>,
    pub quantity: i32,
    pub unit_price: Money,
    pub image: Option<String>,
}

impl OrderItem {
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price * u32::try_from(self.quantity).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::tests::item;

    fn details() -> CustomerDetails {
        CustomerDetails {
            name: "Asha Rao".to_string(),
            email: "asha@example.in".to_string(),
            phone: "+91 98765 43210".to_string(),
            address: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            pincode: "560001".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_complete_details() {
        let customer = details().validate().expect("valid");
        assert_eq!(customer.phone.as_str(), "9876543210");
        assert_eq!(customer.name, "Asha Rao");
    }

    #[test]
    fn test_validate_reports_first_missing_field() {
        let mut d = details();
        d.city = "   ".to_string();
        d.pincode = String::new();
        assert_eq!(d.validate(), Err(CheckoutError::MissingField("city")));
    }

    #[test]
    fn test_validate_rejects_bad_contact() {
        let mut d = details();
        d.phone = "12345".to_string();
        assert_eq!(
            d.validate(),
            Err(CheckoutError::Contact(ContactError::InvalidPhone))
        );

        let mut d = details();
        d.email = "asha".to_string();
        assert_eq!(
            d.validate(),
            Err(CheckoutError::Contact(ContactError::InvalidEmail))
        );
    }

    #[test]
    fn test_build_requires_items() {
        let result = NewOrder::build(
            "FS-1".to_string(),
            None,
            &details(),
            &Cart::new(),
            PaymentMethod::Cod,
            &StoreSettings::default(),
        );
        assert_eq!(result, Err(CheckoutError::EmptyCart));
    }

    #[test]
    fn test_build_snapshots_lines_and_totals() {
        let mut cart = Cart::new();
        cart.add(item(1, "frames", 450, 2)).expect("add");
        cart.add(item(2, "posters", 150, 1)).expect("add");

        let order = NewOrder::build(
            "FS-1".to_string(),
            Some(UserId::new(4)),
            &details(),
            &cart,
            PaymentMethod::Cod,
            &StoreSettings::default(),
        )
        .expect("order");

        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items.first().map(|i| i.quantity), Some(2));
        assert_eq!(order.quote.subtotal, Money::from_rupees(1050));
        assert_eq!(order.quote.shipping, Money::ZERO);
        assert_eq!(order.quote.total, Money::from_rupees(1099));
    }

    #[test]
    fn test_format_order_number() {
        let placed = DateTime::parse_from_rfc3339("2026-10-16T08:30:00Z")
            .expect("timestamp")
            .with_timezone(&Utc);
        assert_eq!(format_order_number(placed, "ab12cd"), "FS-20261016-AB12CD");
    }
}
