//! Order persistence.
//!
//! An order and its line snapshots are written in one transaction, so a
//! failed item insert never leaves an order without items.

use sqlx::PgPool;
use tracing::instrument;

use frameshop_core::{NewOrder, Order, OrderId, OrderItem, UserId};

use super::{RepositoryError, conflict_on_unique};

const ORDER_COLUMNS: &str = r"
    id, order_number, user_id, customer_name, email, phone, address,
    city, state, pincode, payment_method, payment_status, status,
    subtotal, shipping, cod_fee, discount, total, razorpay_order_id,
    razorpay_payment_id, created_at, updated_at
";

/// Repository for `shop.order` and `shop.order_item`.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an order with all of its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the order number is already taken.
    /// Returns `RepositoryError::Database` for other database errors; nothing is
    /// written in that case.
    #[instrument(skip(self, order), fields(order_number = %order.order_number))]
    pub async fn create(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let customer = &order.customer;
        let quote = &order.quote;
        let created = sqlx::query_as::<_, Order>(&format!(
            r"
            INSERT INTO shop.order (
                order_number, user_id, customer_name, email, phone, address, city,
                state, pincode, payment_method, subtotal, shipping, cod_fee, discount,
                total, razorpay_order_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(&order.order_number)
        .bind(order.user_id)
        .bind(&customer.name)
        .bind(customer.email.as_str())
        .bind(customer.phone.as_str())
        .bind(&customer.address)
        .bind(&customer.city)
        .bind(&customer.state)
        .bind(customer.pincode.as_str())
        .bind(order.payment_method)
        .bind(quote.subtotal)
        .bind(quote.shipping)
        .bind(quote.cod_fee)
        .bind(quote.discount)
        .bind(quote.total)
        .bind(order.razorpay_order_id.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(conflict_on_unique("order number already exists"))?;

        for item in &order.items {
            sqlx::query(
                r"
                INSERT INTO shop.order_item (
                    order_id, product_id, title, category, frame_style_name, size_name,
                    quantity, unit_price, image
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ",
            )
            .bind(created.id)
            .bind(item.product_id)
            .bind(&item.title)
            .bind(&item.category)
            .bind(item.frame_style_name.as_deref())
            .bind(item.size_name.as_deref())
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.image.as_deref())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(created)
    }

    /// Items of an order, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItem>(
            r"
            SELECT id, order_id, product_id, title, category, frame_style_name,
                   size_name, quantity, unit_price, image
            FROM shop.order_item
            WHERE order_id = $1
            ORDER BY id
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Record a verified gateway payment.
    ///
    /// Only the order whose ID *and* gateway order ID both match is updated:
    /// payment status becomes `paid`, status becomes `confirmed`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no order matches both IDs.
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn mark_paid(
        &self,
        id: OrderId,
        razorpay_order_id: &str,
        razorpay_payment_id: &str,
    ) -> Result<Order, RepositoryError> {
        let paid = sqlx::query_as::<_, Order>(&format!(
            r"
            UPDATE shop.order
            SET payment_status = 'paid',
                status = 'confirmed',
                razorpay_payment_id = $3
            WHERE id = $1 AND razorpay_order_id = $2
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(razorpay_order_id)
        .bind(razorpay_payment_id)
        .fetch_optional(self.pool)
        .await?;

        paid.ok_or(RepositoryError::NotFound)
    }

    /// A customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM shop.order
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// Get one of a customer's orders. Orders of other customers are not found.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_user(
        &self,
        id: OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM shop.order
            WHERE id = $1 AND user_id = $2
            "
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use frameshop_core::{Money, OrderStatus, PaymentMethod, PaymentStatus};

    use super::*;

    #[test]
    fn test_order_columns_cover_every_field() {
        let order = Order {
            id: OrderId::new(1),
            order_number: "FS-20261016-AB12CD".to_string(),
            user_id: None,
            customer_name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            address: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            pincode: "560001".to_string(),
            payment_method: PaymentMethod::Online,
            payment_status: PaymentStatus::Pending,
            status: OrderStatus::Pending,
            subtotal: Money::ZERO,
            shipping: Money::ZERO,
            cod_fee: Money::ZERO,
            discount: Money::ZERO,
            total: Money::ZERO,
            razorpay_order_id: None,
            razorpay_payment_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&order).expect("serialize");
        let mut fields: Vec<&str> = value
            .as_object()
            .expect("object")
            .keys()
            .map(String::as_str)
            .collect();
        let mut columns: Vec<&str> = ORDER_COLUMNS.split(',').map(str::trim).collect();

        fields.sort_unstable();
        columns.sort_unstable();
        assert_eq!(columns, fields);
    }
}
