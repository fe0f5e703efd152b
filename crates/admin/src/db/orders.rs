//! Order management queries.

use serde::Deserialize;
use sqlx::PgPool;
use tracing::instrument;

use frameshop_core::{Order, OrderId, OrderItem, OrderStatus, PaymentStatus};

use super::{Pagination, RepositoryError};

const ORDER_COLUMNS: &str = r"
    id, order_number, user_id, customer_name, email, phone, address,
    city, state, pincode, payment_method, payment_status, status,
    subtotal, shipping, cod_fee, discount, total, razorpay_order_id,
    razorpay_payment_id, created_at, updated_at
";

/// Listing filters, taken from the query string.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
}

/// Repository for `shop.order` and `shop.order_item`.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List orders, newest first, with the total matching count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        filter: OrderFilter,
        page: Pagination,
    ) -> Result<(Vec<Order>, i64), RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM shop.order
            WHERE ($1::shop.order_status IS NULL OR status = $1)
              AND ($2::shop.payment_status IS NULL OR payment_status = $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "
        ))
        .bind(filter.status)
        .bind(filter.payment_status)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*)
            FROM shop.order
            WHERE ($1::shop.order_status IS NULL OR status = $1)
              AND ($2::shop.payment_status IS NULL OR payment_status = $2)
            ",
        )
        .bind(filter.status)
        .bind(filter.payment_status)
        .fetch_one(self.pool)
        .await?;

        Ok((orders, total))
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.order WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(order)
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

    /// Set an order's fulfilment status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        sqlx::query_as::<_, Order>(&format!(
            "UPDATE shop.order SET status = $2 WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_from_query_string() {
        let filter: OrderFilter = serde_json::from_value(serde_json::json!({
            "status": "shipped",
            "payment_status": "paid",
        }))
        .expect("deserialize");
        assert_eq!(filter.status, Some(OrderStatus::Shipped));
        assert_eq!(filter.payment_status, Some(PaymentStatus::Paid));

        let empty: OrderFilter = serde_json::from_value(serde_json::json!({})).expect("empty");
        assert!(empty.status.is_none());
        assert!(empty.payment_status.is_none());
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let result = serde_json::from_value::<OrderFilter>(serde_json::json!({
            "status": "lost",
        }));
        assert!(result.is_err());
    }
}
