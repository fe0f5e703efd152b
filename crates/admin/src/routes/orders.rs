//! Order management route handlers.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use frameshop_core::{Order, OrderId, OrderItem, OrderStatus};

use super::{Page, Success, ok};
use crate::db::{OrderFilter, OrderRepository, Pagination};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders", get(list))
        .route("/api/orders/{id}", get(show))
        .route("/api/orders/{id}/status", put(update_status))
}

#[derive(Debug, Serialize)]
pub struct OrderList {
    pub orders: Vec<Order>,
}

#[derive(Debug, Serialize)]
pub struct OrderDetail {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub order: Order,
}

/// List orders, newest first, optionally filtered by status.
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    filter: std::result::Result<Query<OrderFilter>, QueryRejection>,
    pagination: std::result::Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<Success<Page<OrderList>>>> {
    let Query(filter) = filter?;
    let Query(pagination) = pagination?;

    let (orders, total) = OrderRepository::new(state.pool())
        .list(filter, pagination)
        .await?;

    Ok(ok(Page {
        items: OrderList { orders },
        total,
        page: pagination.page(),
        per_page: pagination.per_page(),
    }))
}

/// One order with its items.
pub async fn show(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<Success<OrderDetail>>> {
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;
    let items = repo.items(order.id).await?;

    Ok(ok(OrderDetail { order, items }))
}

#[derive(Debug, Deserialize)]
pub struct StatusInput {
    pub status: OrderStatus,
}

/// Move an order to a new fulfilment status.
///
/// Any status may be set; payment status is owned by checkout and is not
/// touched here.
#[instrument(skip(state, payload), fields(admin_id = %admin.id))]
pub async fn update_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    payload: std::result::Result<Json<StatusInput>, JsonRejection>,
) -> Result<Json<Success<OrderResponse>>> {
    let Json(input) = payload?;

    let order = OrderRepository::new(state.pool())
        .update_status(id, input.status)
        .await?;
    tracing::info!(
        order_number = %order.order_number,
        status = order.status.as_str(),
        "Order status updated"
    );

    Ok(ok(OrderResponse { order }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_input_uses_snake_case() {
        let input: StatusInput =
            serde_json::from_value(serde_json::json!({ "status": "delivered" }))
                .expect("deserialize");
        assert_eq!(input.status, OrderStatus::Delivered);

        assert!(
            serde_json::from_value::<StatusInput>(serde_json::json!({ "status": "Delivered" }))
                .is_err()
        );
    }
}
