//! Customer account route handlers: order history.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::Serialize;

use frameshop_core::{Order, OrderId, OrderItem};

use super::{Success, ok};
use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Build the account router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/account/orders", get(orders))
        .route("/api/account/orders/{id}", get(order_detail))
}

#[derive(Debug, Serialize)]
pub struct OrderList {
    pub orders: Vec<Order>,
}

/// The customer's orders, newest first.
pub async fn orders(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Success<OrderList>>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;
    Ok(ok(OrderList { orders }))
}

#[derive(Debug, Serialize)]
pub struct OrderDetail {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// One of the customer's orders with its items.
///
/// Orders belonging to someone else are reported as not found.
pub async fn order_detail(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<Success<OrderDetail>>> {
    let repo = OrderRepository::new(state.pool());

    let order = repo
        .get_for_user(id, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;
    let items = repo.items(order.id).await?;

    Ok(ok(OrderDetail { order, items }))
}
