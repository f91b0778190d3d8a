//! Order route handlers.
//!
//! Read-only: orders are written by the webhook and never mutated here.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::db::OrderRepository;
use crate::error::Result;
use crate::middleware::{RequireAdmin, RequireUser};
use crate::models::Order;
use crate::state::AppState;

/// `GET /api/orders` - every order, newest first (admin only).
#[instrument(skip(state, admin), fields(admin_id = %admin.0.id))]
pub async fn list_all(
    admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool()).list_all().await?;

    Ok(Json(orders))
}

/// `GET /api/orders/me` - the caller's orders, newest first.
#[instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn mine(user: RequireUser, State(state): State<AppState>) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.0.id)
        .await?;

    Ok(Json(orders))
}
