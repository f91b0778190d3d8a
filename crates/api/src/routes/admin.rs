//! Admin console route handlers.
//!
//! Pure reads plus user deletion. The stats endpoint recomputes on every
//! request; there is deliberately no cache in front of it.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, instrument};

use copperleaf_core::UserId;

use crate::db::orders::MonthlyRevenue;
use crate::db::{OrderRepository, ProductRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::User;
use crate::state::AppState;

/// Dashboard counts and revenue.
#[derive(Debug, Serialize)]
pub struct Stats {
    pub users: i64,
    pub products: i64,
    pub orders: i64,
    pub total_revenue: Decimal,
    pub monthly_revenue: Vec<MonthlyRevenue>,
}

/// `GET /api/admin/users` - list users (admin only).
#[instrument(skip(state, admin), fields(admin_id = %admin.0.id))]
pub async fn list_users(
    admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>> {
    let users = UserRepository::new(state.pool()).list().await?;

    Ok(Json(users))
}

/// `DELETE /api/admin/users/{id}` - delete a user (admin only).
///
/// Admins cannot delete their own account; 404, not 500, for an unknown id.
#[instrument(skip(state, admin), fields(admin_id = %admin.0.id))]
pub async fn delete_user(
    admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<StatusCode> {
    if id == admin.0.id {
        return Err(AppError::BadRequest(
            "cannot delete your own account".to_owned(),
        ));
    }

    UserRepository::new(state.pool()).delete(id).await?;
    info!(deleted_user_id = %id, "user deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/admin/stats` - dashboard counts and revenue (admin only).
#[instrument(skip(state, admin), fields(admin_id = %admin.0.id))]
pub async fn stats(admin: RequireAdmin, State(state): State<AppState>) -> Result<Json<Stats>> {
    let pool = state.pool();
    let orders = OrderRepository::new(pool);

    let stats = Stats {
        users: UserRepository::new(pool).count().await?,
        products: ProductRepository::new(pool).count().await?,
        orders: orders.count().await?,
        total_revenue: orders.total_revenue().await?,
        monthly_revenue: orders.monthly_revenue().await?,
    };

    Ok(Json(stats))
}
