//! Order repository.
//!
//! The webhook handler is the only writer. Order creation is keyed on the
//! payment processor's checkout session id with a unique constraint, so a
//! redelivered webhook event cannot create a second order.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use copperleaf_core::UserId;

use super::RepositoryError;
use crate::models::order::{Order, OrderItem};
use crate::models::user::Address;

/// Outcome of an idempotent order insert.
#[derive(Debug)]
pub enum OrderInsert {
    /// The order was created by this call.
    Created(Order),
    /// An order for this checkout session already exists (webhook redelivery).
    AlreadyRecorded(Order),
}

const ORDER_COLUMNS: &str =
    "id, user_id, checkout_session_id, items, total, shipping_address, status, created_at, updated_at";

/// Revenue for one calendar month.
#[derive(Debug, Clone, FromRow, serde::Serialize)]
pub struct MonthlyRevenue {
    pub month: DateTime<Utc>,
    pub revenue: Decimal,
}

/// Repository for order operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an order for a completed checkout session.
    ///
    /// If an order for the session already exists, the existing order is
    /// returned as `AlreadyRecorded` and nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    /// Returns `RepositoryError::DataCorruption` if a conflicting row
    /// exists but cannot be read back.
    pub async fn create(
        &self,
        user_id: UserId,
        checkout_session_id: &str,
        items: &[OrderItem],
        total: Decimal,
        shipping_address: Option<&Address>,
    ) -> Result<OrderInsert, RepositoryError> {
        let inserted = sqlx::query_as::<_, Order>(&format!(
            r"
            INSERT INTO orders (user_id, checkout_session_id, items, total, shipping_address)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (checkout_session_id) DO NOTHING
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(user_id)
        .bind(checkout_session_id)
        .bind(Json(items))
        .bind(total)
        .bind(shipping_address.map(Json))
        .fetch_optional(self.pool)
        .await?;

        if let Some(order) = inserted {
            return Ok(OrderInsert::Created(order));
        }

        // DO NOTHING fired: the session was already reconciled.
        let existing = self
            .get_by_session(checkout_session_id)
            .await?
            .ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "order insert conflicted but no row found for session {checkout_session_id}"
                ))
            })?;

        Ok(OrderInsert::AlreadyRecorded(existing))
    }

    /// Look up an order by its checkout session id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_session(&self, session_id: &str) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE checkout_session_id = $1"
        ))
        .bind(session_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(order)
    }

    /// List every order, newest first (admin console).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// List one user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// Count orders (admin dashboard).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
            .fetch_one(self.pool)
            .await?;

        Ok(count.0)
    }

    /// Total revenue across all orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn total_revenue(&self) -> Result<Decimal, RepositoryError> {
        let total: (Decimal,) = sqlx::query_as("SELECT COALESCE(SUM(total), 0) FROM orders")
            .fetch_one(self.pool)
            .await?;

        Ok(total.0)
    }

    /// Revenue bucketed by calendar month, oldest first.
    ///
    /// Recomputed on every request; the dashboard carries no cache.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn monthly_revenue(&self) -> Result<Vec<MonthlyRevenue>, RepositoryError> {
        let rows = sqlx::query_as::<_, MonthlyRevenue>(
            r"
            SELECT date_trunc('month', created_at) AS month,
                   COALESCE(SUM(total), 0) AS revenue
            FROM orders
            GROUP BY month
            ORDER BY month
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
