//! Cart repository.
//!
//! One cart row per user; every write replaces the whole items array
//! (upsert). Concurrent writers race with last-write-wins, which is the
//! documented contract.

use sqlx::PgPool;
use sqlx::types::Json;

use copperleaf_core::UserId;

use super::RepositoryError;
use crate::models::CartItem;

/// Repository for cart operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the user's cart items, or an empty vec when no cart row exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored items are invalid.
    pub async fn get_items(&self, user_id: UserId) -> Result<Vec<CartItem>, RepositoryError> {
        let row: Option<(Json<Vec<CartItem>>,)> =
            sqlx::query_as("SELECT items FROM carts WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(|(Json(items),)| items).unwrap_or_default())
    }

    /// Replace the user's cart with the given items, creating the row if
    /// needed, and return the stored items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn replace_items(
        &self,
        user_id: UserId,
        items: &[CartItem],
    ) -> Result<Vec<CartItem>, RepositoryError> {
        let (Json(stored),): (Json<Vec<CartItem>>,) = sqlx::query_as(
            r"
            INSERT INTO carts (user_id, items, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (user_id)
            DO UPDATE SET items = EXCLUDED.items, updated_at = now()
            RETURNING items
            ",
        )
        .bind(user_id)
        .bind(Json(items))
        .fetch_one(self.pool)
        .await?;

        Ok(stored)
    }

    /// Empty the user's cart if a cart row exists.
    ///
    /// Called after a paid checkout session has been reconciled into an
    /// order. A missing row is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn clear(&self, user_id: UserId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE carts SET items = '[]'::jsonb, updated_at = now() WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
