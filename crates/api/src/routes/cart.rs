//! Cart route handlers.
//!
//! The cart is a single per-user document. `POST` replaces the entire
//! items array and returns what was stored; `GET` returns the stored
//! array, empty if no cart row exists yet. Two tabs writing concurrently
//! race with last-write-wins; there is no per-item patching.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use crate::db::CartRepository;
use crate::error::Result;
use crate::middleware::RequireUser;
use crate::models::CartItem;
use crate::state::AppState;

/// Replacement payload: the full items array.
#[derive(Debug, Deserialize)]
pub struct ReplaceCartRequest {
    pub items: Vec<CartItem>,
}

/// `GET /api/cart` - the caller's cart items.
#[instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn show(user: RequireUser, State(state): State<AppState>) -> Result<Json<Vec<CartItem>>> {
    let items = CartRepository::new(state.pool()).get_items(user.0.id).await?;

    Ok(Json(items))
}

/// `POST /api/cart` - replace the caller's cart wholesale.
#[instrument(skip(state, user, request), fields(user_id = %user.0.id, items = request.items.len()))]
pub async fn replace(
    user: RequireUser,
    State(state): State<AppState>,
    Json(request): Json<ReplaceCartRequest>,
) -> Result<Json<Vec<CartItem>>> {
    let stored = CartRepository::new(state.pool())
        .replace_items(user.0.id, &request.items)
        .await?;

    Ok(Json(stored))
}
