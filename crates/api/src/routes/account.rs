//! Account route handlers.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::{Address, User};
use crate::state::AppState;

/// `GET /api/users/me` - the caller's profile.
///
/// Reads the row fresh rather than trusting the session snapshot, so a
/// role or address change shows up immediately.
#[instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn me(user: RequireUser, State(state): State<AppState>) -> Result<Json<User>> {
    let profile = UserRepository::new(state.pool())
        .get_by_id(user.0.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("account no longer exists".to_owned()))?;

    Ok(Json(profile))
}

/// `PUT /api/users/me/address` - replace the shipping address wholesale.
#[instrument(skip(state, user, address), fields(user_id = %user.0.id))]
pub async fn update_address(
    user: RequireUser,
    State(state): State<AppState>,
    Json(address): Json<Address>,
) -> Result<Json<User>> {
    if !address.is_complete() {
        return Err(AppError::BadRequest(
            "street, city, state, zip, and country are all required".to_owned(),
        ));
    }

    let profile = UserRepository::new(state.pool())
        .update_address(user.0.id, &address)
        .await?;

    Ok(Json(profile))
}
