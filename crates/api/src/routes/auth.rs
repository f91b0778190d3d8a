//! Authentication route handlers.
//!
//! Login and registration establish a server-side session; the browser
//! only ever holds the opaque session cookie.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, instrument};

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::services::AuthService;
use crate::state::AppState;

/// Registration payload.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /api/register` - create an account and log it in.
#[instrument(skip(state, session, request), fields(email = %request.email))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>)> {
    if request.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_owned()));
    }

    let user = AuthService::new(state.pool())
        .register(&request.email, request.name.trim(), &request.password)
        .await?;

    establish_session(&session, &user).await?;
    info!(user_id = %user.id, "user registered");

    Ok((StatusCode::CREATED, Json(user)))
}

/// `POST /api/login` - authenticate and establish the session.
#[instrument(skip(state, session, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<User>> {
    let user = AuthService::new(state.pool())
        .login(&request.email, &request.password)
        .await?;

    establish_session(&session, &user).await?;
    info!(user_id = %user.id, "user logged in");

    Ok(Json(user))
}

/// `POST /api/logout` - flush the session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;
    clear_sentry_user();

    Ok(StatusCode::NO_CONTENT)
}

async fn establish_session(session: &Session, user: &User) -> Result<()> {
    set_current_user(session, &CurrentUser::from_user(user))
        .await
        .map_err(|e| AppError::Internal(format!("failed to write session: {e}")))?;
    set_sentry_user(&user.id, Some(user.email.as_str()));

    Ok(())
}
