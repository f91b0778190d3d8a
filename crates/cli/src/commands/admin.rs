//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! # Promote an existing account to admin
//! cl-cli admin promote -e admin@example.com
//! ```
//!
//! # Environment Variables
//!
//! - `COPPERLEAF_DATABASE_URL` - `PostgreSQL` connection string

use secrecy::SecretString;
use thiserror::Error;

use copperleaf_api::db::{self, RepositoryError, UserRepository};
use copperleaf_core::{Email, UserRole};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// No account exists with this email.
    #[error("No account found with email: {0}")]
    UserNotFound(String),

    /// Repository error.
    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

/// Promote an existing account to admin.
///
/// The account must already exist; admins register through the normal
/// signup flow and are promoted afterwards.
pub async fn promote(email: &str) -> Result<(), AdminError> {
    dotenvy::dotenv().ok();

    let email = Email::parse(email).map_err(|e| AdminError::InvalidEmail(e.to_string()))?;

    let database_url = std::env::var("COPPERLEAF_DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| AdminError::MissingEnvVar("COPPERLEAF_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    UserRepository::new(&pool)
        .set_role(&email, UserRole::Admin)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AdminError::UserNotFound(email.to_string()),
            other => AdminError::Repository(other),
        })?;

    tracing::info!("Promoted {} to admin", email);
    Ok(())
}
