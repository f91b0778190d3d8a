//! Database migration command.
//!
//! Runs the API schema migrations and then creates the session store
//! table used by tower-sessions. Both are idempotent, so `migrate` is
//! safe to run on every deploy.
//!
//! # Environment Variables
//!
//! - `COPPERLEAF_DATABASE_URL` - `PostgreSQL` connection string

use secrecy::SecretString;
use thiserror::Error;
use tower_sessions_sqlx_store::PostgresStore;

use copperleaf_api::db;

/// Errors that can occur during migration.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed to apply.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all database migrations.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("COPPERLEAF_DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| MigrationError::MissingEnvVar("COPPERLEAF_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running schema migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Creating session store table...");
    let store = PostgresStore::new(pool);
    store.migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
