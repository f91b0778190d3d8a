//! Catalog seeding command.
//!
//! Inserts a small set of sample products so a fresh database has
//! something to browse. Skips seeding if the catalog already has
//! products, so it is safe to run repeatedly.
//!
//! # Environment Variables
//!
//! - `COPPERLEAF_DATABASE_URL` - `PostgreSQL` connection string

use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;

use copperleaf_api::db::{self, ProductRepository, RepositoryError};
use copperleaf_api::models::NewProduct;

/// Errors that can occur during seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository error.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

fn sample_products() -> Vec<NewProduct> {
    vec![
        NewProduct {
            name: "Linen Crew Tee".to_owned(),
            description: Some("Relaxed-fit tee in garment-washed linen.".to_owned()),
            price: Decimal::new(3200, 2),
            category: "tops".to_owned(),
            images: vec!["/images/linen-crew-tee.jpg".to_owned()],
            sizes: vec!["S".to_owned(), "M".to_owned(), "L".to_owned(), "XL".to_owned()],
            colors: vec!["white".to_owned(), "sage".to_owned(), "charcoal".to_owned()],
            in_stock: true,
        },
        NewProduct {
            name: "Canvas Field Jacket".to_owned(),
            description: Some("Waxed canvas jacket with corduroy collar.".to_owned()),
            price: Decimal::new(14800, 2),
            category: "outerwear".to_owned(),
            images: vec!["/images/canvas-field-jacket.jpg".to_owned()],
            sizes: vec!["S".to_owned(), "M".to_owned(), "L".to_owned()],
            colors: vec!["olive".to_owned(), "tan".to_owned()],
            in_stock: true,
        },
        NewProduct {
            name: "Selvedge Denim Jeans".to_owned(),
            description: Some("14oz selvedge denim, straight cut.".to_owned()),
            price: Decimal::new(9800, 2),
            category: "bottoms".to_owned(),
            images: vec!["/images/selvedge-denim.jpg".to_owned()],
            sizes: vec![
                "28".to_owned(),
                "30".to_owned(),
                "32".to_owned(),
                "34".to_owned(),
                "36".to_owned(),
            ],
            colors: vec!["indigo".to_owned()],
            in_stock: true,
        },
        NewProduct {
            name: "Merino Beanie".to_owned(),
            description: Some("Ribbed beanie in extra-fine merino wool.".to_owned()),
            price: Decimal::new(2400, 2),
            category: "accessories".to_owned(),
            images: vec!["/images/merino-beanie.jpg".to_owned()],
            sizes: vec![],
            colors: vec!["black".to_owned(), "oatmeal".to_owned(), "rust".to_owned()],
            in_stock: true,
        },
    ]
}

/// Seed the catalog with sample products.
pub async fn products() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("COPPERLEAF_DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| SeedError::MissingEnvVar("COPPERLEAF_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;
    let repository = ProductRepository::new(&pool);

    let existing = repository.count().await?;
    if existing > 0 {
        tracing::info!("Catalog already has {existing} products, skipping seed");
        return Ok(());
    }

    let samples = sample_products();
    let count = samples.len();

    for product in &samples {
        let created = repository.create(product).await?;
        tracing::info!("Seeded product: {} (ID: {})", created.name, created.id);
    }

    tracing::info!("Seeded {count} products");
    Ok(())
}
