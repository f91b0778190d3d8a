//! Product repository.

use sqlx::PgPool;

use copperleaf_core::ProductId;

use super::RepositoryError;
use crate::models::product::{NewProduct, Product, ProductUpdate};

/// Repository for catalog operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products, newest first, optionally filtered by category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, category: Option<&str>) -> Result<Vec<Product>, RepositoryError> {
        let products = match category {
            Some(category) => {
                sqlx::query_as::<_, Product>(
                    r"
                    SELECT id, name, description, price, category, images, sizes, colors,
                           in_stock, rating, reviews, created_at
                    FROM products
                    WHERE category = $1
                    ORDER BY created_at DESC, id DESC
                    ",
                )
                .bind(category)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Product>(
                    r"
                    SELECT id, name, description, price, category, images, sizes, colors,
                           in_stock, rating, reviews, created_at
                    FROM products
                    ORDER BY created_at DESC, id DESC
                    ",
                )
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(products)
    }

    /// Case-insensitive substring search over name, description, and category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(&self, term: &str) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, description, price, category, images, sizes, colors,
                   in_stock, rating, reviews, created_at
            FROM products
            WHERE name ILIKE '%' || $1 || '%'
               OR description ILIKE '%' || $1 || '%'
               OR category ILIKE '%' || $1 || '%'
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(term)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, description, price, category, images, sizes, colors,
                   in_stock, rating, reviews, created_at
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Insert a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: &NewProduct) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            INSERT INTO products (name, description, price, category, images, sizes, colors, in_stock)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, description, price, category, images, sizes, colors,
                      in_stock, rating, reviews, created_at
            ",
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(&new.category)
        .bind(&new.images)
        .bind(&new.sizes)
        .bind(&new.colors)
        .bind(new.in_stock)
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// Apply a partial update to a product.
    ///
    /// Absent fields keep their stored values.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            UPDATE products SET
                name        = COALESCE($2, name),
                description = COALESCE($3, description),
                price       = COALESCE($4, price),
                category    = COALESCE($5, category),
                images      = COALESCE($6, images),
                sizes       = COALESCE($7, sizes),
                colors      = COALESCE($8, colors),
                in_stock    = COALESCE($9, in_stock),
                rating      = COALESCE($10, rating)
            WHERE id = $1
            RETURNING id, name, description, price, category, images, sizes, colors,
                      in_stock, rating, reviews, created_at
            ",
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.description)
        .bind(update.price)
        .bind(&update.category)
        .bind(&update.images)
        .bind(&update.sizes)
        .bind(&update.colors)
        .bind(update.in_stock)
        .bind(update.rating)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(product)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Count products (admin dashboard).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;

        Ok(count.0)
    }
}
