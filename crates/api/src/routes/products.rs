//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use copperleaf_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::product::{NewProduct, Product, ProductUpdate};
use crate::state::AppState;

/// Query parameters for the product listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

/// `GET /api/products` - list the catalog, optionally by category.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool())
        .list(query.category.as_deref())
        .await?;

    Ok(Json(products))
}

/// Query parameters for catalog search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// `GET /api/products/search?q=` - case-insensitive catalog search.
///
/// The term is matched as a substring of name, description, and category.
/// A blank term returns an empty list rather than the whole catalog.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Product>>> {
    let term = query.q.trim();
    if term.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let products = ProductRepository::new(state.pool()).search(term).await?;

    Ok(Json(products))
}

/// `GET /api/products/{id}` - product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(Json(product))
}

/// `POST /api/products` - create a product (admin only).
#[instrument(skip(state, new), fields(name = %new.name))]
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(new): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    validate_new_product(&new)?;

    let product = ProductRepository::new(state.pool()).create(&new).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /api/products/{id}` - partial update (admin only).
#[instrument(skip(state, update))]
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(update): Json<ProductUpdate>,
) -> Result<Json<Product>> {
    if let Some(price) = update.price
        && price <= Decimal::ZERO
    {
        return Err(AppError::BadRequest("price must be positive".to_owned()));
    }

    let product = ProductRepository::new(state.pool())
        .update(id, &update)
        .await?;

    Ok(Json(product))
}

/// `DELETE /api/products/{id}` - delete a product (admin only).
///
/// Returns 404, not 500, when the id does not exist.
#[instrument(skip(state))]
pub async fn remove(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    ProductRepository::new(state.pool()).delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

fn validate_new_product(new: &NewProduct) -> Result<()> {
    if new.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_owned()));
    }
    if new.category.trim().is_empty() {
        return Err(AppError::BadRequest("category is required".to_owned()));
    }
    if new.price <= Decimal::ZERO {
        return Err(AppError::BadRequest("price must be positive".to_owned()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_product() -> NewProduct {
        serde_json::from_str(r#"{"name": "Linen Shirt", "price": "49.99", "category": "shirts"}"#)
            .expect("deserialize")
    }

    #[test]
    fn test_search_query_requires_term() {
        assert!(serde_json::from_str::<SearchQuery>("{}").is_err());
        let query: SearchQuery =
            serde_json::from_str(r#"{"q": "linen"}"#).expect("deserialize");
        assert_eq!(query.q, "linen");
    }

    #[test]
    fn test_validate_new_product_ok() {
        assert!(validate_new_product(&new_product()).is_ok());
    }

    #[test]
    fn test_validate_new_product_blank_name() {
        let mut product = new_product();
        product.name = "  ".to_string();
        assert!(matches!(
            validate_new_product(&product),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_validate_new_product_zero_price() {
        let mut product = new_product();
        product.price = Decimal::ZERO;
        assert!(matches!(
            validate_new_product(&product),
            Err(AppError::BadRequest(_))
        ));
    }
}
