//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (database ping)
//!
//! # Catalog
//! GET    /api/products             - Product listing (?category= filter)
//! POST   /api/products             - Create product (admin)
//! GET    /api/products/search      - Catalog search (?q= term)
//! GET    /api/products/{id}        - Product detail
//! PUT    /api/products/{id}        - Partial update (admin)
//! DELETE /api/products/{id}        - Delete product (admin)
//!
//! # Accounts
//! POST /api/register               - Register (email, name, password)
//! POST /api/login                  - Login, establishes the session
//! POST /api/logout                 - Logout, flushes the session
//! GET  /api/users/me               - Current profile
//! PUT  /api/users/me/address       - Replace shipping address
//!
//! # Cart
//! GET  /api/cart                   - Caller's items array ([] if none)
//! POST /api/cart                   - Replace items array wholesale
//!
//! # Checkout & orders
//! POST /api/checkout               - Create hosted payment session, return URL
//! POST /api/webhook                - Payment processor webhook (signed raw body)
//! GET  /api/orders                 - All orders (admin)
//! GET  /api/orders/me              - Caller's orders
//!
//! # Admin
//! GET    /api/admin/users          - List users (admin)
//! DELETE /api/admin/users/{id}     - Delete user (admin)
//! GET    /api/admin/stats          - Dashboard counts and revenue (admin)
//! ```

pub mod account;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;
pub mod webhook;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route("/search", get(products::search))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::remove),
        )
}

/// Create the account routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/users/me", get(account::me))
        .route("/users/me/address", put(account::update_address))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new().route("/", get(cart::show).post(cart::replace))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list_all))
        .route("/me", get(orders::mine))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users))
        .route("/users/{id}", delete(admin::delete_user))
        .route("/stats", get(admin::stats))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/products", product_routes())
        .nest("/api", auth_routes())
        .nest("/api/cart", cart_routes())
        .route("/api/checkout", post(checkout::create_session))
        .route("/api/webhook", post(webhook::receive))
        .nest("/api/orders", order_routes())
        .nest("/api/admin", admin_routes())
}
