//! Copperleaf shared types.
//!
//! Domain types shared between the API server, the CLI, and the
//! integration tests: type-safe entity ids, validated email addresses,
//! money, and the status enums used across the order lifecycle.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::{
    Email, EmailError, OrderId, OrderStatus, ProductId, UserId, UserRole, to_cents,
};
