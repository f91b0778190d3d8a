//! Session models and keys.
//!
//! The original storefront this replaces identified callers with two
//! plaintext cookies (user id and role). Here the caller's identity lives
//! server-side in a `tower-sessions` record; only the opaque signed session
//! id crosses the wire.

use serde::{Deserialize, Serialize};

use copperleaf_core::{Email, UserId, UserRole};

/// Session key constants.
pub mod session_keys {
    /// The authenticated user, if any.
    pub const CURRENT_USER: &str = "current_user";
}

/// The authenticated user stored in the session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: Email,
    pub role: UserRole,
}

impl CurrentUser {
    /// Build the session record from a freshly authenticated user.
    #[must_use]
    pub fn from_user(user: &crate::models::User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}
