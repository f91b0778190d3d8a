//! Account model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use copperleaf_core::{Email, UserId, UserRole};

/// A shipping address, replaced wholesale on edit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

impl Address {
    /// Whether every field carries a non-empty value.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        ![
            &self.street,
            &self.city,
            &self.state,
            &self.zip,
            &self.country,
        ]
        .iter()
        .any(|field| field.trim().is_empty())
    }
}

/// A registered account.
///
/// The password hash never leaves the db layer; this struct is safe to
/// serialize into API responses.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> Address {
        Address {
            street: "12 Fern Way".to_string(),
            city: "Portland".to_string(),
            state: "OR".to_string(),
            zip: "97201".to_string(),
            country: "US".to_string(),
        }
    }

    #[test]
    fn test_address_complete() {
        assert!(address().is_complete());
    }

    #[test]
    fn test_address_blank_field_incomplete() {
        let mut addr = address();
        addr.zip = "   ".to_string();
        assert!(!addr.is_complete());
    }
}
