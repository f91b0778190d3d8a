//! Core domain types.

mod email;
mod id;
mod money;
mod status;

pub use email::{Email, EmailError};
pub use id::{OrderId, ProductId, UserId};
pub use money::to_cents;
pub use status::{OrderStatus, UserRole};
