//! Domain models backing the API.

pub mod cart;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use cart::CartItem;
pub use order::{Order, OrderItem};
pub use product::{NewProduct, Product, ProductUpdate, Review};
pub use session::{CurrentUser, session_keys};
pub use user::{Address, User};
