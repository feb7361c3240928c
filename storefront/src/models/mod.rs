// storefront/src/models/mod.rs

//! Domain records persisted by the stores.

pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{Cart, CartItem, CartOwner, LineError};
pub use order::{Order, OrderItem, OrderStatus};
pub use product::{Category, Product, Size, UnknownLabel};
pub use user::{Session, User};
