// storefront/src/store/mod.rs

//! Persistence seams. Each store concern is its own trait; `Store` bundles them
//! so `AppState` can carry a single `Arc<dyn Store>`.
//!
//! Carts and orders are stored as whole documents: line items live inside
//! their parent record and every write replaces the record in one statement.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::models::{Cart, CartOwner, Category, Order, Product, Session, Size, User};
use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Migration error: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("Corrupt record: {0}")]
  Corrupt(String),

  #[error("Insufficient stock for {product_name} (Size: {size}). Available: {available}, Requested: {requested}")]
  InsufficientStock {
    product_name: String,
    size: Size,
    available: i32,
    requested: i32,
  },

  #[error("Email '{0}' is already registered")]
  DuplicateEmail(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Catalog search filters; every field is optional and they combine with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
  /// Case-insensitive substring of name or description.
  pub search: Option<String>,
  pub category: Option<Category>,
  pub size: Option<Size>,
  pub min_price: Option<Decimal>,
  pub max_price: Option<Decimal>,
}

impl ProductFilter {
  pub fn matches(&self, product: &Product) -> bool {
    if let Some(needle) = &self.search {
      let needle = needle.to_lowercase();
      if !product.name.to_lowercase().contains(&needle) && !product.description.to_lowercase().contains(&needle) {
        return false;
      }
    }
    if self.category.is_some_and(|c| c != product.category) {
      return false;
    }
    if self.size.is_some_and(|s| !product.offers_size(s)) {
      return false;
    }
    if self.min_price.is_some_and(|min| product.price < min) {
      return false;
    }
    if self.max_price.is_some_and(|max| product.price > max) {
      return false;
    }
    true
  }
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
  /// One page of matching products, newest first, plus the total match count.
  async fn search_products(&self, filter: &ProductFilter, offset: i64, limit: i64) -> StoreResult<(Vec<Product>, i64)>;

  async fn find_product(&self, id: Uuid) -> StoreResult<Option<Product>>;

  /// Products for `ids`; missing ids are simply absent from the result.
  async fn find_products(&self, ids: &[Uuid]) -> StoreResult<Vec<Product>>;

  /// Drops every product and inserts `products` (seeding).
  async fn replace_catalog(&self, products: &[Product]) -> StoreResult<()>;
}

#[async_trait]
pub trait CartStore: Send + Sync {
  async fn find_cart(&self, owner: &CartOwner) -> StoreResult<Option<Cart>>;

  /// Returns the owner's cart, creating and persisting an empty one first if needed.
  async fn find_or_create_cart(&self, owner: &CartOwner) -> StoreResult<Cart>;

  /// Replaces the stored cart document (matched by id), inserting it if new.
  async fn save_cart(&self, cart: &Cart) -> StoreResult<()>;

  async fn delete_cart(&self, cart_id: Uuid) -> StoreResult<()>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
  /// Atomically persists `order`, decrements stock for each of its lines and
  /// empties cart `cart_id`. Nothing is written if any decrement would take
  /// stock below zero.
  async fn commit_checkout(&self, order: &Order, cart_id: Uuid) -> StoreResult<()>;

  async fn find_order(&self, id: Uuid) -> StoreResult<Option<Order>>;

  /// The user's orders, most recent `order_date` first.
  async fn list_orders_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Order>>;
}

#[async_trait]
pub trait AccountStore: Send + Sync {
  async fn insert_user(&self, user: &User) -> StoreResult<()>;

  async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

  async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

  async fn insert_session(&self, session: &Session) -> StoreResult<()>;

  async fn find_session(&self, token: &str) -> StoreResult<Option<Session>>;

  async fn delete_session(&self, token: &str) -> StoreResult<()>;
}

/// Everything the application persists.
#[async_trait]
pub trait Store: CatalogStore + CartStore + OrderStore + AccountStore {
  /// Releases backend resources (connection pool) at shutdown.
  async fn close(&self);
}
