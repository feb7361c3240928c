// storefront/src/store/memory.rs

//! In-process store for local development and tests.

use super::{AccountStore, CartStore, CatalogStore, OrderStore, ProductFilter, Store, StoreError, StoreResult};
use crate::models::{Cart, CartOwner, Order, Product, Session, User};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Default)]
struct MemoryState {
  products: HashMap<Uuid, Product>,
  carts: HashMap<Uuid, Cart>,
  cart_index: HashMap<CartOwner, Uuid>,
  orders: HashMap<Uuid, Order>,
  users: HashMap<Uuid, User>,
  sessions: HashMap<String, Session>,
}

/// Every operation takes the lock once, so each call is atomic with respect
/// to the others.
#[derive(Debug, Default)]
pub struct MemoryStore {
  state: RwLock<MemoryState>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Inserts or replaces a single product.
  pub fn put_product(&self, product: Product) {
    self.state.write().products.insert(product.id, product);
  }

  pub fn cart_count(&self) -> usize {
    self.state.read().carts.len()
  }

  pub fn order_count(&self) -> usize {
    self.state.read().orders.len()
  }
}

#[async_trait]
impl CatalogStore for MemoryStore {
  async fn search_products(&self, filter: &ProductFilter, offset: i64, limit: i64) -> StoreResult<(Vec<Product>, i64)> {
    let state = self.state.read();
    let mut matching: Vec<&Product> = state.products.values().filter(|p| filter.matches(p)).collect();
    matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));

    let total = matching.len() as i64;
    let page = matching
      .into_iter()
      .skip(offset.max(0) as usize)
      .take(limit.max(0) as usize)
      .cloned()
      .collect();
    Ok((page, total))
  }

  async fn find_product(&self, id: Uuid) -> StoreResult<Option<Product>> {
    Ok(self.state.read().products.get(&id).cloned())
  }

  async fn find_products(&self, ids: &[Uuid]) -> StoreResult<Vec<Product>> {
    let state = self.state.read();
    Ok(ids.iter().filter_map(|id| state.products.get(id).cloned()).collect())
  }

  async fn replace_catalog(&self, products: &[Product]) -> StoreResult<()> {
    let mut state = self.state.write();
    state.products = products.iter().map(|p| (p.id, p.clone())).collect();
    Ok(())
  }
}

#[async_trait]
impl CartStore for MemoryStore {
  async fn find_cart(&self, owner: &CartOwner) -> StoreResult<Option<Cart>> {
    let state = self.state.read();
    Ok(state.cart_index.get(owner).and_then(|id| state.carts.get(id)).cloned())
  }

  async fn find_or_create_cart(&self, owner: &CartOwner) -> StoreResult<Cart> {
    let mut state = self.state.write();
    if let Some(cart) = state.cart_index.get(owner).and_then(|id| state.carts.get(id)) {
      return Ok(cart.clone());
    }
    let cart = Cart::new(owner.clone());
    state.cart_index.insert(owner.clone(), cart.id);
    state.carts.insert(cart.id, cart.clone());
    Ok(cart)
  }

  async fn save_cart(&self, cart: &Cart) -> StoreResult<()> {
    let mut state = self.state.write();
    if let Some(&existing) = state.cart_index.get(&cart.owner) {
      if existing != cart.id {
        return Err(StoreError::Corrupt(format!(
          "cart {} conflicts with existing cart {} for the same owner",
          cart.id, existing
        )));
      }
    }
    state.cart_index.insert(cart.owner.clone(), cart.id);
    state.carts.insert(cart.id, cart.clone());
    Ok(())
  }

  async fn delete_cart(&self, cart_id: Uuid) -> StoreResult<()> {
    let mut state = self.state.write();
    if let Some(cart) = state.carts.remove(&cart_id) {
      state.cart_index.remove(&cart.owner);
    }
    Ok(())
  }
}

#[async_trait]
impl OrderStore for MemoryStore {
  async fn commit_checkout(&self, order: &Order, cart_id: Uuid) -> StoreResult<()> {
    let mut state = self.state.write();

    // Check every decrement up front, summing lines that share a product.
    // The line that tips a product over its stock is the one reported.
    let mut requested: HashMap<Uuid, i32> = HashMap::new();
    for item in &order.items {
      let quantity = requested.entry(item.product_id).or_default();
      *quantity += item.quantity;
      let available = state.products.get(&item.product_id).map_or(0, |p| p.stock);
      if available < *quantity {
        return Err(StoreError::InsufficientStock {
          product_name: item.product_name.clone(),
          size: item.size,
          available,
          requested: *quantity,
        });
      }
    }

    let now = Utc::now();
    for (product_id, quantity) in requested {
      if let Some(product) = state.products.get_mut(&product_id) {
        product.stock -= quantity;
        product.updated_at = now;
      }
    }
    if let Some(cart) = state.carts.get_mut(&cart_id) {
      cart.items.clear();
      cart.updated_at = now;
    }
    state.orders.insert(order.id, order.clone());
    Ok(())
  }

  async fn find_order(&self, id: Uuid) -> StoreResult<Option<Order>> {
    Ok(self.state.read().orders.get(&id).cloned())
  }

  async fn list_orders_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Order>> {
    let state = self.state.read();
    let mut orders: Vec<Order> = state.orders.values().filter(|o| o.user_id == user_id).cloned().collect();
    orders.sort_by(|a, b| b.order_date.cmp(&a.order_date).then_with(|| b.id.cmp(&a.id)));
    Ok(orders)
  }
}

#[async_trait]
impl AccountStore for MemoryStore {
  async fn insert_user(&self, user: &User) -> StoreResult<()> {
    let mut state = self.state.write();
    if state.users.values().any(|u| u.email == user.email) {
      return Err(StoreError::DuplicateEmail(user.email.clone()));
    }
    state.users.insert(user.id, user.clone());
    Ok(())
  }

  async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
    Ok(self.state.read().users.get(&id).cloned())
  }

  async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
    Ok(self.state.read().users.values().find(|u| u.email == email).cloned())
  }

  async fn insert_session(&self, session: &Session) -> StoreResult<()> {
    self.state.write().sessions.insert(session.token.clone(), session.clone());
    Ok(())
  }

  async fn find_session(&self, token: &str) -> StoreResult<Option<Session>> {
    Ok(self.state.read().sessions.get(token).cloned())
  }

  async fn delete_session(&self, token: &str) -> StoreResult<()> {
    self.state.write().sessions.remove(token);
    Ok(())
  }
}

#[async_trait]
impl Store for MemoryStore {
  async fn close(&self) {
    tracing::debug!("Memory store closed.");
  }
}
