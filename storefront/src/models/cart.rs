// storefront/src/models/cart.rs

use super::product::Size;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Whose cart this is. Exactly one of user or guest, so a cart can never be
/// owned by both or by neither.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CartOwner {
  User(Uuid),
  Guest(String),
}

impl CartOwner {
  pub fn user_id(&self) -> Option<Uuid> {
    match self {
      CartOwner::User(id) => Some(*id),
      CartOwner::Guest(_) => None,
    }
  }

  pub fn session_id(&self) -> Option<&str> {
    match self {
      CartOwner::User(_) => None,
      CartOwner::Guest(token) => Some(token),
    }
  }

  /// Rebuilds an owner from the two nullable persisted columns.
  pub fn from_columns(user_id: Option<Uuid>, session_id: Option<String>) -> Option<Self> {
    match (user_id, session_id) {
      (Some(id), None) => Some(CartOwner::User(id)),
      (None, Some(token)) => Some(CartOwner::Guest(token)),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
  pub id: Uuid,
  pub product_id: Uuid,
  pub size: Size,
  pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
  #[error("Quantity must be at least 1")]
  InvalidQuantity,
  #[error("Cart item not found")]
  ItemNotFound,
  #[error("Quantity is too large")]
  QuantityOverflow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
  pub id: Uuid,
  pub owner: CartOwner,
  pub items: Vec<CartItem>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Cart {
  pub fn new(owner: CartOwner) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      owner,
      items: Vec::new(),
      created_at: now,
      updated_at: now,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn find_line(&self, product_id: Uuid, size: Size) -> Option<&CartItem> {
    self.items.iter().find(|i| i.product_id == product_id && i.size == size)
  }

  /// Adds `quantity` of `(product_id, size)`: increments the matching line or
  /// appends a new one.
  pub fn add_line(&mut self, product_id: Uuid, size: Size, quantity: i32) -> Result<&CartItem, LineError> {
    if quantity < 1 {
      return Err(LineError::InvalidQuantity);
    }
    let idx = match self.items.iter().position(|i| i.product_id == product_id && i.size == size) {
      Some(idx) => {
        let line = &mut self.items[idx];
        line.quantity = line.quantity.checked_add(quantity).ok_or(LineError::QuantityOverflow)?;
        idx
      }
      None => {
        self.items.push(CartItem {
          id: Uuid::new_v4(),
          product_id,
          size,
          quantity,
        });
        self.items.len() - 1
      }
    };
    self.updated_at = Utc::now();
    Ok(&self.items[idx])
  }

  /// Replaces the quantity of line `item_id` (absolute, not incremental).
  pub fn set_quantity(&mut self, item_id: Uuid, quantity: i32) -> Result<(), LineError> {
    if quantity < 1 {
      return Err(LineError::InvalidQuantity);
    }
    let line = self
      .items
      .iter_mut()
      .find(|i| i.id == item_id)
      .ok_or(LineError::ItemNotFound)?;
    line.quantity = quantity;
    self.updated_at = Utc::now();
    Ok(())
  }

  pub fn remove_line(&mut self, item_id: Uuid) -> Result<CartItem, LineError> {
    let idx = self
      .items
      .iter()
      .position(|i| i.id == item_id)
      .ok_or(LineError::ItemNotFound)?;
    self.updated_at = Utc::now();
    Ok(self.items.remove(idx))
  }

  pub fn clear(&mut self) {
    self.items.clear();
    self.updated_at = Utc::now();
  }

  /// Folds `other` lines into this cart: quantities of matching
  /// `(product, size)` pairs are summed, the rest are appended as new lines.
  pub fn absorb(&mut self, other: &[CartItem]) -> Result<(), LineError> {
    for line in other {
      self.add_line(line.product_id, line.size, line.quantity)?;
    }
    Ok(())
  }
}
