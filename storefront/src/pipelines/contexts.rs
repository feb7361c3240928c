// storefront/src/pipelines/contexts.rs

//! Data structs the pipelines run over. Handlers receive them wrapped in
//! `ContextData`.

use crate::models::{Cart, Order, OrderItem, Product};
use crate::services::cart_service::CartView;
use crate::services::order_service::OrderView;
use crate::state::AppState;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Clone)]
pub struct CheckoutCtxData {
  pub app_state: AppState,
  pub user_id: Uuid,
  pub cart: Option<Cart>,
  /// Current catalog entries for the cart's products, keyed by id.
  pub products: HashMap<Uuid, Product>,
  /// Snapshot lines, in cart order.
  pub order_items: Vec<OrderItem>,
  pub order: Option<Order>,
  pub order_view: Option<OrderView>,
}

impl CheckoutCtxData {
  pub fn new(app_state: AppState, user_id: Uuid) -> Self {
    Self {
      app_state,
      user_id,
      cart: None,
      products: HashMap::new(),
      order_items: Vec::new(),
      order: None,
      order_view: None,
    }
  }
}

#[derive(Clone)]
pub struct MergeCartsCtxData {
  pub app_state: AppState,
  pub user_id: Uuid,
  pub guest_token: String,
  pub guest_cart: Option<Cart>,
  pub user_cart: Option<Cart>,
  pub merged_view: Option<CartView>,
}
