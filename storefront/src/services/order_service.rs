// storefront/src/services/order_service.rs

//! Checkout entry point and order history.

use crate::errors::AppError;
use crate::models::{Order, OrderStatus, Product, Size};
use crate::pipelines::contexts::CheckoutCtxData;
use crate::state::AppState;
use crate::workflow::{ContextData, PipelineResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{info, instrument, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
  pub id: Uuid,
  /// Current catalog entry, if it still exists. The snapshot fields below are
  /// what was actually bought.
  pub product: Option<Product>,
  pub product_name: String,
  pub product_image: String,
  pub size: Size,
  pub quantity: i32,
  #[serde(with = "rust_decimal::serde::float")]
  pub price: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
  pub id: Uuid,
  pub user: Uuid,
  pub items: Vec<OrderItemView>,
  #[serde(with = "rust_decimal::serde::float")]
  pub total_price: Decimal,
  pub order_date: DateTime<Utc>,
  pub status: OrderStatus,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

fn to_view(order: &Order, products: &HashMap<Uuid, Product>) -> OrderView {
  OrderView {
    id: order.id,
    user: order.user_id,
    items: order
      .items
      .iter()
      .map(|item| OrderItemView {
        id: item.id,
        product: products.get(&item.product_id).cloned(),
        product_name: item.product_name.clone(),
        product_image: item.product_image.clone(),
        size: item.size,
        quantity: item.quantity,
        price: item.price,
      })
      .collect(),
    total_price: order.total_price,
    order_date: order.order_date,
    status: order.status,
    created_at: order.created_at,
    updated_at: order.updated_at,
  }
}

/// Resolves product references for several orders with a single lookup.
pub async fn resolve_orders(state: &AppState, orders: &[Order]) -> Result<Vec<OrderView>, AppError> {
  let ids: Vec<Uuid> = orders
    .iter()
    .flat_map(|o| o.items.iter().map(|i| i.product_id))
    .collect::<HashSet<_>>()
    .into_iter()
    .collect();
  let products: HashMap<Uuid, Product> = state
    .store
    .find_products(&ids)
    .await?
    .into_iter()
    .map(|p| (p.id, p))
    .collect();

  Ok(orders.iter().map(|o| to_view(o, &products)).collect())
}

pub async fn resolve_order(state: &AppState, order: &Order) -> Result<OrderView, AppError> {
  let mut views = resolve_orders(state, std::slice::from_ref(order)).await?;
  views
    .pop()
    .ok_or_else(|| AppError::Internal("Order view could not be built.".to_string()))
}

/// Turns the user's cart into an order through the checkout pipeline.
#[instrument(name = "order_service::checkout", skip(state))]
pub async fn checkout(state: &AppState, user_id: Uuid) -> Result<OrderView, AppError> {
  let ctx_data = ContextData::new(CheckoutCtxData::new(state.clone(), user_id));

  match state.workflows.run(ctx_data.clone()).await? {
    PipelineResult::Completed => {
      let view = ctx_data.write().order_view.take().ok_or_else(|| {
        warn!(%user_id, "Checkout pipeline completed but no order view was set.");
        AppError::Internal("Checkout completed, but order details are unavailable.".to_string())
      })?;
      info!(%user_id, order_id = %view.id, total = %view.total_price, "Order created.");
      Ok(view)
    }
    PipelineResult::Stopped => {
      warn!(%user_id, "Checkout pipeline was stopped by a handler.");
      Err(AppError::Internal("Checkout process was halted.".to_string()))
    }
  }
}

/// The user's orders, newest `order_date` first.
#[instrument(name = "order_service::list_orders", skip(state))]
pub async fn list_orders(state: &AppState, user_id: Uuid) -> Result<Vec<OrderView>, AppError> {
  let orders = state.store.list_orders_for_user(user_id).await?;
  resolve_orders(state, &orders).await
}

#[instrument(name = "order_service::get_order", skip(state))]
pub async fn get_order(state: &AppState, user_id: Uuid, order_id: &str) -> Result<OrderView, AppError> {
  let not_found = || AppError::NotFound("Order not found".to_string());
  let id = Uuid::parse_str(order_id).map_err(|_| not_found())?;
  let order = state.store.find_order(id).await?.ok_or_else(not_found)?;

  if order.user_id != user_id {
    warn!(%user_id, order_id = %order.id, "Order requested by a different user.");
    return Err(AppError::Forbidden("Not authorized to view this order".to_string()));
  }
  resolve_order(state, &order).await
}
