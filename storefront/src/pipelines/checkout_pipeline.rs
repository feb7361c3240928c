// storefront/src/pipelines/checkout_pipeline.rs

//! Cart to order: validate every line against the live catalog, snapshot it,
//! then commit order, stock decrements and cart clear as one unit.

use crate::errors::AppError;
use crate::models::{CartOwner, Order, OrderItem};
use crate::pipelines::contexts::CheckoutCtxData;
use crate::services::order_service;
use crate::workflow::{ContextData, Pipeline, PipelineControl, Workflows};
use std::collections::HashMap;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub const STEPS: &[(&str, bool)] = &[
  ("load_cart", false),
  ("resolve_products", false),
  ("validate_line_items", false),
  ("commit_order", false),
  ("resolve_order", false),
];

pub fn build_checkout_pipeline() -> Pipeline<CheckoutCtxData, AppError> {
  let mut p = Pipeline::<CheckoutCtxData, AppError>::new(STEPS);
  p.on_step("load_cart", load_cart);
  p.on_step("resolve_products", resolve_products);
  p.on_step("validate_line_items", validate_line_items);
  p.on_step("commit_order", commit_order);
  p.on_step("resolve_order", resolve_order);
  p
}

pub fn register_checkout_pipeline(workflows: &Workflows<AppError>) {
  workflows.register_pipeline(build_checkout_pipeline());
  info!("Checkout pipeline registered.");
}

fn missing(what: &str) -> AppError {
  AppError::Internal(format!("Checkout context is missing {}", what))
}

#[instrument(name = "checkout::load_cart", skip(ctx_data), err(Display))]
async fn load_cart(ctx_data: ContextData<CheckoutCtxData>) -> Result<PipelineControl, AppError> {
  let (store, user_id) = {
    let guard = ctx_data.read();
    (guard.app_state.store.clone(), guard.user_id)
  };

  let cart = store
    .find_cart(&CartOwner::User(user_id))
    .await?
    .filter(|c| !c.is_empty())
    .ok_or_else(|| AppError::Validation("Cart is empty".to_string()))?;

  info!(%user_id, cart_id = %cart.id, lines = cart.items.len(), "Cart loaded for checkout.");
  ctx_data.write().cart = Some(cart);
  Ok(PipelineControl::Continue)
}

#[instrument(name = "checkout::resolve_products", skip(ctx_data), err(Display))]
async fn resolve_products(ctx_data: ContextData<CheckoutCtxData>) -> Result<PipelineControl, AppError> {
  let (store, ids) = {
    let guard = ctx_data.read();
    let cart = guard.cart.as_ref().ok_or_else(|| missing("cart"))?;
    let mut ids: Vec<Uuid> = cart.items.iter().map(|i| i.product_id).collect();
    ids.sort();
    ids.dedup();
    (guard.app_state.store.clone(), ids)
  };

  let products: HashMap<_, _> = store
    .find_products(&ids)
    .await?
    .into_iter()
    .map(|p| (p.id, p))
    .collect();

  ctx_data.write().products = products;
  Ok(PipelineControl::Continue)
}

/// Checks lines in cart order and stops at the first failure, so the error
/// names the first offending item.
#[instrument(name = "checkout::validate_line_items", skip(ctx_data), err(Display))]
async fn validate_line_items(ctx_data: ContextData<CheckoutCtxData>) -> Result<PipelineControl, AppError> {
  let mut guard = ctx_data.write();
  let cart = guard.cart.as_ref().ok_or_else(|| missing("cart"))?;

  let mut order_items = Vec::with_capacity(cart.items.len());
  for line in &cart.items {
    let product = guard
      .products
      .get(&line.product_id)
      .ok_or_else(|| AppError::Validation(format!("Product not found for item {}", line.id)))?;

    if product.stock < line.quantity {
      warn!(product_id = %product.id, available = product.stock, requested = line.quantity, "Insufficient stock.");
      return Err(AppError::Validation(format!(
        "Insufficient stock for {} (Size: {}). Available: {}, Requested: {}",
        product.name, line.size, product.stock, line.quantity
      )));
    }

    if !product.offers_size(line.size) {
      return Err(AppError::Validation(format!(
        "Size {} is no longer available for {}",
        line.size, product.name
      )));
    }

    order_items.push(OrderItem {
      id: Uuid::new_v4(),
      product_id: product.id,
      product_name: product.name.clone(),
      product_image: product.image_url.clone(),
      size: line.size,
      quantity: line.quantity,
      price: product.price,
    });
  }

  guard.order_items = order_items;
  Ok(PipelineControl::Continue)
}

#[instrument(name = "checkout::commit_order", skip(ctx_data), err(Display))]
async fn commit_order(ctx_data: ContextData<CheckoutCtxData>) -> Result<PipelineControl, AppError> {
  let (store, order, cart_id) = {
    let guard = ctx_data.read();
    let cart_id = guard.cart.as_ref().ok_or_else(|| missing("cart"))?.id;
    let order = Order::place(guard.user_id, guard.order_items.clone());
    (guard.app_state.store.clone(), order, cart_id)
  };

  store.commit_checkout(&order, cart_id).await?;
  info!(order_id = %order.id, total = %order.total_price, "Order committed.");

  ctx_data.write().order = Some(order);
  Ok(PipelineControl::Continue)
}

#[instrument(name = "checkout::resolve_order", skip(ctx_data), err(Display))]
async fn resolve_order(ctx_data: ContextData<CheckoutCtxData>) -> Result<PipelineControl, AppError> {
  let (app_state, order) = {
    let guard = ctx_data.read();
    let order = guard.order.clone().ok_or_else(|| missing("order"))?;
    (guard.app_state.clone(), order)
  };

  let view = order_service::resolve_order(&app_state, &order).await?;
  ctx_data.write().order_view = Some(view);
  Ok(PipelineControl::Continue)
}
