// storefront/src/services/cart_service.rs

//! Cart operations scoped to one resolved identity.

use crate::errors::AppError;
use crate::models::{Cart, CartOwner, Product, Size};
use crate::pipelines::contexts::MergeCartsCtxData;
use crate::state::AppState;
use crate::workflow::{ContextData, PipelineResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// A cart line with its product resolved; `product` is `None` when the
/// product has since left the catalog.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
  pub id: Uuid,
  pub product: Option<Product>,
  pub size: Size,
  pub quantity: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
  pub id: Uuid,
  pub user: Option<Uuid>,
  pub session_id: Option<String>,
  pub items: Vec<CartLineView>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

fn cart_not_found() -> AppError {
  AppError::NotFound("Cart not found".to_string())
}

fn parse_item_id(raw: &str) -> Result<Uuid, AppError> {
  Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Cart item not found".to_string()))
}

/// Builds the response view, loading every referenced product in one lookup.
pub async fn resolve_cart(state: &AppState, cart: &Cart) -> Result<CartView, AppError> {
  let ids: Vec<Uuid> = cart.items.iter().map(|i| i.product_id).collect();
  let products: HashMap<Uuid, Product> = state
    .store
    .find_products(&ids)
    .await?
    .into_iter()
    .map(|p| (p.id, p))
    .collect();

  let items = cart
    .items
    .iter()
    .map(|line| CartLineView {
      id: line.id,
      product: products.get(&line.product_id).cloned(),
      size: line.size,
      quantity: line.quantity,
    })
    .collect();

  Ok(CartView {
    id: cart.id,
    user: cart.owner.user_id(),
    session_id: cart.owner.session_id().map(str::to_string),
    items,
    created_at: cart.created_at,
    updated_at: cart.updated_at,
  })
}

/// The identity's cart, created empty on first access.
#[instrument(name = "cart_service::get_cart", skip(state))]
pub async fn get_cart(state: &AppState, owner: &CartOwner) -> Result<CartView, AppError> {
  let cart = state.store.find_or_create_cart(owner).await?;
  resolve_cart(state, &cart).await
}

/// Adds `quantity` of `(product_id, size)`. The product must exist and offer
/// the size; stock is not checked here.
#[instrument(name = "cart_service::add_item", skip(state))]
pub async fn add_item(
  state: &AppState,
  owner: &CartOwner,
  product_id: &str,
  size: &str,
  quantity: i32,
) -> Result<CartView, AppError> {
  let product_not_found = || AppError::NotFound("Product not found".to_string());
  let product_id = Uuid::parse_str(product_id).map_err(|_| product_not_found())?;
  let product = state.store.find_product(product_id).await?.ok_or_else(product_not_found)?;

  let size = size
    .parse::<Size>()
    .ok()
    .filter(|s| product.offers_size(*s))
    .ok_or_else(|| AppError::Validation("Selected size is not available for this product".to_string()))?;

  let mut cart = state.store.find_or_create_cart(owner).await?;
  let line_quantity = cart.add_line(product.id, size, quantity)?.quantity;
  state.store.save_cart(&cart).await?;

  info!(cart_id = %cart.id, product_id = %product.id, %size, line_quantity, "Item added to cart.");
  resolve_cart(state, &cart).await
}

/// Replaces the quantity of one line.
#[instrument(name = "cart_service::update_item", skip(state))]
pub async fn update_item(
  state: &AppState,
  owner: &CartOwner,
  item_id: &str,
  quantity: Option<i32>,
) -> Result<CartView, AppError> {
  let quantity = quantity
    .filter(|q| *q >= 1)
    .ok_or_else(|| AppError::Validation("Quantity must be at least 1".to_string()))?;

  let mut cart = state.store.find_cart(owner).await?.ok_or_else(cart_not_found)?;
  cart.set_quantity(parse_item_id(item_id)?, quantity)?;
  state.store.save_cart(&cart).await?;
  resolve_cart(state, &cart).await
}

#[instrument(name = "cart_service::remove_item", skip(state))]
pub async fn remove_item(state: &AppState, owner: &CartOwner, item_id: &str) -> Result<CartView, AppError> {
  let mut cart = state.store.find_cart(owner).await?.ok_or_else(cart_not_found)?;
  let removed = cart.remove_line(parse_item_id(item_id)?)?;
  state.store.save_cart(&cart).await?;
  info!(cart_id = %cart.id, item_id = %removed.id, "Item removed from cart.");
  resolve_cart(state, &cart).await
}

/// Empties the cart but keeps the cart record.
#[instrument(name = "cart_service::clear_cart", skip(state))]
pub async fn clear_cart(state: &AppState, owner: &CartOwner) -> Result<CartView, AppError> {
  let mut cart = state.store.find_cart(owner).await?.ok_or_else(cart_not_found)?;
  cart.clear();
  state.store.save_cart(&cart).await?;
  resolve_cart(state, &cart).await
}

/// Folds the guest cart for `guest_token` into the user's cart and deletes it.
#[instrument(name = "cart_service::merge_carts", skip(state, guest_token))]
pub async fn merge_carts(state: &AppState, user_id: Uuid, guest_token: Option<&str>) -> Result<CartView, AppError> {
  let guest_token = guest_token
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .ok_or_else(|| AppError::Validation("Session ID is required".to_string()))?;

  let ctx_data = ContextData::new(MergeCartsCtxData {
    app_state: state.clone(),
    user_id,
    guest_token: guest_token.to_string(),
    guest_cart: None,
    user_cart: None,
    merged_view: None,
  });

  match state.workflows.run(ctx_data.clone()).await? {
    PipelineResult::Completed => ctx_data.write().merged_view.take().ok_or_else(|| {
      warn!(%user_id, "Merge pipeline completed without a cart view.");
      AppError::Internal("Cart merge completed, but the merged cart is unavailable.".to_string())
    }),
    PipelineResult::Stopped => Err(AppError::Internal("Cart merge was halted.".to_string())),
  }
}
