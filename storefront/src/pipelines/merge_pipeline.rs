// storefront/src/pipelines/merge_pipeline.rs

//! Guest cart into user cart, run right after a guest signs in.

use crate::errors::AppError;
use crate::models::CartOwner;
use crate::pipelines::contexts::MergeCartsCtxData;
use crate::services::cart_service;
use crate::workflow::{ContextData, Pipeline, PipelineControl, Workflows};
use tracing::{debug, info, instrument};

pub const STEPS: &[(&str, bool)] = &[
  ("load_guest_cart", false),
  ("load_user_cart", false),
  ("fold_guest_items", false),
  ("persist_merge", false),
  ("resolve_cart", false),
];

pub fn register_merge_pipeline(workflows: &Workflows<AppError>) {
  let mut p = Pipeline::<MergeCartsCtxData, AppError>::new(STEPS);
  p.on_step("load_guest_cart", load_guest_cart);
  p.on_step("load_user_cart", load_user_cart);
  p.on_step("fold_guest_items", fold_guest_items);
  p.on_step("persist_merge", persist_merge);
  p.on_step("resolve_cart", resolve_cart);
  workflows.register_pipeline(p);
  info!("Cart merge pipeline registered.");
}

fn missing_user_cart() -> AppError {
  AppError::Internal("Merge context is missing the user cart".to_string())
}

#[instrument(name = "merge::load_guest_cart", skip(ctx_data), err(Display))]
async fn load_guest_cart(ctx_data: ContextData<MergeCartsCtxData>) -> Result<PipelineControl, AppError> {
  let (store, owner) = {
    let guard = ctx_data.read();
    (guard.app_state.store.clone(), CartOwner::Guest(guard.guest_token.clone()))
  };

  let guest_cart = store.find_cart(&owner).await?;
  debug!(found = guest_cart.is_some(), "Guest cart lookup finished.");
  ctx_data.write().guest_cart = guest_cart;
  Ok(PipelineControl::Continue)
}

#[instrument(name = "merge::load_user_cart", skip(ctx_data), err(Display))]
async fn load_user_cart(ctx_data: ContextData<MergeCartsCtxData>) -> Result<PipelineControl, AppError> {
  let (store, owner) = {
    let guard = ctx_data.read();
    (guard.app_state.store.clone(), CartOwner::User(guard.user_id))
  };

  let user_cart = store.find_or_create_cart(&owner).await?;
  ctx_data.write().user_cart = Some(user_cart);
  Ok(PipelineControl::Continue)
}

#[instrument(name = "merge::fold_guest_items", skip(ctx_data), err(Display))]
async fn fold_guest_items(ctx_data: ContextData<MergeCartsCtxData>) -> Result<PipelineControl, AppError> {
  let mut guard = ctx_data.write();
  let guest_items = match &guard.guest_cart {
    Some(guest) if !guest.is_empty() => guest.items.clone(),
    _ => return Ok(PipelineControl::Continue),
  };

  let user_cart = guard.user_cart.as_mut().ok_or_else(missing_user_cart)?;
  user_cart.absorb(&guest_items)?;
  debug!(guest_lines = guest_items.len(), user_lines = user_cart.items.len(), "Guest lines folded.");
  Ok(PipelineControl::Continue)
}

/// Saves the user cart before deleting the guest cart, so a failure in
/// between can only leave the guest cart behind, never lose its lines.
#[instrument(name = "merge::persist_merge", skip(ctx_data), err(Display))]
async fn persist_merge(ctx_data: ContextData<MergeCartsCtxData>) -> Result<PipelineControl, AppError> {
  let (store, user_cart, guest_cart) = {
    let guard = ctx_data.read();
    let user_cart = guard.user_cart.clone().ok_or_else(missing_user_cart)?;
    (guard.app_state.store.clone(), user_cart, guard.guest_cart.clone())
  };

  let Some(guest_cart) = guest_cart else {
    return Ok(PipelineControl::Continue);
  };

  if !guest_cart.is_empty() {
    store.save_cart(&user_cart).await?;
  }
  store.delete_cart(guest_cart.id).await?;
  info!(user_cart_id = %user_cart.id, guest_cart_id = %guest_cart.id, "Guest cart merged.");
  Ok(PipelineControl::Continue)
}

#[instrument(name = "merge::resolve_cart", skip(ctx_data), err(Display))]
async fn resolve_cart(ctx_data: ContextData<MergeCartsCtxData>) -> Result<PipelineControl, AppError> {
  let (app_state, user_cart) = {
    let guard = ctx_data.read();
    let user_cart = guard.user_cart.clone().ok_or_else(missing_user_cart)?;
    (guard.app_state.clone(), user_cart)
  };

  let view = cart_service::resolve_cart(&app_state, &user_cart).await?;
  ctx_data.write().merged_view = Some(view);
  Ok(PipelineControl::Continue)
}
