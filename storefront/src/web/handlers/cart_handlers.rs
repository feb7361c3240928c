// storefront/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::errors::AppError;
use crate::services::cart_service::{self, CartView};
use crate::state::AppState;
use crate::web::extractors::{session_header, AuthenticatedUser, CartIdentity};

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartPayload {
  pub product_id: Option<String>,
  pub size: Option<String>,
  pub quantity: Option<i32>,
}

#[derive(Deserialize, Debug)]
pub struct UpdateItemPayload {
  pub quantity: Option<i32>,
}

fn cart_response(identity: &CartIdentity, message: Option<&str>, cart: CartView) -> HttpResponse {
  let mut body = json!({
      "success": true,
      "data": cart,
      "sessionId": identity.session_id(),
  });
  if let Some(message) = message {
    body["message"] = json!(message);
  }
  HttpResponse::Ok().json(body)
}

#[instrument(name = "handler::get_cart", skip_all)]
pub async fn get_cart_handler(
  app_state: web::Data<AppState>,
  identity: CartIdentity,
) -> Result<HttpResponse, AppError> {
  let cart = cart_service::get_cart(&app_state, &identity.key.owner).await?;
  Ok(cart_response(&identity, None, cart))
}

#[instrument(name = "handler::add_to_cart", skip(app_state, identity))]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  identity: CartIdentity,
  req_payload: web::Json<AddToCartPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  let (product_id, size) = match (payload.product_id, payload.size) {
    (Some(product_id), Some(size)) if !product_id.is_empty() && !size.is_empty() => (product_id, size),
    _ => return Err(AppError::Validation("Product ID and size are required".to_string())),
  };

  let cart = cart_service::add_item(
    &app_state,
    &identity.key.owner,
    &product_id,
    &size,
    payload.quantity.unwrap_or(1),
  )
  .await?;
  Ok(cart_response(&identity, Some("Item added to cart"), cart))
}

#[instrument(name = "handler::update_cart_item", skip(app_state, identity, path))]
pub async fn update_cart_item_handler(
  app_state: web::Data<AppState>,
  identity: CartIdentity,
  path: web::Path<String>,
  req_payload: web::Json<UpdateItemPayload>,
) -> Result<HttpResponse, AppError> {
  let cart = cart_service::update_item(&app_state, &identity.key.owner, &path, req_payload.quantity).await?;
  Ok(cart_response(&identity, Some("Cart item updated"), cart))
}

#[instrument(name = "handler::remove_cart_item", skip(app_state, identity))]
pub async fn remove_cart_item_handler(
  app_state: web::Data<AppState>,
  identity: CartIdentity,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let cart = cart_service::remove_item(&app_state, &identity.key.owner, &path).await?;
  Ok(cart_response(&identity, Some("Item removed from cart"), cart))
}

#[instrument(name = "handler::clear_cart", skip_all)]
pub async fn clear_cart_handler(
  app_state: web::Data<AppState>,
  identity: CartIdentity,
) -> Result<HttpResponse, AppError> {
  let cart = cart_service::clear_cart(&app_state, &identity.key.owner).await?;
  Ok(cart_response(&identity, Some("Cart cleared"), cart))
}

#[instrument(name = "handler::merge_carts", skip(app_state, req, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn merge_carts_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let guest_token = session_header(&req);
  let cart = cart_service::merge_carts(&app_state, auth_user.user_id, guest_token.as_deref()).await?;
  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "message": "Carts merged successfully",
      "data": cart,
  })))
}
