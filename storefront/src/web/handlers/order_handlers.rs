// storefront/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::instrument;

use crate::errors::AppError;
use crate::services::order_service;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[instrument(name = "handler::checkout", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn checkout_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let order = order_service::checkout(&app_state, auth_user.user_id).await?;
  Ok(HttpResponse::Created().json(json!({
      "success": true,
      "message": "Order created successfully",
      "data": order,
  })))
}

#[instrument(name = "handler::list_orders", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let orders = order_service::list_orders(&app_state, auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "count": orders.len(),
      "data": orders,
  })))
}

#[instrument(name = "handler::get_order", skip(app_state, auth_user, path), fields(user_id = %auth_user.user_id, order_id = %path.as_str()))]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let order = order_service::get_order(&app_state, auth_user.user_id, &path).await?;
  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "data": order,
  })))
}
