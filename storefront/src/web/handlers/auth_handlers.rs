// storefront/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::services::auth_service;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct CredentialsPayload {
  pub email: String,
  pub password: String,
}

#[instrument(name = "handler::signup", skip(app_state, req_payload), fields(req_email = %req_payload.email))]
pub async fn signup_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CredentialsPayload>,
) -> Result<HttpResponse, AppError> {
  let user = auth_service::signup(&app_state, &req_payload.email, &req_payload.password).await?;
  Ok(HttpResponse::Created().json(json!({
      "success": true,
      "message": "User created successfully",
      "data": user,
  })))
}

#[instrument(name = "handler::signin", skip(app_state, req_payload), fields(req_email = %req_payload.email))]
pub async fn signin_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CredentialsPayload>,
) -> Result<HttpResponse, AppError> {
  let (session, user) = auth_service::signin(&app_state, &req_payload.email, &req_payload.password).await?;
  info!(user_id = %user.id, "Signin successful.");
  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "token": session.token,
      "expiresAt": session.expires_at,
      "user": user,
  })))
}

#[instrument(name = "handler::signout", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn signout_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  auth_service::signout(&app_state, &auth_user.token).await?;
  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "message": "Signed out",
  })))
}
