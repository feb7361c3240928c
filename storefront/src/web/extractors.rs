// storefront/src/web/extractors.rs

//! Request identity: bearer authentication and cart identity resolution.

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::identity::{self, CartIdentityKey};
use crate::services::auth_service;
use crate::state::AppState;

pub const SESSION_HEADER: &str = "x-session-id";

/// The token from `Authorization: Bearer <token>`, if any.
pub fn bearer_token(req: &HttpRequest) -> Option<String> {
  req
    .headers()
    .get(AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Bearer ")
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(str::to_string)
}

/// The guest token from the `x-session-id` header, if any.
pub fn session_header(req: &HttpRequest) -> Option<String> {
  req
    .headers()
    .get(SESSION_HEADER)
    .and_then(|v| v.to_str().ok())
    .map(str::to_string)
}

fn app_state(req: &HttpRequest) -> Result<web::Data<AppState>, AppError> {
  req
    .app_data::<web::Data<AppState>>()
    .cloned()
    .ok_or_else(|| AppError::Config("AppState is not registered with the application".to_string()))
}

/// A caller holding a valid, unexpired bearer session. Rejects with 401
/// otherwise.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
  pub user_id: Uuid,
  pub token: String,
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let token = bearer_token(req);
    let state = app_state(req);

    Box::pin(async move {
      let state = state?;
      let unauthorized = || AppError::Unauthorized("User must be authenticated".to_string());
      let token = token.ok_or_else(unauthorized)?;
      let user = auth_service::authenticate(&state, &token).await?.ok_or_else(unauthorized)?;
      Ok(AuthenticatedUser {
        user_id: user.id,
        token,
      })
    })
  }
}

/// Which cart the request addresses. Authentication is optional here: a bad
/// or expired bearer token falls back to the guest path.
#[derive(Debug, Clone)]
pub struct CartIdentity {
  pub key: CartIdentityKey,
}

impl CartIdentity {
  pub fn session_id(&self) -> Option<&str> {
    self.key.session_id()
  }
}

impl FromRequest for CartIdentity {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let token = bearer_token(req);
    let session = session_header(req);
    let state = app_state(req);

    Box::pin(async move {
      let state = state?;
      let user_id = match token {
        Some(token) => match auth_service::authenticate(&state, &token).await {
          Ok(user) => user.map(|u| u.id),
          Err(e) => {
            warn!(error = %e, "Bearer lookup failed, continuing as guest.");
            None
          }
        },
        None => None,
      };

      let key = identity::resolve(user_id, session.as_deref());
      if key.issued {
        debug!("Issued a new guest session token.");
      }
      Ok(CartIdentity { key })
    })
  }
}
