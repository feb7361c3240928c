// storefront/src/services/auth_service.rs

//! Accounts and bearer sessions: password hashing, signup, signin, signout
//! and token authentication.

use crate::errors::AppError;
use crate::identity::generate_token;
use crate::models::{Session, User};
use crate::state::AppState;
use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use chrono::{Duration, Utc};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Hashes a plain-text password using Argon2 with a fresh random salt.
#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String, AppError> {
  if password.is_empty() {
    return Err(AppError::Validation("Password cannot be empty.".to_string()));
  }

  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|argon_err| {
      error!(error = %argon_err, "Argon2 password hashing failed.");
      AppError::Internal(format!("Password hashing process failed: {}", argon_err))
    })
}

/// Verifies a plain-text password against a stored Argon2 hash.
///
/// `Ok(false)` means the password does not match; errors are reserved for a
/// malformed stored hash or an internal Argon2 failure.
#[instrument(name = "auth_service::verify_password", skip_all, err(Display))]
pub fn verify_password(hashed_password: &str, provided_password: &str) -> Result<bool, AppError> {
  let parsed_hash = PasswordHash::new(hashed_password).map_err(|parse_err| {
    error!(error = %parse_err, "Failed to parse stored password hash string.");
    AppError::Internal(format!("Invalid stored password hash format: {}", parse_err))
  })?;

  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => {
      debug!("Password verification failed: passwords do not match.");
      Ok(false)
    }
    Err(other_argon_err) => {
      error!(error = %other_argon_err, "Argon2 password verification process encountered an error.");
      Err(AppError::Internal(format!(
        "Password verification process failed: {}",
        other_argon_err
      )))
    }
  }
}

fn normalize_email(email: &str) -> Result<String, AppError> {
  let email = email.trim().to_lowercase();
  match email.split_once('@') {
    Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
    _ => Err(AppError::Validation("A valid email is required".to_string())),
  }
}

#[instrument(name = "auth_service::signup", skip(state, password), err(Display))]
pub async fn signup(state: &AppState, email: &str, password: &str) -> Result<User, AppError> {
  let email = normalize_email(email)?;
  if password.chars().count() < MIN_PASSWORD_LEN {
    return Err(AppError::Validation(format!(
      "Password must be at least {} characters",
      MIN_PASSWORD_LEN
    )));
  }

  let now = Utc::now();
  let user = User {
    id: Uuid::new_v4(),
    email,
    password_hash: hash_password(password)?,
    created_at: now,
    updated_at: now,
  };
  state.store.insert_user(&user).await?;
  info!(user_id = %user.id, "User registered.");
  Ok(user)
}

/// Checks credentials and issues a new bearer session.
#[instrument(name = "auth_service::signin", skip(state, password), err(Display))]
pub async fn signin(state: &AppState, email: &str, password: &str) -> Result<(Session, User), AppError> {
  let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

  let email = normalize_email(email).map_err(|_| invalid())?;
  let user = state.store.find_user_by_email(&email).await?.ok_or_else(invalid)?;
  if !verify_password(&user.password_hash, password)? {
    warn!(user_id = %user.id, "Signin rejected: wrong password.");
    return Err(invalid());
  }

  let now = Utc::now();
  let session = Session {
    token: generate_token(),
    user_id: user.id,
    created_at: now,
    expires_at: now + Duration::hours(state.config.session_ttl_hours),
  };
  state.store.insert_session(&session).await?;
  info!(user_id = %user.id, expires_at = %session.expires_at, "Session issued.");
  Ok((session, user))
}

#[instrument(name = "auth_service::signout", skip_all, err(Display))]
pub async fn signout(state: &AppState, token: &str) -> Result<(), AppError> {
  state.store.delete_session(token).await?;
  Ok(())
}

/// The user behind a bearer token. Unknown and expired tokens yield `None`;
/// expired sessions are deleted on sight.
#[instrument(name = "auth_service::authenticate", skip_all, err(Display))]
pub async fn authenticate(state: &AppState, token: &str) -> Result<Option<User>, AppError> {
  let Some(session) = state.store.find_session(token).await? else {
    return Ok(None);
  };
  if session.is_expired_at(Utc::now()) {
    debug!(user_id = %session.user_id, "Session expired.");
    state.store.delete_session(token).await?;
    return Ok(None);
  }
  Ok(state.store.find_user(session.user_id).await?)
}
