// storefront/src/identity.rs

//! Resolves which cart a request operates on.

use crate::models::CartOwner;
use rand_core::{OsRng, RngCore};
use uuid::Uuid;

const TOKEN_BYTES: usize = 32;

/// The cart key for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartIdentityKey {
  pub owner: CartOwner,
  /// True when a fresh guest token was generated for this request and has to
  /// be echoed back to the client.
  pub issued: bool,
}

impl CartIdentityKey {
  /// Value of the `sessionId` field in cart responses; `None` for users.
  pub fn session_id(&self) -> Option<&str> {
    self.owner.session_id()
  }
}

/// An authenticated user wins; otherwise the supplied guest token is used, or
/// a new one is issued when it is missing or blank.
pub fn resolve(user_id: Option<Uuid>, session_token: Option<&str>) -> CartIdentityKey {
  if let Some(id) = user_id {
    return CartIdentityKey {
      owner: CartOwner::User(id),
      issued: false,
    };
  }

  match session_token.map(str::trim).filter(|t| !t.is_empty()) {
    Some(token) => CartIdentityKey {
      owner: CartOwner::Guest(token.to_string()),
      issued: false,
    },
    None => CartIdentityKey {
      owner: CartOwner::Guest(generate_token()),
      issued: true,
    },
  }
}

/// 32 bytes from the OS CSPRNG, hex encoded. Used for guest and bearer tokens.
pub fn generate_token() -> String {
  let mut bytes = [0u8; TOKEN_BYTES];
  OsRng.fill_bytes(&mut bytes);
  hex::encode(bytes)
}
