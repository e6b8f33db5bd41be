//! HTTP Basic authentication and the super-user write policy.
//!
//! Reads (`GET`, `HEAD`, `OPTIONS`) are open to everyone. Any other method
//! needs Basic credentials for a configured user with `super_user = true`.

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use axum::http::{HeaderMap, Method, header};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use camp_api::{ApiError, Authorize};
use serde::Deserialize;
use tracing::debug;

/// Salt for the throwaway hash computed when the username is unknown.
const DUMMY_SALT: &str = "Y2FtcHMtZHVtbXktc2FsdA";

/// A user allowed to authenticate against this server.
#[derive(Debug, Clone, Deserialize)]
pub struct UserConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
  #[serde(default)]
  pub super_user:    bool,
}

/// [`Authorize`] implementation requiring a super user for writes.
#[derive(Debug, Clone)]
pub struct SuperUserPolicy {
  users: Vec<UserConfig>,
}

impl SuperUserPolicy {
  pub fn new(users: Vec<UserConfig>) -> Self { Self { users } }

  /// Verify Basic credentials from `headers` and return the matching user.
  pub fn authenticate(&self, headers: &HeaderMap) -> Result<&UserConfig, ApiError> {
    let header_val = headers
      .get(header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .ok_or(ApiError::Unauthorized)?;

    let encoded = header_val
      .strip_prefix("Basic ")
      .ok_or(ApiError::Unauthorized)?;

    let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
    let creds   = std::str::from_utf8(&decoded).map_err(|_| ApiError::Unauthorized)?;

    let (username, password) = creds.split_once(':').ok_or(ApiError::Unauthorized)?;

    let Some(user) = self.users.iter().find(|u| u.username == username) else {
      // Unknown users cost one argon2 pass, same as a wrong password.
      burn_hash(password);
      return Err(ApiError::Unauthorized);
    };

    let parsed_hash = PasswordHash::new(&user.password_hash)
      .map_err(|_| ApiError::Unauthorized)?;

    Argon2::default()
      .verify_password(password.as_bytes(), &parsed_hash)
      .map_err(|_| ApiError::Unauthorized)?;

    Ok(user)
  }
}

fn burn_hash(password: &str) {
  if let Ok(salt) = SaltString::from_b64(DUMMY_SALT) {
    let _ = Argon2::default().hash_password(password.as_bytes(), &salt);
  }
}

fn is_read(method: &Method) -> bool {
  matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

impl Authorize for SuperUserPolicy {
  fn authorize(&self, method: &Method, headers: &HeaderMap) -> Result<(), ApiError> {
    if is_read(method) {
      return Ok(());
    }

    let user = self.authenticate(headers)?;
    if !user.super_user {
      debug!(username = %user.username, %method, "rejected: not a super user");
      return Err(ApiError::Forbidden);
    }
    Ok(())
  }
}
