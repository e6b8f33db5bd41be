//! HTTP server wiring for the Code Camp API.
//!
//! Combines the [`camp_api`] router, the SQLite repository, and the
//! super-user authorization policy into one axum [`Router`].

pub mod auth;
pub mod seed;

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use camp_api::{ApiState, Mapper};
use camp_core::repository::CampRepository;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

pub use auth::{SuperUserPolicy, UserConfig};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` overlaid
/// with `CAMPS_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  /// Public origin used to build `Location` headers and resource URLs.
  pub base_url:   String,
  pub store_path: PathBuf,
  /// Insert sample data when the store is empty.
  #[serde(default)]
  pub seed:       bool,
  #[serde(default)]
  pub users:      Vec<UserConfig>,
}

impl ServerConfig {
  /// URL the API router is mounted at.
  pub fn api_url(&self) -> String { format!("{}/api", self.base_url.trim_end_matches('/')) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router: the API under `/api`, guarded by
/// [`SuperUserPolicy`], with request tracing.
pub fn router<R>(config: &ServerConfig, repo: Arc<R>) -> Router
where
  R: CampRepository + 'static,
{
  let state = ApiState::new(
    repo,
    Mapper::new(config.api_url()),
    Arc::new(SuperUserPolicy::new(config.users.clone())),
  );

  Router::new()
    .nest("/api", camp_api::api_router(state))
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────
