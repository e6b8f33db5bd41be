//! JSON REST API for camps and their speakers.
//!
//! Exposes an axum [`Router`] backed by any
//! [`camp_core::repository::CampRepository`]. TLS and transport concerns are
//! the caller's responsibility; authorization is supplied through
//! [`auth::Authorize`].
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", camp_api::api_router(state))
//! ```

pub mod auth;
pub mod camps;
pub mod error;
pub mod extract;
pub mod mapper;
pub mod models;
pub mod speakers;

use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use camp_core::repository::{CampRepository, Commit, UnitOfWork};

pub use auth::{AllowAll, Authorize};
pub use error::{ApiError, Operation};
pub use mapper::Mapper;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<R> {
  pub repo:       Arc<R>,
  pub mapper:     Arc<Mapper>,
  pub authorizer: Arc<dyn Authorize>,
}

impl<R> ApiState<R> {
  pub fn new(repo: Arc<R>, mapper: Mapper, authorizer: Arc<dyn Authorize>) -> Self {
    Self { repo, mapper: Arc::new(mapper), authorizer }
  }
}

impl<R> Clone for ApiState<R> {
  fn clone(&self) -> Self {
    Self {
      repo:       self.repo.clone(),
      mapper:     self.mapper.clone(),
      authorizer: self.authorizer.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type. `PUT` and `PATCH` are interchangeable on both
/// resources.
pub fn api_router<R>(state: ApiState<R>) -> Router<()>
where
  R: CampRepository + 'static,
{
  Router::new()
    // Camps
    .route("/camps", get(camps::list::<R>).post(camps::create::<R>))
    .route(
      "/camps/{camp}",
      get(camps::get_one::<R>)
        .put(camps::update::<R>)
        .patch(camps::update::<R>)
        .delete(camps::delete::<R>),
    )
    // Speakers, scoped by camp moniker
    .route("/camps/{camp}/speakers", get(speakers::list::<R>).post(speakers::create::<R>))
    .route(
      "/camps/{camp}/speakers/{id}",
      get(speakers::get_one::<R>)
        .put(speakers::update::<R>)
        .patch(speakers::update::<R>)
        .delete(speakers::delete::<R>),
    )
    .route_layer(middleware::from_fn_with_state(
      state.clone(),
      auth::require_authorization::<R>,
    ))
    .with_state(state)
}

// ─── Shared helpers ───────────────────────────────────────────────────────────

/// Commit `work`, treating "nothing persisted" as a failure of `op`.
pub(crate) async fn commit_work<R>(
  repo: &R,
  work: UnitOfWork,
  op: Operation,
) -> Result<Commit, ApiError>
where
  R: CampRepository,
{
  let commit = repo.commit(work).await.map_err(|e| ApiError::store(op, e))?;
  if !commit.persisted() {
    return Err(ApiError::NotPersisted { op });
  }
  Ok(commit)
}

#[cfg(test)]
mod tests;
