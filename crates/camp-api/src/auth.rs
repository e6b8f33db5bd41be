//! Pluggable authorization, evaluated before any handler runs.
//!
//! Handlers never check policy themselves; the router wraps every route in
//! [`require_authorization`], which defers to the [`Authorize`] predicate
//! held in [`ApiState`].

use axum::{
  extract::{Request, State},
  http::{HeaderMap, Method},
  middleware::Next,
  response::{IntoResponse, Response},
};
use camp_core::repository::CampRepository;

use crate::{ApiState, error::ApiError};

/// Decides whether a request may reach its handler.
///
/// Return [`ApiError::Unauthorized`] when credentials are missing or invalid
/// and [`ApiError::Forbidden`] when they are valid but insufficient.
pub trait Authorize: Send + Sync + 'static {
  fn authorize(&self, method: &Method, headers: &HeaderMap) -> Result<(), ApiError>;
}

/// Lets every request through.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Authorize for AllowAll {
  fn authorize(&self, _: &Method, _: &HeaderMap) -> Result<(), ApiError> { Ok(()) }
}

/// Middleware applying `state.authorizer` to the incoming request.
pub async fn require_authorization<R>(
  State(state): State<ApiState<R>>,
  req: Request,
  next: Next,
) -> Response
where
  R: CampRepository + 'static,
{
  match state.authorizer.authorize(req.method(), req.headers()) {
    Ok(()) => next.run(req).await,
    Err(e) => e.into_response(),
  }
}
