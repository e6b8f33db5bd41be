//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Persistence failures and unexpected store errors keep separate variants
//! but render the same per-operation `400` body, e.g.
//! `{"error":"create speaker error"}`.

use std::fmt;

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// The handler operation an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
  ListCamps,
  GetCamp,
  CreateCamp,
  UpdateCamp,
  DeleteCamp,
  ListSpeakers,
  GetSpeaker,
  CreateSpeaker,
  UpdateSpeaker,
  DeleteSpeaker,
}

impl fmt::Display for Operation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Operation::ListCamps => "list camps",
      Operation::GetCamp => "get camp",
      Operation::CreateCamp => "create camp",
      Operation::UpdateCamp => "update camp",
      Operation::DeleteCamp => "delete camp",
      Operation::ListSpeakers => "list speakers",
      Operation::GetSpeaker => "get speaker",
      Operation::CreateSpeaker => "create speaker",
      Operation::UpdateSpeaker => "update speaker",
      Operation::DeleteSpeaker => "delete speaker",
    })
  }
}

/// An error returned by an API handler or the authorization layer.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  /// The speaker exists but belongs to a different camp than the path names.
  #[error("Speaker not in specified camp")]
  ScopeMismatch,

  #[error("{0}")]
  BadRequest(String),

  #[error("unauthorized")]
  Unauthorized,

  #[error("forbidden")]
  Forbidden,

  /// The commit succeeded but touched no rows.
  #[error("{op}: nothing was persisted")]
  NotPersisted { op: Operation },

  #[error("{op}: {source}")]
  Store {
    op:     Operation,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ApiError {
  pub fn store<E>(op: Operation, e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    ApiError::Store { op, source: Box::new(e) }
  }
}

impl From<camp_core::Error> for ApiError {
  fn from(e: camp_core::Error) -> Self { ApiError::BadRequest(e.to_string()) }
}

impl From<JsonRejection> for ApiError {
  fn from(r: JsonRejection) -> Self { ApiError::BadRequest(r.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(r: QueryRejection) -> Self { ApiError::BadRequest(r.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(r: PathRejection) -> Self { ApiError::BadRequest(r.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::ScopeMismatch => (StatusCode::BAD_REQUEST, self.to_string()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unauthorized => {
        let mut res = (StatusCode::UNAUTHORIZED, Json(json!({ "error": "unauthorized" })))
          .into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"camps\""),
        );
        return res;
      }
      ApiError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
      ApiError::NotPersisted { op } => {
        warn!(operation = %op, "could not save changes");
        (StatusCode::BAD_REQUEST, format!("{op} error"))
      }
      ApiError::Store { op, source } => {
        error!(operation = %op, error = %source, "{op} failed");
        (StatusCode::BAD_REQUEST, format!("{op} error"))
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
