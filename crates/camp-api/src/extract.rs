//! Extractors whose rejections render as [`ApiError`], so a malformed body,
//! query string or path segment gets the same `{"error": ..}` shape as every
//! other failure.

use axum::extract::{FromRequest, FromRequestParts};
use serde::{Deserialize, Deserializer, de};

use crate::error::ApiError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Accept `true`/`false` in any letter case. An empty value is `false`.
pub(crate) fn lenient_bool<'de, D>(d: D) -> Result<bool, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = String::deserialize(d)?;
  match raw.trim().to_ascii_lowercase().as_str() {
    "true" => Ok(true),
    "false" | "" => Ok(false),
    _ => Err(de::Error::invalid_value(de::Unexpected::Str(&raw), &"true or false")),
  }
}
