//! Core types and trait definitions for the Code Camp API.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! storage backend (`camp-store-sqlite`) and the HTTP layer (`camp-api`) both
//! depend on it.

pub mod camp;
pub mod error;
pub mod repository;
pub mod speaker;

pub use error::{Error, Result};
