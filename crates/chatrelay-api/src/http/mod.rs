//! HTTP API layer for chatrelay.
//!
//! Axum-based JSON API with permissive CORS and request tracing.

pub mod error;
pub mod handlers;
pub mod router;
