//! # Vault01 API
//!
//! HTTP layer: route handlers, request DTOs, the session cookie
//! middleware and error-to-status mapping. The binary in `main.rs` wires
//! the concrete MySQL / Resend / local-disk implementations; integration
//! tests wire the in-memory ones.

pub mod app;
pub mod config;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
