//! Route handlers.

pub mod auth;
pub mod download;
pub mod health;
