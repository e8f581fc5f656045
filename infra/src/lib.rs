//! # Vault01 Infrastructure
//!
//! Concrete adapters behind the core interfaces: MySQL-backed
//! repositories, the Resend mail provider, and local-disk file storage.

pub mod database;
pub mod mail;
pub mod storage;

use thiserror::Error;

/// Infrastructure-level errors
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Mail delivery error: {0}")]
    Mail(String),
}
