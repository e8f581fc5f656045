//! # Vault01 Core
//!
//! Core business logic and domain layer for the Vault01 backend.
//! This crate contains domain entities, business services, repository and
//! store interfaces, and error types that form the foundation of the
//! application architecture.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{
    DownloadRecord, DownloadToken, FileKind, PasswordResetRequest, PendingRegistration, Post,
    PostStatus, User, UserRole,
};
pub use errors::{
    AuthError, DomainError, DomainResult, DownloadError, ErrorResponse, ValidationError,
};
pub use repositories::{DownloadRepository, PostRepository, UserRepository};
pub use services::{
    AuthService, Claims, DownloadConfig, DownloadService, JwtConfig, Mailer,
    PasswordResetService, QuotaStatus, QuotaTracker, QuotaWindow, RegistrationService,
    TokenSweeper,
};
