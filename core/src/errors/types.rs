//! Error type definitions for authentication, download authorization and
//! input validation. HTTP status mapping happens in the presentation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Authentication and OTP lifecycle errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("No pending registration found for this email")]
    PendingRegistrationNotFound,

    #[error("OTP expired")]
    OtpExpired,

    #[error("Invalid OTP")]
    OtpMismatch,

    #[error("No reset request found for this email")]
    ResetRequestNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Account not verified")]
    AccountNotVerified,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Session expired")]
    SessionExpired,

    #[error("Invalid session token")]
    InvalidSessionToken,
}

/// Download token and quota errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DownloadError {
    #[error("Invalid or expired download link")]
    InvalidOrExpired,

    #[error("Download link belongs to another user")]
    OwnershipMismatch,

    #[error("Daily download limit reached ({count}/{limit})")]
    QuotaExceeded {
        count: u32,
        remaining: u32,
        limit: u32,
    },

    #[error("Post not found")]
    PostNotFound,

    #[error("No {kind} file attached to this post")]
    AttachmentMissing { kind: String },

    #[error("File not found on server")]
    FileMissing,
}

/// Input validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field: {field}")]
    RequiredField { field: String },

    #[error("Invalid format: {field}")]
    InvalidFormat { field: String },

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Invalid file type: {value}")]
    InvalidFileKind { value: String },
}

/// Unified error payload for API responses
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(error: impl ToString, message: impl ToString) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
        }
    }
}

impl From<&AuthError> for ErrorResponse {
    fn from(err: &AuthError) -> Self {
        let code = match err {
            AuthError::EmailAlreadyRegistered => "EMAIL_ALREADY_REGISTERED",
            AuthError::PendingRegistrationNotFound => "PENDING_REGISTRATION_NOT_FOUND",
            AuthError::OtpExpired => "OTP_EXPIRED",
            AuthError::OtpMismatch => "OTP_MISMATCH",
            AuthError::ResetRequestNotFound => "RESET_REQUEST_NOT_FOUND",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::AccountNotVerified => "ACCOUNT_NOT_VERIFIED",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::SessionExpired => "SESSION_EXPIRED",
            AuthError::InvalidSessionToken => "INVALID_SESSION_TOKEN",
        };
        ErrorResponse::new(code, err.to_string())
    }
}

impl From<&DownloadError> for ErrorResponse {
    fn from(err: &DownloadError) -> Self {
        let code = match err {
            DownloadError::InvalidOrExpired => "INVALID_OR_EXPIRED_LINK",
            DownloadError::OwnershipMismatch => "LINK_OWNERSHIP_MISMATCH",
            DownloadError::QuotaExceeded { .. } => "QUOTA_EXCEEDED",
            DownloadError::PostNotFound => "POST_NOT_FOUND",
            DownloadError::AttachmentMissing { .. } => "ATTACHMENT_MISSING",
            DownloadError::FileMissing => "FILE_MISSING",
        };
        ErrorResponse::new(code, err.to_string())
    }
}
