//! Maps domain errors to HTTP responses.
//!
//! Every error body carries `{"success": false, "error": CODE,
//! "message": ...}`. Internal detail never reaches the wire; it is
//! logged and replaced with a generic message.

use actix_web::HttpResponse;
use serde_json::json;
use validator::ValidationErrors;

use vault_core::errors::{AuthError, DomainError, DownloadError, ErrorResponse};

fn body(code: &str, message: &str) -> serde_json::Value {
    json!({
        "success": false,
        "error": code,
        "message": message,
    })
}

/// Converts a domain error into its HTTP response.
pub fn error_response(err: &DomainError) -> HttpResponse {
    match err {
        DomainError::Validation { message } => {
            HttpResponse::BadRequest().json(body("VALIDATION_ERROR", message))
        }
        DomainError::ValidationErr(e) => {
            HttpResponse::BadRequest().json(body("VALIDATION_ERROR", &e.to_string()))
        }
        DomainError::NotFound { resource } => HttpResponse::NotFound().json(body(
            "NOT_FOUND",
            &format!("{} not found", resource),
        )),
        DomainError::Unauthorized => {
            HttpResponse::Unauthorized().json(body("UNAUTHORIZED", "Authentication required"))
        }
        DomainError::Conflict { field } => HttpResponse::Conflict().json(body(
            "CONFLICT",
            &format!("Duplicate value for {}", field),
        )),
        DomainError::Internal { message } => {
            log::error!("Internal error: {}", message);
            HttpResponse::InternalServerError()
                .json(body("INTERNAL_ERROR", "Internal server error"))
        }
        DomainError::Auth(e) => auth_error_response(e),
        DomainError::Download(e) => download_error_response(e),
    }
}

fn auth_error_response(err: &AuthError) -> HttpResponse {
    let payload = ErrorResponse::from(err);
    let body = body(&payload.error, &payload.message);
    match err {
        AuthError::EmailAlreadyRegistered => HttpResponse::Conflict().json(body),
        AuthError::PendingRegistrationNotFound
        | AuthError::OtpExpired
        | AuthError::OtpMismatch
        | AuthError::ResetRequestNotFound => HttpResponse::BadRequest().json(body),
        AuthError::UserNotFound
        | AuthError::AccountNotVerified
        | AuthError::InvalidCredentials
        | AuthError::SessionExpired
        | AuthError::InvalidSessionToken => HttpResponse::Unauthorized().json(body),
    }
}

fn download_error_response(err: &DownloadError) -> HttpResponse {
    let payload = ErrorResponse::from(err);
    match err {
        // Invalid, expired and foreign tokens all look the same to the
        // caller.
        DownloadError::InvalidOrExpired | DownloadError::OwnershipMismatch => {
            HttpResponse::Forbidden().json(body(&payload.error, &payload.message))
        }
        DownloadError::QuotaExceeded {
            count, remaining, ..
        } => HttpResponse::TooManyRequests().json(json!({
            "success": false,
            "error": payload.error,
            "message": payload.message,
            "downloadCount": count,
            "remaining": remaining,
        })),
        DownloadError::PostNotFound
        | DownloadError::AttachmentMissing { .. }
        | DownloadError::FileMissing => {
            HttpResponse::NotFound().json(body(&payload.error, &payload.message))
        }
    }
}

/// Converts `validator` derive failures into a 400 response.
pub fn validation_failure(errors: &ValidationErrors) -> HttpResponse {
    let message = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .next()
        .unwrap_or_else(|| "Invalid request data".to_string());
    HttpResponse::BadRequest().json(body("VALIDATION_ERROR", &message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_quota_exceeded_maps_to_429() {
        let err = DomainError::Download(DownloadError::QuotaExceeded {
            count: 5,
            remaining: 0,
            limit: 5,
        });
        assert_eq!(error_response(&err).status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_internal_detail_not_leaked() {
        let err = DomainError::Internal {
            message: "connection refused to db:3306".to_string(),
        };
        let resp = error_response(&err);
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_token_errors_map_to_403() {
        let invalid = DomainError::Download(DownloadError::InvalidOrExpired);
        let foreign = DomainError::Download(DownloadError::OwnershipMismatch);
        assert_eq!(error_response(&invalid).status(), StatusCode::FORBIDDEN);
        assert_eq!(error_response(&foreign).status(), StatusCode::FORBIDDEN);
    }
}
