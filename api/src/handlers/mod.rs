//! Shared handler plumbing.

pub mod error;

pub use error::{error_response, validation_failure};

use actix_web::HttpResponse;

/// Default 404 handler.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "success": false,
        "error": "NOT_FOUND",
        "message": "The requested resource was not found"
    }))
}
