//! Download routes: link minting, redemption, quota and history.

mod check_limit;
mod download_temp;
mod generate_link;
mod history;

pub use check_limit::check_limit;
pub use download_temp::download_temp;
pub use generate_link::generate_link;
pub use history::history;

use actix_web::HttpRequest;

/// Client IP for the download ledger, preferring proxy headers.
pub(crate) fn client_ip(req: &HttpRequest) -> Option<String> {
    if let Some(forwarded) = req.headers().get("X-Forwarded-For") {
        if let Ok(value) = forwarded.to_str() {
            if let Some(ip) = value.split(',').next() {
                return Some(ip.trim().to_string());
            }
        }
    }
    if let Some(real_ip) = req.headers().get("X-Real-IP") {
        if let Ok(value) = real_ip.to_str() {
            return Some(value.to_string());
        }
    }
    req.connection_info().peer_addr().map(|s| s.to_string())
}

pub(crate) fn user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("User-Agent")
        .and_then(|ua| ua.to_str().ok())
        .map(|s| s.to_string())
}
