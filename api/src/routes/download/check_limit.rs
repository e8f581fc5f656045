use actix_web::{web, HttpResponse};

use vault_core::repositories::{DownloadRepository, PostRepository};
use vault_core::services::{DownloadService, FileStore, TokenStore};

use crate::dto::download::CheckLimitResponse;
use crate::handlers::error_response;
use crate::middleware::AuthContext;

/// Handler for GET /check-limit
pub async fn check_limit<P, D, T, F>(
    auth: AuthContext,
    service: web::Data<DownloadService<P, D, T, F>>,
) -> HttpResponse
where
    P: PostRepository + 'static,
    D: DownloadRepository + 'static,
    T: TokenStore + 'static,
    F: FileStore + 'static,
{
    match service.quota().check_daily_limit(auth.user_id).await {
        Ok(status) => HttpResponse::Ok().json(CheckLimitResponse {
            count: status.count,
            remaining: status.remaining,
            limit_reached: status.limit_reached,
            limit: service.quota().limit(),
        }),
        Err(e) => error_response(&e),
    }
}
