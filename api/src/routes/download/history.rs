use actix_web::{web, HttpResponse};

use vault_core::repositories::{DownloadRepository, PostRepository};
use vault_core::services::{DownloadService, FileStore, TokenStore};

use crate::dto::download::{HistoryEntry, HistoryResponse};
use crate::handlers::error_response;
use crate::middleware::AuthContext;

/// Most recent ledger entries returned per request
const HISTORY_LIMIT: u32 = 50;

/// Handler for GET /history
pub async fn history<P, D, T, F>(
    auth: AuthContext,
    service: web::Data<DownloadService<P, D, T, F>>,
) -> HttpResponse
where
    P: PostRepository + 'static,
    D: DownloadRepository + 'static,
    T: TokenStore + 'static,
    F: FileStore + 'static,
{
    match service.quota().history(auth.user_id, HISTORY_LIMIT).await {
        Ok(records) => HttpResponse::Ok().json(HistoryResponse {
            success: true,
            downloads: records.iter().map(HistoryEntry::from).collect(),
        }),
        Err(e) => error_response(&e),
    }
}
