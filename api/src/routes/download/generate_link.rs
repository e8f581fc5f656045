use actix_web::{web, HttpResponse};
use uuid::Uuid;

use vault_core::errors::DomainError;
use vault_core::repositories::{DownloadRepository, PostRepository};
use vault_core::services::{DownloadService, FileStore, TokenStore};
use vault_core::FileKind;

use crate::dto::download::GenerateLinkResponse;
use crate::handlers::error_response;
use crate::middleware::AuthContext;

/// Handler for GET /generate-link/{post_id}/{kind}
///
/// Mints a single-use download link for the authenticated caller.
pub async fn generate_link<P, D, T, F>(
    auth: AuthContext,
    service: web::Data<DownloadService<P, D, T, F>>,
    path: web::Path<(String, String)>,
) -> HttpResponse
where
    P: PostRepository + 'static,
    D: DownloadRepository + 'static,
    T: TokenStore + 'static,
    F: FileStore + 'static,
{
    let (post_id, kind) = path.into_inner();

    let post_id = match Uuid::parse_str(&post_id) {
        Ok(id) => id,
        Err(_) => {
            return error_response(&DomainError::Validation {
                message: "Invalid post id".to_string(),
            })
        }
    };
    let kind = match kind.parse::<FileKind>() {
        Ok(k) => k,
        Err(e) => return error_response(&e.into()),
    };

    match service.mint(auth.user_id, post_id, kind).await {
        Ok(minted) => HttpResponse::Ok().json(GenerateLinkResponse::from_minted(&minted, kind)),
        Err(e) => error_response(&e),
    }
}
