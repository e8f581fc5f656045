use actix_files::NamedFile;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpRequest, HttpResponse};

use vault_core::errors::DownloadError;
use vault_core::repositories::{DownloadRepository, PostRepository};
use vault_core::services::{DownloadService, FileStore, TokenStore};

use crate::handlers::error_response;
use crate::middleware::AuthContext;

use super::{client_ip, user_agent};

/// Handler for GET /download-temp/{token}
///
/// Redeems the token and streams the attachment. The token is consumed
/// even when the client aborts the transfer mid-stream.
pub async fn download_temp<P, D, T, F>(
    req: HttpRequest,
    auth: AuthContext,
    service: web::Data<DownloadService<P, D, T, F>>,
    path: web::Path<String>,
) -> HttpResponse
where
    P: PostRepository + 'static,
    D: DownloadRepository + 'static,
    T: TokenStore + 'static,
    F: FileStore + 'static,
{
    let token = path.into_inner();
    let ip = client_ip(&req);
    let ua = user_agent(&req);

    let redeemed = match service.redeem(&token, auth.user_id, ip, ua).await {
        Ok(file) => file,
        Err(e) => return error_response(&e),
    };

    match NamedFile::open_async(&redeemed.path).await {
        Ok(named) => named
            .set_content_disposition(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(redeemed.file_name)],
            })
            .into_response(&req),
        Err(e) => {
            // The store resolved the path moments ago; losing the file
            // here means it was removed in between.
            log::error!(
                "Resolved file vanished before streaming: {} ({})",
                redeemed.path.display(),
                e
            );
            error_response(&DownloadError::FileMissing.into())
        }
    }
}
