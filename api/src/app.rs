//! Route table.
//!
//! Generic over the repository/store/mailer implementations so the
//! binary wires MySQL + Resend + local disk while integration tests wire
//! the in-memory versions. The caller registers the matching service
//! instances as app data before applying this configuration.

use actix_web::{http::StatusCode, web};

use vault_core::repositories::{DownloadRepository, PostRepository, UserRepository};
use vault_core::services::{FileStore, Mailer, PendingStore, ResetStore, TokenStore};

use crate::middleware::SessionAuth;
use crate::routes;

pub fn configure<U, P, R, M, Po, D, T, F>(cfg: &mut web::ServiceConfig, jwt_secret: &str)
where
    U: UserRepository + 'static,
    P: PendingStore + 'static,
    R: ResetStore + 'static,
    M: Mailer + 'static,
    Po: PostRepository + 'static,
    D: DownloadRepository + 'static,
    T: TokenStore + 'static,
    F: FileStore + 'static,
{
    cfg.route("/health", web::get().to(routes::health::health_check))
        .route("/register", web::post().to(routes::auth::register::<U, P, M>))
        .route("/verify", web::post().to(routes::auth::verify::<U, P, M>))
        .route("/login", web::post().to(routes::auth::login::<U>))
        .route("/logout", web::post().to(routes::auth::logout))
        .route(
            "/forgot-password",
            web::post().to(routes::auth::forgot_password::<U, R, M>),
        )
        .route(
            "/reset-password",
            web::post().to(routes::auth::reset_password::<U, R, M>),
        )
        .service(
            // Redemption groups a missing session under 403 with the other
            // link failures; everything else answers 401.
            web::scope("/download-temp")
                .wrap(
                    SessionAuth::new(jwt_secret.to_string())
                        .denied_status(StatusCode::FORBIDDEN),
                )
                .route(
                    "/{token}",
                    web::get().to(routes::download::download_temp::<Po, D, T, F>),
                ),
        )
        .service(
            web::scope("")
                .wrap(SessionAuth::new(jwt_secret.to_string()))
                .route(
                    "/generate-link/{post_id}/{kind}",
                    web::get().to(routes::download::generate_link::<Po, D, T, F>),
                )
                .route(
                    "/check-limit",
                    web::get().to(routes::download::check_limit::<Po, D, T, F>),
                )
                .route(
                    "/history",
                    web::get().to(routes::download::history::<Po, D, T, F>),
                ),
        );
}
