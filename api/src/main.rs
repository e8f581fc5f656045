use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenvy::dotenv;
use log::info;
use std::sync::Arc;

use vault_api::config::{ApiConfig, SessionSettings};
use vault_api::{app, handlers};
use vault_core::services::{
    AuthService, DownloadService, JwtConfig, MemoryPendingStore, MemoryResetStore,
    MemoryTokenStore, PasswordResetService, RegistrationService, TokenSweeper,
};
use vault_core::DownloadConfig;
use vault_infra::database::{
    create_pool, MySqlDownloadRepository, MySqlPostRepository, MySqlUserRepository,
};
use vault_infra::mail::{ResendConfig, ResendMailer};
use vault_infra::storage::LocalFileStore;

fn config_error(message: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, message)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ApiConfig::from_env().map_err(config_error)?;
    info!("Starting Vault01 API on {}", config.bind_address());

    let pool = create_pool(&config.database_url)
        .await
        .map_err(|e| config_error(e.to_string()))?;

    // Persistent state
    let users = Arc::new(MySqlUserRepository::new(pool.clone()));
    let posts = Arc::new(MySqlPostRepository::new(pool.clone()));
    let ledger = Arc::new(MySqlDownloadRepository::new(pool.clone()));

    // Ephemeral state lives for the process lifetime
    let pending = Arc::new(MemoryPendingStore::new());
    let resets = Arc::new(MemoryResetStore::new());
    let tokens = Arc::new(MemoryTokenStore::new());

    let mailer = Arc::new(ResendMailer::new(
        ResendConfig::from_env().map_err(|e| config_error(e.to_string()))?,
    ));
    let files = Arc::new(LocalFileStore::new(config.storage_root.clone()));

    let download_config = DownloadConfig::default();

    let registration = Arc::new(RegistrationService::new(
        users.clone(),
        pending.clone(),
        mailer.clone(),
    ));
    let auth = Arc::new(AuthService::new(
        users.clone(),
        JwtConfig::new(config.jwt_secret.clone()),
    ));
    let password_reset = Arc::new(PasswordResetService::new(
        users.clone(),
        resets.clone(),
        mailer.clone(),
    ));
    let downloads = Arc::new(DownloadService::new(
        posts,
        ledger,
        tokens.clone(),
        files,
        download_config.clone(),
    ));

    let sweeper = Arc::new(TokenSweeper::new(
        tokens,
        download_config.sweep_interval_seconds,
    ));
    sweeper.start_background_task();

    let session = SessionSettings {
        cookie_secure: config.cookie_secure,
        session_hours: 1,
    };
    let jwt_secret = config.jwt_secret.clone();
    let bind_address = config.bind_address();

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::from(registration.clone()))
            .app_data(web::Data::from(auth.clone()))
            .app_data(web::Data::from(password_reset.clone()))
            .app_data(web::Data::from(downloads.clone()))
            .app_data(web::Data::new(session.clone()))
            .configure(|cfg| {
                app::configure::<
                    MySqlUserRepository,
                    MemoryPendingStore,
                    MemoryResetStore,
                    ResendMailer,
                    MySqlPostRepository,
                    MySqlDownloadRepository,
                    MemoryTokenStore,
                    LocalFileStore,
                >(cfg, &jwt_secret)
            })
            .default_service(web::route().to(handlers::not_found))
    })
    .bind(&bind_address)?
    .run()
    .await
}
