//! End-to-end HTTP tests for the download flow, wired against the
//! in-memory implementations and a real temporary storage directory.

use actix_web::cookie::Cookie;
use actix_web::{test, web, App};
use chrono::{Duration, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

use vault_api::app;
use vault_api::config::SessionSettings;
use vault_core::repositories::{
    MockDownloadRepository, MockPostRepository, MockUserRepository,
};
use vault_core::services::mailer::MockMailer;
use vault_core::services::{
    AuthService, DownloadService, JwtConfig, MemoryPendingStore, MemoryResetStore,
    MemoryTokenStore, PasswordResetService, RegistrationService,
};
use vault_core::{DownloadConfig, DownloadRecord, FileKind, Post, PostStatus, User};
use vault_infra::storage::LocalFileStore;

type Registration = RegistrationService<MockUserRepository, MemoryPendingStore, MockMailer>;
type Auth = AuthService<MockUserRepository>;
type Reset = PasswordResetService<MockUserRepository, MemoryResetStore, MockMailer>;
type Downloads =
    DownloadService<MockPostRepository, MockDownloadRepository, MemoryTokenStore, LocalFileStore>;

struct Harness {
    users: Arc<MockUserRepository>,
    posts: Arc<MockPostRepository>,
    ledger: Arc<MockDownloadRepository>,
    mailer: Arc<MockMailer>,
    registration: Arc<Registration>,
    auth: Arc<Auth>,
    password_reset: Arc<Reset>,
    downloads: Arc<Downloads>,
    secret: String,
    storage: TempDir,
}

impl Harness {
    fn new() -> Self {
        let storage = TempDir::new().unwrap();
        let secret = "integration-test-secret".to_string();

        let users = Arc::new(MockUserRepository::new());
        let posts = Arc::new(MockPostRepository::new());
        let ledger = Arc::new(MockDownloadRepository::new());
        let pending = Arc::new(MemoryPendingStore::new());
        let resets = Arc::new(MemoryResetStore::new());
        let tokens = Arc::new(MemoryTokenStore::new());
        let mailer = Arc::new(MockMailer::new());
        let files = Arc::new(LocalFileStore::new(storage.path()));

        let registration = Arc::new(RegistrationService::new(
            users.clone(),
            pending,
            mailer.clone(),
        ));
        let auth = Arc::new(AuthService::new(
            users.clone(),
            JwtConfig::new(secret.clone()),
        ));
        let password_reset = Arc::new(PasswordResetService::new(
            users.clone(),
            resets,
            mailer.clone(),
        ));
        let downloads = Arc::new(DownloadService::new(
            posts.clone(),
            ledger.clone(),
            tokens,
            files,
            DownloadConfig::default(),
        ));

        Self {
            users,
            posts,
            ledger,
            mailer,
            registration,
            auth,
            password_reset,
            downloads,
            secret,
            storage,
        }
    }

    /// Seeds a verified user and mints a session cookie for them.
    async fn seed_user(&self, email: &str) -> (User, Cookie<'static>) {
        let user = User::from_verified_registration(
            "Test User".to_string(),
            email.to_string(),
            bcrypt::hash("password-123", 4).unwrap(),
        );
        self.users.insert(user.clone()).await;
        let token = self.auth.issue_session(&user).unwrap();
        (user, Cookie::new("auth_token", token))
    }

    /// Creates a post with a real PDF file under the storage root.
    async fn seed_post_with_pdf(&self, relative: &str, content: &[u8]) -> Post {
        let full: PathBuf = self.storage.path().join(relative);
        std::fs::create_dir_all(full.parent().unwrap()).unwrap();
        std::fs::write(&full, content).unwrap();

        let post = Post {
            id: Uuid::new_v4(),
            title: "Guide".to_string(),
            slug: "guide".to_string(),
            status: PostStatus::Published,
            pdf_path: Some(relative.to_string()),
            zip_path: None,
            created_at: Utc::now(),
        };
        self.posts.insert(post.clone()).await;
        post
    }

    /// Seeds `n` ledger entries for today.
    async fn seed_downloads_today(&self, user_id: Uuid, post_id: Uuid, n: u32) {
        for i in 0..n {
            let record = DownloadRecord::new(
                user_id,
                post_id,
                FileKind::Pdf,
                "earlier.pdf".to_string(),
                None,
                None,
            );
            self.ledger
                .insert_at(record, Utc::now() - Duration::minutes(i as i64 + 1))
                .await;
        }
    }
}

macro_rules! init_app {
    ($h:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::from($h.registration.clone()))
                .app_data(web::Data::from($h.auth.clone()))
                .app_data(web::Data::from($h.password_reset.clone()))
                .app_data(web::Data::from($h.downloads.clone()))
                .app_data(web::Data::new(SessionSettings::default()))
                .configure(|cfg| {
                    app::configure::<
                        MockUserRepository,
                        MemoryPendingStore,
                        MemoryResetStore,
                        MockMailer,
                        MockPostRepository,
                        MockDownloadRepository,
                        MemoryTokenStore,
                        LocalFileStore,
                    >(cfg, &$h.secret)
                })
                .default_service(web::route().to(vault_api::handlers::not_found)),
        )
        .await
    };
}

#[actix_rt::test]
async fn full_flow_from_registration_to_quota_exhaustion() {
    let h = Harness::new();
    let app = init_app!(h);

    // Register and verify through the HTTP surface.
    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(serde_json::json!({
            "name": "Alice",
            "email": "alice@example.com",
            "password": "password-123"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let otp = h.mailer.last_otp().await.expect("OTP mailed");
    let req = test::TestRequest::post()
        .uri("/verify")
        .set_json(serde_json::json!({ "email": "alice@example.com", "otp": otp }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    // Login and capture the session cookie.
    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(serde_json::json!({
            "email": "alice@example.com",
            "password": "password-123"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "auth_token")
        .expect("session cookie set")
        .into_owned();
    let body: serde_json::Value = test::read_body_json(resp).await;
    let user_id = Uuid::parse_str(body["user"]["id"].as_str().unwrap()).unwrap();

    // Four downloads already burned today; one left.
    let post = h.seed_post_with_pdf("uploads/pdfs/guide.pdf", b"pdf bytes").await;
    h.seed_downloads_today(user_id, post.id, 4).await;

    let req = test::TestRequest::get()
        .uri("/check-limit")
        .cookie(cookie.clone())
        .to_request();
    let body: serde_json::Value =
        test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["count"], 4);
    assert_eq!(body["remaining"], 1);
    assert_eq!(body["limitReached"], false);

    // Fifth mint succeeds and reports the standing at mint time.
    let req = test::TestRequest::get()
        .uri(&format!("/generate-link/{}/pdf", post.id))
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["downloadStatus"]["count"], 4);
    assert_eq!(body["downloadStatus"]["remaining"], 1);
    assert_eq!(body["fileType"], "pdf");
    let url = body["downloadURL"].as_str().unwrap().to_string();

    // Redeem: the file streams and the ledger grows to five.
    let req = test::TestRequest::get()
        .uri(&url)
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let bytes = test::read_body(resp).await;
    assert_eq!(&bytes[..], b"pdf bytes");
    assert_eq!(h.ledger.len().await, 5);

    // Single use: replaying the link fails.
    let req = test::TestRequest::get()
        .uri(&url)
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 403);

    // Sixth mint is refused with the quota payload.
    let req = test::TestRequest::get()
        .uri(&format!("/generate-link/{}/pdf", post.id))
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 429);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["downloadCount"], 5);
    assert_eq!(body["remaining"], 0);
}

#[actix_rt::test]
async fn protected_routes_require_a_session() {
    let h = Harness::new();
    let app = init_app!(h);

    let uris = vec![
        "/check-limit".to_string(),
        "/history".to_string(),
        format!("/generate-link/{}/pdf", Uuid::new_v4()),
    ];
    for uri in &uris {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 401, "unauthenticated {}", uri);
    }

    // A forged cookie is no better than none.
    let req = test::TestRequest::get()
        .uri("/check-limit")
        .cookie(Cookie::new("auth_token", "not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);
}

#[actix_rt::test]
async fn redemption_without_a_session_is_forbidden() {
    let h = Harness::new();
    let app = init_app!(h);

    // Redemption failures are all 403 on the wire, session ones included.
    let req = test::TestRequest::get()
        .uri("/download-temp/deadbeef")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 403);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "FORBIDDEN");

    let req = test::TestRequest::get()
        .uri("/download-temp/deadbeef")
        .cookie(Cookie::new("auth_token", "not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 403);
}

#[actix_rt::test]
async fn foreign_session_cannot_redeem_a_token() {
    let h = Harness::new();
    let app = init_app!(h);

    let (alice, alice_cookie) = h.seed_user("alice@example.com").await;
    let (_bob, bob_cookie) = h.seed_user("bob@example.com").await;
    let post = h.seed_post_with_pdf("uploads/pdfs/guide.pdf", b"pdf bytes").await;

    let minted = h
        .downloads
        .mint(alice.id, post.id, FileKind::Pdf)
        .await
        .unwrap();
    let url = format!("/download-temp/{}", minted.token);

    let req = test::TestRequest::get()
        .uri(&url)
        .cookie(bob_cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 403);

    // The failed attempt did not consume the token.
    let req = test::TestRequest::get()
        .uri(&url)
        .cookie(alice_cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
}

#[actix_rt::test]
async fn malformed_link_parameters_are_rejected() {
    let h = Harness::new();
    let app = init_app!(h);
    let (_, cookie) = h.seed_user("alice@example.com").await;

    let req = test::TestRequest::get()
        .uri(&format!("/generate-link/{}/exe", Uuid::new_v4()))
        .cookie(cookie.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 400);

    let req = test::TestRequest::get()
        .uri("/generate-link/not-a-uuid/pdf")
        .cookie(cookie)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 400);
}

#[actix_rt::test]
async fn forgot_password_does_not_reveal_registration() {
    let h = Harness::new();
    let app = init_app!(h);
    h.seed_user("known@example.com").await;

    let mut bodies = Vec::new();
    for email in ["known@example.com", "unknown@example.com"] {
        let req = test::TestRequest::post()
            .uri("/forgot-password")
            .set_json(serde_json::json!({ "email": email }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let body: serde_json::Value = test::read_body_json(resp).await;
        bodies.push(body);
    }
    assert_eq!(bodies[0], bodies[1]);
}

#[actix_rt::test]
async fn history_lists_recent_downloads() {
    let h = Harness::new();
    let app = init_app!(h);

    let (user, cookie) = h.seed_user("alice@example.com").await;
    let post = h.seed_post_with_pdf("uploads/pdfs/guide.pdf", b"pdf bytes").await;
    h.seed_downloads_today(user.id, post.id, 2).await;

    let req = test::TestRequest::get()
        .uri("/history")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["downloads"].as_array().unwrap().len(), 2);
    assert_eq!(body["downloads"][0]["fileType"], "pdf");
}

#[actix_rt::test]
async fn logout_removes_the_session_cookie() {
    let h = Harness::new();
    let app = init_app!(h);

    let req = test::TestRequest::post().uri("/logout").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "auth_token")
        .expect("removal cookie set");
    assert_eq!(cookie.value(), "");
}
