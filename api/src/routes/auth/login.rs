use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{web, HttpResponse};
use validator::Validate;

use vault_core::services::AuthService;
use vault_core::UserRepository;

use crate::config::SessionSettings;
use crate::dto::auth::{LoginRequest, LoginResponse, UserSummary};
use crate::handlers::{error_response, validation_failure};
use crate::middleware::auth::AUTH_COOKIE;

/// Handler for POST /login
///
/// Verifies credentials and sets the `auth_token` session cookie.
pub async fn login<U>(
    service: web::Data<AuthService<U>>,
    settings: web::Data<SessionSettings>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_failure(&errors);
    }

    match service.login(&request.email, &request.password).await {
        Ok((user, token)) => {
            let cookie = Cookie::build(AUTH_COOKIE, token)
                .path("/")
                .http_only(true)
                .secure(settings.cookie_secure)
                .same_site(SameSite::Lax)
                .max_age(CookieDuration::hours(settings.session_hours))
                .finish();

            HttpResponse::Ok().cookie(cookie).json(LoginResponse {
                success: true,
                message: "Logged in".to_string(),
                user: UserSummary::from(&user),
            })
        }
        Err(e) => error_response(&e),
    }
}
