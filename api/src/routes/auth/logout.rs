use actix_web::cookie::Cookie;
use actix_web::HttpResponse;

use crate::dto::auth::MessageResponse;
use crate::middleware::auth::AUTH_COOKIE;

/// Handler for POST /logout
///
/// Stateless sessions: logout just removes the cookie.
pub async fn logout() -> HttpResponse {
    let mut cookie = Cookie::new(AUTH_COOKIE, "");
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.make_removal();

    HttpResponse::Ok()
        .cookie(cookie)
        .json(MessageResponse::ok("Logged out"))
}
