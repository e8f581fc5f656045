//! Session cookie authentication middleware.
//!
//! Protected routes sit behind [`SessionAuth`], which reads the
//! `auth_token` cookie, verifies the JWT and injects an [`AuthContext`]
//! into request extensions. Handlers receive it through the extractor.

use actix_web::{
    body::EitherBody,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    http::StatusCode,
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, DecodingKey, Validation};
use std::{
    future::{ready, Ready},
    rc::Rc,
};
use uuid::Uuid;

use vault_core::services::Claims;
use vault_core::UserRole;

/// Name of the session cookie
pub const AUTH_COOKIE: &str = "auth_token";

/// Authenticated caller identity injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub jti: String,
}

impl AuthContext {
    fn from_claims(claims: Claims) -> Result<Self, String> {
        let user_id = claims
            .user_id()
            .map_err(|_| "Invalid session token".to_string())?;
        Ok(Self {
            user_id,
            name: claims.name,
            email: claims.email,
            role: claims.role,
            jti: claims.jti,
        })
    }
}

impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthContext>()
                .cloned()
                .ok_or_else(|| ErrorUnauthorized("Authentication required")),
        )
    }
}

/// Session authentication middleware factory
pub struct SessionAuth {
    jwt_secret: Rc<String>,
    denied_status: StatusCode,
}

impl SessionAuth {
    pub fn new(jwt_secret: String) -> Self {
        Self {
            jwt_secret: Rc::new(jwt_secret),
            denied_status: StatusCode::UNAUTHORIZED,
        }
    }

    /// Overrides the status sent on a missing or invalid session.
    ///
    /// The redemption endpoint reports 403 rather than 401: a download
    /// link is an authorization artifact, and its failures are grouped
    /// under forbidden on the wire.
    pub fn denied_status(mut self, status: StatusCode) -> Self {
        self.denied_status = status;
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionAuthMiddleware {
            service: Rc::new(service),
            jwt_secret: Rc::clone(&self.jwt_secret),
            denied_status: self.denied_status,
        }))
    }
}

pub struct SessionAuthMiddleware<S> {
    service: Rc<S>,
    jwt_secret: Rc<String>,
    denied_status: StatusCode,
}

impl<S, B> Service<ServiceRequest> for SessionAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(&req, &self.jwt_secret) {
            Ok(context) => {
                req.extensions_mut().insert(context);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(|res| res.map_into_left_body()) })
            }
            Err(message) => {
                let (req, _) = req.into_parts();
                let code = if self.denied_status == StatusCode::FORBIDDEN {
                    "FORBIDDEN"
                } else {
                    "UNAUTHORIZED"
                };
                let response = HttpResponse::build(self.denied_status)
                    .json(serde_json::json!({
                        "success": false,
                        "error": code,
                        "message": message,
                    }))
                    .map_into_right_body();
                Box::pin(ready(Ok(ServiceResponse::new(req, response))))
            }
        }
    }
}

fn authenticate(req: &ServiceRequest, secret: &str) -> Result<AuthContext, String> {
    let cookie = req
        .cookie(AUTH_COOKIE)
        .ok_or_else(|| "Authentication required".to_string())?;

    let claims = decode::<Claims>(
        cookie.value(),
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => "Session expired".to_string(),
        _ => "Invalid session token".to_string(),
    })?;

    AuthContext::from_claims(claims)
}
