use actix_web::{web, HttpResponse};
use validator::Validate;

use vault_core::services::{Mailer, PasswordResetService, ResetStore};
use vault_core::UserRepository;

use crate::dto::auth::{ForgotPasswordRequest, MessageResponse};
use crate::handlers::{error_response, validation_failure};

/// Handler for POST /forgot-password
///
/// Always answers the same way for known and unknown emails.
pub async fn forgot_password<U, R, M>(
    service: web::Data<PasswordResetService<U, R, M>>,
    request: web::Json<ForgotPasswordRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: ResetStore + 'static,
    M: Mailer + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_failure(&errors);
    }

    match service.request_reset(&request.email).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::ok(
            "If that email is registered, a reset code has been sent",
        )),
        Err(e) => error_response(&e),
    }
}
