use actix_web::{web, HttpResponse};
use validator::Validate;

use vault_core::services::{Mailer, PasswordResetService, ResetStore};
use vault_core::UserRepository;

use crate::dto::auth::{MessageResponse, ResetPasswordRequest};
use crate::handlers::{error_response, validation_failure};

/// Handler for POST /reset-password
pub async fn reset_password<U, R, M>(
    service: web::Data<PasswordResetService<U, R, M>>,
    request: web::Json<ResetPasswordRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: ResetStore + 'static,
    M: Mailer + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_failure(&errors);
    }

    match service
        .reset(
            &request.email,
            &request.otp,
            &request.new_password,
            &request.confirm_password,
        )
        .await
    {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::ok("Password has been reset")),
        Err(e) => error_response(&e),
    }
}
