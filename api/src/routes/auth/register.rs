use actix_web::{web, HttpResponse};
use validator::Validate;

use vault_core::services::{Mailer, PendingStore, RegistrationService};
use vault_core::UserRepository;

use crate::dto::auth::{MessageResponse, RegisterRequest};
use crate::handlers::{error_response, validation_failure};

/// Handler for POST /register
///
/// Parks a pending registration and mails a 6-digit OTP. The account
/// does not exist until the OTP is verified.
pub async fn register<U, P, M>(
    service: web::Data<RegistrationService<U, P, M>>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    P: PendingStore + 'static,
    M: Mailer + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_failure(&errors);
    }

    match service
        .register(&request.name, &request.email, &request.password)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::ok(
            "Verification code sent to your email",
        )),
        Err(e) => error_response(&e),
    }
}
