use actix_web::{web, HttpResponse};
use validator::Validate;

use vault_core::services::{Mailer, PendingStore, RegistrationService};
use vault_core::UserRepository;

use crate::dto::auth::{UserSummary, VerifyRequest};
use crate::handlers::{error_response, validation_failure};

/// Handler for POST /verify
///
/// Confirms the registration OTP and creates the verified account.
pub async fn verify<U, P, M>(
    service: web::Data<RegistrationService<U, P, M>>,
    request: web::Json<VerifyRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    P: PendingStore + 'static,
    M: Mailer + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_failure(&errors);
    }

    match service.verify(&request.email, &request.otp).await {
        Ok(user) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Account verified",
            "user": UserSummary::from(&user),
        })),
        Err(e) => error_response(&e),
    }
}
