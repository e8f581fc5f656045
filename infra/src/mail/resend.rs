//! Resend mail provider.
//!
//! Transactional mail goes out through the Resend HTTP API. Bodies are
//! small inline HTML templates; the provider message id is returned so
//! callers can log it.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

use vault_core::services::Mailer;

use crate::InfrastructureError;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Resend provider configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct ResendConfig {
    pub api_key: String,
    /// Sender address, e.g. `Vault01 <no-reply@vault01.dev>`
    pub from_address: String,
}

impl ResendConfig {
    pub fn from_env() -> Result<Self, InfrastructureError> {
        let api_key = std::env::var("RESEND_API_KEY")
            .map_err(|_| InfrastructureError::Config("RESEND_API_KEY not set".to_string()))?;
        let from_address = std::env::var("MAIL_FROM_ADDRESS")
            .unwrap_or_else(|_| "Vault01 <onboarding@resend.dev>".to_string());

        Ok(Self {
            api_key,
            from_address,
        })
    }
}

#[derive(Deserialize)]
struct ResendResponse {
    id: String,
}

/// Mailer backed by the Resend HTTP API.
pub struct ResendMailer {
    config: ResendConfig,
    client: reqwest::Client,
}

impl ResendMailer {
    pub fn new(config: ResendConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    async fn send(&self, to: &str, subject: &str, html: String) -> Result<String, String> {
        let body = json!({
            "from": self.config.from_address,
            "to": [to],
            "subject": subject,
            "html": html,
        });

        let response = self
            .client
            .post(RESEND_API_URL)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Mail request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            error!(
                event = "mail_send_failed",
                status = %status,
                "Resend rejected the message"
            );
            return Err(format!("Resend returned {}: {}", status, text));
        }

        let parsed: ResendResponse = response
            .json()
            .await
            .map_err(|e| format!("Invalid Resend response: {}", e))?;

        debug!(event = "mail_sent", message_id = %parsed.id);
        Ok(parsed.id)
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send_registration_otp(
        &self,
        email: &str,
        name: &str,
        otp: &str,
    ) -> Result<String, String> {
        let html = format!(
            "<p>Hi {},</p>\
             <p>Your verification code is:</p>\
             <h2 style=\"letter-spacing: 4px;\">{}</h2>\
             <p>This code expires in 10 minutes. If you did not request it, you can ignore this email.</p>",
            name, otp
        );
        self.send(email, "Your OTP Verification Code", html).await
    }

    async fn send_reset_otp(&self, email: &str, otp: &str) -> Result<String, String> {
        let html = format!(
            "<p>We received a request to reset your password.</p>\
             <p>Your reset code is:</p>\
             <h2 style=\"letter-spacing: 4px;\">{}</h2>\
             <p>This code expires in 10 minutes. If you did not request a reset, no action is needed.</p>",
            otp
        );
        self.send(email, "Your Password Reset Code", html).await
    }

    async fn send_welcome(&self, email: &str, name: &str) -> Result<String, String> {
        let html = format!(
            "<p>Hi {},</p>\
             <p>Your account has been verified. You can now sign in and download attachments.</p>",
            name
        );
        self.send(email, "Your Account Has Been Verified", html)
            .await
    }

    async fn send_password_changed(&self, email: &str) -> Result<String, String> {
        let html = "<p>Your password was just changed.</p>\
             <p>If this was not you, reset your password immediately.</p>"
            .to_string();
        self.send(email, "Your Password Has Been Changed", html)
            .await
    }
}
