//! Outbound mail interface.
//!
//! Delivery is an external collaborator; the concrete HTTP implementation
//! lives in the infrastructure crate. The mock records sent messages so
//! tests can assert on issued codes.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Interface for sending transactional mail.
///
/// Errors are plain strings: callers decide whether a delivery failure is
/// fatal (OTP mail) or merely logged (confirmation mail).
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends the registration OTP. Returns a provider message id.
    async fn send_registration_otp(
        &self,
        email: &str,
        name: &str,
        otp: &str,
    ) -> Result<String, String>;

    /// Sends the password reset OTP. Returns a provider message id.
    async fn send_reset_otp(&self, email: &str, otp: &str) -> Result<String, String>;

    /// Sends the post-verification welcome mail.
    async fn send_welcome(&self, email: &str, name: &str) -> Result<String, String>;

    /// Sends the password-changed confirmation mail.
    async fn send_password_changed(&self, email: &str) -> Result<String, String>;
}

/// A message captured by [`MockMailer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub email: String,
    pub subject: String,
    pub otp: Option<String>,
}

/// Mailer that records messages instead of delivering them.
#[doc(hidden)]
pub struct MockMailer {
    sent: Arc<RwLock<Vec<SentMail>>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn sent(&self) -> Vec<SentMail> {
        self.sent.read().await.clone()
    }

    /// The OTP from the most recent message carrying one, if any.
    pub async fn last_otp(&self) -> Option<String> {
        self.sent
            .read()
            .await
            .iter()
            .rev()
            .find_map(|m| m.otp.clone())
    }

    async fn record(&self, email: &str, subject: &str, otp: Option<&str>) -> String {
        let mut sent = self.sent.write().await;
        sent.push(SentMail {
            email: email.to_string(),
            subject: subject.to_string(),
            otp: otp.map(|s| s.to_string()),
        });
        format!("mock-{}", sent.len())
    }
}

impl Default for MockMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send_registration_otp(
        &self,
        email: &str,
        _name: &str,
        otp: &str,
    ) -> Result<String, String> {
        Ok(self.record(email, "Your OTP Verification Code", Some(otp)).await)
    }

    async fn send_reset_otp(&self, email: &str, otp: &str) -> Result<String, String> {
        Ok(self.record(email, "Your Password Reset Code", Some(otp)).await)
    }

    async fn send_welcome(&self, email: &str, _name: &str) -> Result<String, String> {
        Ok(self.record(email, "Your Account Has Been Verified", None).await)
    }

    async fn send_password_changed(&self, email: &str) -> Result<String, String> {
        Ok(self.record(email, "Your Password Has Been Changed", None).await)
    }
}
