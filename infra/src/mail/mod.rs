//! Outbound mail delivery.

mod resend;

pub use resend::{ResendConfig, ResendMailer};
