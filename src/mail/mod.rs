//! Outgoing email delivery
//!
//! The registration flow only knows about the [`Mailer`] trait. Delivery goes
//! through an HTTP mail relay when one is configured, otherwise messages are
//! written to the log.

mod http;
mod log;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::error::Result;

pub use self::http::HttpMailer;
pub use self::log::LogMailer;

/// A fully rendered message ready for delivery
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message. Errors are reported as `SignupError::Notification`.
    async fn send(&self, mail: &OutgoingMail) -> Result<()>;
}

/// Shared mailer type
pub type SharedMailer = Arc<dyn Mailer>;

/// Mail transport settings
#[derive(Clone)]
pub struct MailConfig {
    /// Sender address, also shown as the contact address in emails
    pub sender_address: String,
    /// Secret used to authenticate against the relay
    pub sender_secret: Option<String>,
    /// HTTP relay endpoint accepting `{from, to, subject, html}`
    pub api_url: Option<String>,
    /// Upper bound for a single send
    pub send_timeout: Duration,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            sender_address: "alpha@localhost".to_string(),
            sender_secret: None,
            api_url: None,
            send_timeout: Duration::from_secs(10),
        }
    }
}

impl MailConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            sender_address: std::env::var("EMAIL_USER").unwrap_or(defaults.sender_address),
            sender_secret: std::env::var("EMAIL_PASSWORD").ok(),
            api_url: std::env::var("MAIL_API_URL").ok(),
            send_timeout: std::env::var("MAIL_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.send_timeout),
        }
    }
}

/// Pick the relay mailer when fully configured, the log mailer otherwise
pub fn create_mailer(config: &MailConfig) -> SharedMailer {
    match (&config.api_url, &config.sender_secret) {
        (Some(api_url), Some(secret)) => Arc::new(HttpMailer::new(api_url.clone(), secret.clone())),
        (Some(_), None) => {
            warn!("MAIL_API_URL is set but EMAIL_PASSWORD is missing; emails will only be logged");
            Arc::new(LogMailer)
        }
        _ => {
            warn!("MAIL_API_URL not set; emails will only be logged");
            Arc::new(LogMailer)
        }
    }
}
