use async_trait::async_trait;
use tracing::info;

use super::{Mailer, OutgoingMail};
use crate::error::Result;

/// Writes messages to the log instead of delivering them
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        info!(
            "Email not delivered (no relay configured): to={} subject={:?} ({} bytes)",
            mail.to,
            mail.subject,
            mail.html.len()
        );
        Ok(())
    }
}
