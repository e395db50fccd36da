//! Delivery through an HTTP mail relay

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, error};

use super::{Mailer, OutgoingMail};
use crate::error::{Result, SignupError};

/// Request body sent to the relay
#[derive(Serialize)]
struct RelayRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

/// Posts each message as JSON to a relay endpoint with a bearer secret
pub struct HttpMailer {
    api_url: String,
    secret: String,
    http_client: reqwest::Client,
}

impl HttpMailer {
    pub fn new(api_url: String, secret: String) -> Self {
        Self {
            api_url,
            secret,
            http_client: reqwest::Client::new(),
        }
    }

    fn failure(mail: &OutgoingMail, message: String) -> SignupError {
        SignupError::Notification {
            recipient: mail.to.clone(),
            message,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        let response = self
            .http_client
            .post(&self.api_url)
            .bearer_auth(&self.secret)
            .json(&RelayRequest {
                from: &mail.from,
                to: &mail.to,
                subject: &mail.subject,
                html: &mail.html,
            })
            .send()
            .await
            .map_err(|e| {
                error!("Failed to reach mail relay: {}", e);
                Self::failure(mail, e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Mail relay rejected message: {} - {}", status, error_text);
            return Err(Self::failure(mail, format!("relay returned {}", status)));
        }

        debug!("Mail relay accepted message for {}", mail.to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn mail() -> OutgoingMail {
        OutgoingMail {
            from: "\"Celestial Chaos Team\" <team@example.com>".to_string(),
            to: "ada@x.com".to_string(),
            subject: "Welcome".to_string(),
            html: "<p>A1</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_posts_message_with_bearer_secret() {
        let server = MockServer::start_async().await;
        let relay = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/send")
                    .header("authorization", "Bearer s3cret")
                    .json_body(serde_json::json!({
                        "from": "\"Celestial Chaos Team\" <team@example.com>",
                        "to": "ada@x.com",
                        "subject": "Welcome",
                        "html": "<p>A1</p>"
                    }));
                then.status(200);
            })
            .await;

        let mailer = HttpMailer::new(server.url("/send"), "s3cret".to_string());
        mailer.send(&mail()).await.unwrap();
        relay.assert_async().await;
    }

    #[tokio::test]
    async fn test_relay_error_status_is_notification_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/send");
                then.status(500).body("smtp down");
            })
            .await;

        let mailer = HttpMailer::new(server.url("/send"), "s3cret".to_string());
        let result = mailer.send(&mail()).await;
        assert!(matches!(
            result,
            Err(SignupError::Notification { ref recipient, .. }) if recipient == "ada@x.com"
        ));
    }
}
