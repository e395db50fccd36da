use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::{Result, SignupError};
use crate::mail::{OutgoingMail, SharedMailer};
use crate::messages;
use crate::state::{NewSignup, Registration, SharedSignupStore};

/// Outcome of a successful signup
#[derive(Debug, Clone)]
pub struct Confirmation {
    pub registration: Registration,
}

/// Counters exposed on the stats endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_signups: usize,
    pub keys_remaining: usize,
}

/// Liveness probe payload
#[derive(Debug, Clone, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Runs the signup flow: validate, commit, then notify.
///
/// The commit (duplicate check, key allocation, append) finishes before any
/// email is sent. A failed send never returns the key to the pool.
pub struct RegistrationManager {
    store: SharedSignupStore,
    mailer: SharedMailer,
    /// Used as the sender and as the contact address inside the email
    sender_address: String,
    send_timeout: Duration,
}

impl RegistrationManager {
    pub fn new(
        store: SharedSignupStore,
        mailer: SharedMailer,
        sender_address: String,
        send_timeout: Duration,
    ) -> Self {
        Self {
            store,
            mailer,
            sender_address,
            send_timeout,
        }
    }

    /// Register a tester and email them their key
    pub async fn register(
        &self,
        name: Option<String>,
        email: Option<String>,
        experience: Option<String>,
    ) -> Result<Confirmation> {
        let signup = NewSignup::parse(name, email, experience)?;
        let registration = self.store.commit(signup)?;

        info!(
            "New alpha tester registered: {} <{}> (id {})",
            registration.name, registration.email, registration.id
        );

        self.notify(&registration).await?;

        Ok(Confirmation {
            registration: Registration {
                notified: true,
                ..registration
            },
        })
    }

    /// Send the welcome email again for an existing registration.
    ///
    /// Never allocates a key.
    pub async fn resend_notification(&self, id: Uuid) -> Result<()> {
        let registration = self.store.find(id).ok_or_else(|| SignupError::NotFound {
            id: id.to_string(),
        })?;

        info!("Resending welcome email for registration {}", id);
        self.notify(&registration).await
    }

    /// Deliver the welcome email and record the delivery
    async fn notify(&self, registration: &Registration) -> Result<()> {
        let mail = OutgoingMail {
            from: messages::sender_header(&self.sender_address),
            to: registration.email.clone(),
            subject: messages::WELCOME_SUBJECT.to_string(),
            html: messages::render_welcome(
                &registration.name,
                &registration.code,
                &self.sender_address,
            ),
        };

        match tokio::time::timeout(self.send_timeout, self.mailer.send(&mail)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(
                    "Welcome email for registration {} failed: {}",
                    registration.id, e
                );
                return Err(e);
            }
            Err(_) => {
                warn!(
                    "Welcome email for registration {} timed out after {:?}",
                    registration.id, self.send_timeout
                );
                return Err(SignupError::Notification {
                    recipient: registration.email.clone(),
                    message: format!("timed out after {:?}", self.send_timeout),
                });
            }
        }

        if !self.store.mark_notified(registration.id) {
            error!(
                "Registration {} vanished before it could be marked notified",
                registration.id
            );
            return Err(SignupError::Internal {
                message: format!("registration {} not found after send", registration.id),
            });
        }

        Ok(())
    }

    pub fn stats(&self) -> Stats {
        let counts = self.store.counts();
        Stats {
            total_signups: counts.total_signups,
            keys_remaining: counts.keys_remaining,
        }
    }

    pub fn health(&self) -> Health {
        Health {
            status: "ok",
            timestamp: Utc::now(),
        }
    }

    /// Snapshot of all registrations
    #[cfg(test)]
    pub fn registrations(&self) -> Vec<Registration> {
        self.store.registrations()
    }
}

/// Shared registration manager type
pub type SharedRegistrationManager = Arc<RegistrationManager>;

pub fn create_shared_registration_manager(
    store: SharedSignupStore,
    mailer: SharedMailer,
    sender_address: String,
    send_timeout: Duration,
) -> SharedRegistrationManager {
    Arc::new(RegistrationManager::new(
        store,
        mailer,
        sender_address,
        send_timeout,
    ))
}
