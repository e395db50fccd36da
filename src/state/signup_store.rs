use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use super::code_pool::CodePool;
use crate::error::{Result, SignupError};

/// Stored when the registrant left the experience field out
pub const EXPERIENCE_NOT_PROVIDED: &str = "Not provided";

/// A validated signup that has not been assigned a code yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewSignup {
    pub name: String,
    pub email: String,
    pub experience: String,
}

impl NewSignup {
    /// Validate raw request fields.
    ///
    /// Name and email must be present and non-empty. Values are kept exactly
    /// as sent: no trimming and no case folding.
    pub fn parse(
        name: Option<String>,
        email: Option<String>,
        experience: Option<String>,
    ) -> Result<Self> {
        let name = name.filter(|n| !n.is_empty());
        let email = email.filter(|e| !e.is_empty());

        let (name, email) = match (name, email) {
            (Some(name), Some(email)) => (name, email),
            _ => {
                return Err(SignupError::Validation {
                    message: "name and email are required".to_string(),
                })
            }
        };

        let experience = experience
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| EXPERIENCE_NOT_PROVIDED.to_string());

        Ok(Self {
            name,
            email,
            experience,
        })
    }
}

/// A committed signup bound to its issued key
#[derive(Debug, Clone)]
pub struct Registration {
    /// Registration identity, used to retry notification
    pub id: Uuid,

    pub name: String,

    /// Unique across all registrations (exact match)
    pub email: String,

    pub experience: String,

    /// Key drawn from the pool; never shared with another registration
    pub code: String,

    pub signed_up_at: DateTime<Utc>,

    /// Whether the welcome email has been delivered
    pub notified: bool,
}

/// Point-in-time counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreCounts {
    pub total_signups: usize,
    pub keys_remaining: usize,
}

struct Inner {
    registrations: Vec<Registration>,
    pool: CodePool,
}

/// In-memory registration list and key pool.
///
/// All mutation goes through a single write lock so the duplicate check, key
/// allocation and append happen as one step.
pub struct SignupStore {
    inner: RwLock<Inner>,
}

impl SignupStore {
    pub fn new(pool: CodePool) -> Self {
        Self {
            inner: RwLock::new(Inner {
                registrations: Vec::new(),
                pool,
            }),
        }
    }

    /// Commit a signup: reject duplicates, take the next key, append.
    ///
    /// Nothing is mutated on error.
    pub fn commit(&self, signup: NewSignup) -> Result<Registration> {
        let mut inner = self.inner.write();

        if inner.registrations.iter().any(|r| r.email == signup.email) {
            return Err(SignupError::DuplicateEmail {
                email: signup.email,
            });
        }

        let code = match inner.pool.allocate() {
            Some(code) => code,
            None => {
                return Err(SignupError::PoolExhausted {
                    issued: inner.pool.issued(),
                })
            }
        };

        let registration = Registration {
            id: Uuid::new_v4(),
            name: signup.name,
            email: signup.email,
            experience: signup.experience,
            code,
            signed_up_at: Utc::now(),
            notified: false,
        };
        inner.registrations.push(registration.clone());

        debug!(
            "Committed registration {} ({} keys left)",
            registration.id,
            inner.pool.remaining()
        );

        Ok(registration)
    }

    /// Flag a registration as notified. Returns false if the id is unknown.
    pub fn mark_notified(&self, id: Uuid) -> bool {
        let mut inner = self.inner.write();
        match inner.registrations.iter_mut().find(|r| r.id == id) {
            Some(registration) => {
                registration.notified = true;
                true
            }
            None => false,
        }
    }

    pub fn find(&self, id: Uuid) -> Option<Registration> {
        self.inner
            .read()
            .registrations
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    pub fn counts(&self) -> StoreCounts {
        let inner = self.inner.read();
        StoreCounts {
            total_signups: inner.registrations.len(),
            keys_remaining: inner.pool.remaining(),
        }
    }

    /// Snapshot of all registrations in commit order
    #[cfg(test)]
    pub fn registrations(&self) -> Vec<Registration> {
        self.inner.read().registrations.clone()
    }
}

/// Shared signup store type
pub type SharedSignupStore = Arc<SignupStore>;

pub fn create_shared_signup_store(pool: CodePool) -> SharedSignupStore {
    Arc::new(SignupStore::new(pool))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(codes: &[&str]) -> SignupStore {
        let pool = CodePool::new(codes.iter().map(|c| c.to_string()).collect()).unwrap();
        SignupStore::new(pool)
    }

    fn signup(name: &str, email: &str) -> NewSignup {
        NewSignup::parse(Some(name.to_string()), Some(email.to_string()), None).unwrap()
    }

    #[test]
    fn test_parse_defaults_experience() {
        let signup = NewSignup::parse(
            Some("Ada".to_string()),
            Some("ada@x.com".to_string()),
            Some(String::new()),
        )
        .unwrap();
        assert_eq!(signup.experience, EXPERIENCE_NOT_PROVIDED);

        let signup = NewSignup::parse(
            Some("Ada".to_string()),
            Some("ada@x.com".to_string()),
            Some("Roguelike veteran".to_string()),
        )
        .unwrap();
        assert_eq!(signup.experience, "Roguelike veteran");
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        let cases = [
            (None, Some("ada@x.com")),
            (Some(""), Some("ada@x.com")),
            (Some("Ada"), None),
            (Some("Ada"), Some("")),
        ];
        for (name, email) in cases {
            let result = NewSignup::parse(
                name.map(str::to_string),
                email.map(str::to_string),
                None,
            );
            assert!(matches!(result, Err(SignupError::Validation { .. })));
        }
    }

    #[test]
    fn test_parse_keeps_whitespace() {
        let signup = NewSignup::parse(Some(" ".to_string()), Some(" a@x.com ".to_string()), None)
            .unwrap();
        assert_eq!(signup.name, " ");
        assert_eq!(signup.email, " a@x.com ");
    }

    #[test]
    fn test_commit_assigns_codes_in_pool_order() {
        let store = store(&["A1", "B2", "C3"]);

        let codes: Vec<String> = ["a@x.com", "b@x.com", "c@x.com"]
            .iter()
            .map(|email| store.commit(signup("Tester", email)).unwrap().code)
            .collect();
        assert_eq!(codes, vec!["A1", "B2", "C3"]);

        let result = store.commit(signup("Late", "d@x.com"));
        assert!(matches!(result, Err(SignupError::PoolExhausted { issued: 3 })));
        assert_eq!(
            store.counts(),
            StoreCounts {
                total_signups: 3,
                keys_remaining: 0
            }
        );
    }

    #[test]
    fn test_duplicate_email_does_not_consume_key() {
        let store = store(&["A1", "B2"]);
        store.commit(signup("Ada", "ada@x.com")).unwrap();

        let result = store.commit(signup("Someone Else", "ada@x.com"));
        assert!(matches!(result, Err(SignupError::DuplicateEmail { .. })));

        let counts = store.counts();
        assert_eq!(counts.total_signups, 1);
        assert_eq!(counts.keys_remaining, 1);
    }

    #[test]
    fn test_email_match_is_case_sensitive() {
        let store = store(&["A1", "B2"]);
        store.commit(signup("Ada", "ada@x.com")).unwrap();
        let second = store.commit(signup("Ada", "ADA@x.com")).unwrap();
        assert_eq!(second.code, "B2");
    }

    #[test]
    fn test_duplicate_checked_before_exhaustion() {
        let store = store(&["A1"]);
        store.commit(signup("Ada", "ada@x.com")).unwrap();

        let result = store.commit(signup("Ada", "ada@x.com"));
        assert!(matches!(result, Err(SignupError::DuplicateEmail { .. })));
    }

    #[test]
    fn test_mark_notified() {
        let store = store(&["A1"]);
        let registration = store.commit(signup("Ada", "ada@x.com")).unwrap();
        assert!(!registration.notified);

        assert!(store.mark_notified(registration.id));
        assert!(store.find(registration.id).unwrap().notified);
        assert!(!store.mark_notified(Uuid::new_v4()));
    }

    #[test]
    fn test_concurrent_commits_never_share_a_code() {
        let codes: Vec<String> = (0..50).map(|i| format!("KEY-{:03}", i)).collect();
        let store = Arc::new(SignupStore::new(CodePool::new(codes).unwrap()));

        let handles: Vec<_> = (0..80)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store
                        .commit(signup("Tester", &format!("tester{}@x.com", i)))
                        .ok()
                })
            })
            .collect();

        let mut issued: Vec<String> = handles
            .into_iter()
            .filter_map(|h| h.join().unwrap())
            .map(|r| r.code)
            .collect();

        assert_eq!(issued.len(), 50);
        issued.sort();
        issued.dedup();
        assert_eq!(issued.len(), 50);
        assert_eq!(store.counts().keys_remaining, 0);
    }
}
