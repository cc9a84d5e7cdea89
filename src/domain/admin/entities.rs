use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The caller of an operation, as resolved from its session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Actor {
  username: Option<String>,
}

impl Actor {
  pub fn anonymous() -> Self {
    Self { username: None }
  }

  pub fn admin(username: impl Into<String>) -> Self {
    Self {
      username: Some(username.into()),
    }
  }

  pub fn username(&self) -> Option<&str> {
    self.username.as_deref()
  }

  pub fn is_anonymous(&self) -> bool {
    self.username.is_none()
  }
}

/// Admin account as configured; the password is an argon2 PHC string.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminAccount {
  pub username: String,
  pub password_hash: String,
}

/// Server-side session record, keyed by the SHA-256 of the cookie token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
  pub token_hash: String,
  pub username: String,
  pub created_at: DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}

impl AdminSession {
  pub fn new(token_hash: String, username: String, ttl_seconds: i64) -> Self {
    let now = Utc::now();
    Self {
      token_hash,
      username,
      created_at: now,
      expires_at: now + chrono::Duration::seconds(ttl_seconds),
    }
  }

  pub fn is_expired(&self) -> bool {
    self.expires_at <= Utc::now()
  }

  pub fn ttl_seconds(&self) -> i64 {
    (self.expires_at - Utc::now()).num_seconds().max(0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_anonymous_actor_has_no_username() {
    let actor = Actor::anonymous();
    assert!(actor.is_anonymous());
    assert_eq!(actor.username(), None);
    assert_eq!(Actor::default(), actor);
  }

  #[test]
  fn test_session_expiry() {
    let session = AdminSession::new("hash".to_string(), "root".to_string(), 3600);
    assert!(!session.is_expired());
    assert!(session.ttl_seconds() > 3500);

    let expired = AdminSession::new("hash".to_string(), "root".to_string(), -1);
    assert!(expired.is_expired());
    assert_eq!(expired.ttl_seconds(), 0);
  }
}
