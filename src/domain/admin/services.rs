use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use super::entities::{Actor, AdminAccount, AdminSession};
use super::errors::AdminError;
use super::ports::{AdminGuard, AdminSessionRepository, PasswordVerifier, TokenGenerator};
use super::value_objects::SessionToken;

/// A freshly issued session; the raw token only exists here and in the cookie.
#[derive(Debug, Clone)]
pub struct IssuedSession {
  pub token: String,
  pub username: String,
  pub expires_at: DateTime<Utc>,
}

pub struct AdminAccessService {
  accounts: HashMap<String, String>,
  session_repo: Arc<dyn AdminSessionRepository>,
  password_verifier: Arc<dyn PasswordVerifier>,
  token_generator: Arc<dyn TokenGenerator>,
  session_ttl_seconds: i64,
}

impl AdminAccessService {
  pub fn new(
    accounts: Vec<AdminAccount>,
    session_repo: Arc<dyn AdminSessionRepository>,
    password_verifier: Arc<dyn PasswordVerifier>,
    token_generator: Arc<dyn TokenGenerator>,
    session_ttl_seconds: i64,
  ) -> Self {
    let accounts = accounts
      .into_iter()
      .map(|a| (a.username, a.password_hash))
      .collect();

    Self {
      accounts,
      session_repo,
      password_verifier,
      token_generator,
      session_ttl_seconds,
    }
  }

  pub fn is_admin(&self, username: &str) -> bool {
    self.accounts.contains_key(username)
  }

  /// Verify credentials and open a session.
  pub async fn login(&self, username: &str, password: &str) -> Result<IssuedSession, AdminError> {
    let username = username.trim();
    let password_hash = self
      .accounts
      .get(username)
      .ok_or(AdminError::InvalidCredentials)?;

    if !self.password_verifier.verify(password, password_hash).await? {
      tracing::warn!("Failed admin login for username={}", username);
      return Err(AdminError::InvalidCredentials);
    }

    let token = SessionToken::from_string(self.token_generator.generate().await?)?;
    let session = AdminSession::new(
      token.hash(),
      username.to_string(),
      self.session_ttl_seconds,
    );
    self.session_repo.create(&session).await?;

    tracing::info!("Admin session opened for username={}", username);

    Ok(IssuedSession {
      token: token.as_str().to_string(),
      username: session.username,
      expires_at: session.expires_at,
    })
  }

  /// Resolve a presented token into an actor. Unknown or expired tokens
  /// resolve to the anonymous actor.
  pub async fn resolve(&self, token: String) -> Result<Actor, AdminError> {
    let token = SessionToken::from_string(token)?;

    match self.session_repo.find_by_token_hash(&token.hash()).await? {
      Some(session) if !session.is_expired() => Ok(Actor::admin(session.username)),
      _ => Ok(Actor::anonymous()),
    }
  }

  pub async fn logout(&self, token: String) -> Result<(), AdminError> {
    let token = SessionToken::from_string(token)?;
    self.session_repo.delete(&token.hash()).await
  }
}

#[async_trait]
impl AdminGuard for AdminAccessService {
  async fn check_admin(&self, actor: &Actor) -> Result<(), AdminError> {
    match actor.username() {
      Some(username) if self.is_admin(username) => Ok(()),
      _ => Err(AdminError::Forbidden),
    }
  }
}
