use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use crate::domain::admin::{AdminError, AdminSession, AdminSessionRepository};

const KEY_PREFIX: &str = "cardshop:admin_session:";

fn session_key(token_hash: &str) -> String {
  format!("{}{}", KEY_PREFIX, token_hash)
}

/// Admin sessions stored as JSON under their token hash; Redis expiry
/// mirrors the session lifetime.
pub struct RedisAdminSessionRepository {
  redis: ConnectionManager,
}

impl RedisAdminSessionRepository {
  pub fn new(redis: ConnectionManager) -> Self {
    Self { redis }
  }
}

fn store_failed(context: &str, e: impl std::fmt::Display) -> AdminError {
  tracing::error!("{}: {}", context, e);
  AdminError::SessionStore(e.to_string())
}

#[async_trait]
impl AdminSessionRepository for RedisAdminSessionRepository {
  async fn create(&self, session: &AdminSession) -> Result<(), AdminError> {
    let payload =
      serde_json::to_string(session).map_err(|e| store_failed("Failed to encode session", e))?;
    let ttl = session.ttl_seconds().max(1) as u64;

    let mut conn = self.redis.clone();
    conn
      .set_ex::<_, _, ()>(session_key(&session.token_hash), payload, ttl)
      .await
      .map_err(|e| store_failed("Failed to store admin session", e))
  }

  async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<AdminSession>, AdminError> {
    let mut conn = self.redis.clone();
    let payload: Option<String> = conn
      .get(session_key(token_hash))
      .await
      .map_err(|e| store_failed("Failed to read admin session", e))?;

    match payload {
      Some(payload) => serde_json::from_str(&payload)
        .map(Some)
        .map_err(|e| store_failed("Failed to decode admin session", e)),
      None => Ok(None),
    }
  }

  async fn delete(&self, token_hash: &str) -> Result<(), AdminError> {
    let mut conn = self.redis.clone();
    conn
      .del::<_, ()>(session_key(token_hash))
      .await
      .map_err(|e| store_failed("Failed to delete admin session", e))
  }
}
