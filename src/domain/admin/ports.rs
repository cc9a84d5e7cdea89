use async_trait::async_trait;

use super::entities::{Actor, AdminSession};
use super::errors::AdminError;

/// Capability check run at the top of every admin operation.
#[async_trait]
pub trait AdminGuard: Send + Sync {
  async fn check_admin(&self, actor: &Actor) -> Result<(), AdminError>;
}

#[async_trait]
pub trait AdminSessionRepository: Send + Sync {
  async fn create(&self, session: &AdminSession) -> Result<(), AdminError>;
  async fn find_by_token_hash(&self, token_hash: &str)
  -> Result<Option<AdminSession>, AdminError>;
  async fn delete(&self, token_hash: &str) -> Result<(), AdminError>;
}

#[async_trait]
pub trait PasswordVerifier: Send + Sync {
  /// Returns `Ok(false)` on mismatch and `Err` only for malformed hashes.
  async fn verify(&self, password: &str, password_hash: &str) -> Result<bool, AdminError>;
}

#[async_trait]
pub trait TokenGenerator: Send + Sync {
  async fn generate(&self) -> Result<String, AdminError>;
}
