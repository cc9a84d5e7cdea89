use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdminError {
  #[error("Admin privileges required")]
  Forbidden,

  #[error("Invalid username or password")]
  InvalidCredentials,

  #[error("Invalid session token")]
  InvalidToken,

  #[error("Password hash error: {0}")]
  Hash(String),

  #[error("Session store error: {0}")]
  SessionStore(String),
}
