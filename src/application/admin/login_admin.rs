use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::domain::admin::{AdminAccessService, AdminError};

/// Command for logging in an admin
#[derive(Debug, Clone)]
pub struct LoginAdminCommand {
  pub username: String,
  /// Plain text, verified against the configured hash
  pub password: String,
}

/// Response after a successful admin login
#[derive(Debug, Clone)]
pub struct LoginAdminResponse {
  pub username: String,
  /// Raw session token, handed to the client as a cookie
  pub session_token: String,
  pub expires_at: DateTime<Utc>,
}

/// Use case for logging in an admin
pub struct LoginAdminUseCase {
  access_service: Arc<AdminAccessService>,
}

impl LoginAdminUseCase {
  pub fn new(access_service: Arc<AdminAccessService>) -> Self {
    Self { access_service }
  }

  /// Executes the admin login use case
  ///
  /// # Errors
  /// Returns `AdminError::InvalidCredentials` for an unknown username or a
  /// wrong password. Both cases look the same to the caller.
  pub async fn execute(&self, command: LoginAdminCommand) -> Result<LoginAdminResponse, AdminError> {
    let issued = self
      .access_service
      .login(&command.username, &command.password)
      .await?;

    Ok(LoginAdminResponse {
      username: issued.username,
      session_token: issued.token,
      expires_at: issued.expires_at,
    })
  }
}
