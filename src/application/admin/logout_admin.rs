use std::sync::Arc;

use crate::domain::admin::{AdminAccessService, AdminError};

/// Use case for ending an admin session
pub struct LogoutAdminUseCase {
  access_service: Arc<AdminAccessService>,
}

impl LogoutAdminUseCase {
  pub fn new(access_service: Arc<AdminAccessService>) -> Self {
    Self { access_service }
  }

  /// Deletes the session behind `session_token`. Unknown tokens are a no-op.
  pub async fn execute(&self, session_token: String) -> Result<(), AdminError> {
    self.access_service.logout(session_token).await
  }
}
