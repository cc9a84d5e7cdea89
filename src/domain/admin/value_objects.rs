use sha2::{Digest, Sha256};

use super::errors::AdminError;

/// Opaque session token as handed to the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
  pub fn from_string(token: String) -> Result<Self, AdminError> {
    let token = token.trim().to_string();
    if token.is_empty() || token.len() > 256 {
      return Err(AdminError::InvalidToken);
    }
    Ok(Self(token))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Hex SHA-256 of the token; only the hash is ever stored.
  pub fn hash(&self) -> String {
    hex::encode(Sha256::digest(self.0.as_bytes()))
  }
}
