use argon2::password_hash::SaltString;
use argon2::{
  Algorithm, Argon2, Params, Version,
  password_hash::{PasswordHash, PasswordHasher, PasswordVerifier as Argon2Verifier},
};
use async_trait::async_trait;

use crate::domain::admin::{AdminError, PasswordVerifier};

/// Argon2id verifier for the configured admin password hashes
///
/// Hashes produced by [`Argon2PasswordVerifier::hash`] use:
/// - Memory cost: 19 MiB (19456 KiB)
/// - Time cost: 2 iterations
/// - Parallelism: 1 thread
///
/// Verification reads the parameters from the PHC string, so hashes made
/// with other parameters still verify.
pub struct Argon2PasswordVerifier {
  argon2: Argon2<'static>,
}

impl Argon2PasswordVerifier {
  pub fn new() -> Result<Self, AdminError> {
    let params = Params::new(19456, 2, 1, Some(32))
      .map_err(|e| AdminError::Hash(format!("Failed to create Argon2 params: {}", e)))?;

    Ok(Self {
      argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
    })
  }

  /// Produce a PHC string for the admin account configuration
  pub fn hash(&self, password: &str) -> Result<String, AdminError> {
    let salt = SaltString::generate(&mut rand::rngs::OsRng);

    self
      .argon2
      .hash_password(password.as_bytes(), &salt)
      .map(|hash| hash.to_string())
      .map_err(|e| AdminError::Hash(format!("Failed to hash password: {}", e)))
  }
}

#[async_trait]
impl PasswordVerifier for Argon2PasswordVerifier {
  /// Constant-time comparison is done inside `verify_password`
  async fn verify(&self, password: &str, password_hash: &str) -> Result<bool, AdminError> {
    let parsed = PasswordHash::new(password_hash)
      .map_err(|e| AdminError::Hash(format!("Invalid hash format: {}", e)))?;

    match self.argon2.verify_password(password.as_bytes(), &parsed) {
      Ok(_) => Ok(true),
      Err(argon2::password_hash::Error::Password) => Ok(false),
      Err(e) => Err(AdminError::Hash(format!(
        "Password verification failed: {}",
        e
      ))),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_hash_then_verify() {
    let verifier = Argon2PasswordVerifier::new().unwrap();
    let hash = verifier.hash("correct horse").unwrap();

    assert!(hash.starts_with("$argon2id$"));
    assert!(verifier.verify("correct horse", &hash).await.unwrap());
    assert!(!verifier.verify("battery staple", &hash).await.unwrap());
  }

  #[tokio::test]
  async fn test_hash_uses_random_salt() {
    let verifier = Argon2PasswordVerifier::new().unwrap();
    let first = verifier.hash("secret").unwrap();
    let second = verifier.hash("secret").unwrap();

    assert_ne!(first, second);
  }

  #[tokio::test]
  async fn test_verify_rejects_malformed_hash() {
    let verifier = Argon2PasswordVerifier::new().unwrap();
    let result = verifier.verify("secret", "plaintext-secret").await;

    assert!(matches!(result, Err(AdminError::Hash(_))));
  }
}
