use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;

use crate::domain::admin::{AdminError, TokenGenerator};

/// Session tokens: 32 bytes from the OS RNG, base64url without padding
#[derive(Default)]
pub struct SecureTokenGenerator;

impl SecureTokenGenerator {
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl TokenGenerator for SecureTokenGenerator {
  async fn generate(&self) -> Result<String, AdminError> {
    let mut token_bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut token_bytes);

    Ok(URL_SAFE_NO_PAD.encode(token_bytes))
  }
}
