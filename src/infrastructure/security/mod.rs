mod argon2_verifier;
mod token_generator;

pub use argon2_verifier::Argon2PasswordVerifier;
pub use token_generator::SecureTokenGenerator;
