pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{Actor, AdminAccount, AdminSession};
pub use errors::AdminError;
pub use ports::{AdminGuard, AdminSessionRepository, PasswordVerifier, TokenGenerator};
pub use services::{AdminAccessService, IssuedSession};
pub use value_objects::SessionToken;
