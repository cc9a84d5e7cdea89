//! Admin session use cases
//!
//! Login and logout for configured back-office accounts.

mod login_admin;
mod logout_admin;

pub use login_admin::{LoginAdminCommand, LoginAdminResponse, LoginAdminUseCase};
pub use logout_admin::LogoutAdminUseCase;
