pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod templates;

// Re-export commonly used types
pub use dtos::{ErrorResponse, HealthResponse};
pub use errors::{ApiError, AuthErrorKind};
pub use handlers::admin_auth::SessionCookieSettings;
pub use middleware::{
  ActorExt, AdminIdentityMiddleware, PathRewriteMiddleware, RequestId, RequestIdExt,
  RequestIdMiddleware,
};
pub use routes::{WebRouteDependencies, configure_web_routes, login_submit_resource};
pub use templates::TemplateEngine;
