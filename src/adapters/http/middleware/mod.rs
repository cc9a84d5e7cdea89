pub mod admin_identity;
pub mod path_rewrite;
pub mod request_id;

pub use admin_identity::{ActorExt, AdminIdentityMiddleware, SESSION_COOKIE, session_token};
pub use path_rewrite::PathRewriteMiddleware;
pub use request_id::{RequestId, RequestIdExt, RequestIdMiddleware};
