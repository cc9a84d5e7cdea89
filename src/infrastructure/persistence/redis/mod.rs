mod admin_session_repository;

pub use admin_session_repository::RedisAdminSessionRepository;
