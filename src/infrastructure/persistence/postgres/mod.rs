pub mod order_repository;
pub mod product_repository;
pub mod setting_repository;
pub mod stats_repository;
pub mod visitor_repository;

pub use order_repository::{PostgresOrderRepository, PostgresOrderUnitOfWork};
pub use product_repository::PostgresProductRepository;
pub use setting_repository::PostgresSettingRepository;
pub use stats_repository::PostgresStatsRepository;
pub use visitor_repository::PostgresVisitorRepository;
