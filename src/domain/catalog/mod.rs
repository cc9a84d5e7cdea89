pub mod entities;
pub mod errors;
pub mod ports;
pub mod value_objects;

pub use entities::{DashboardStats, PeriodStats, Product, SettingKey};
pub use errors::CatalogError;
pub use ports::{ProductRepository, SettingRepository, StatsRepository, VisitorRepository};
pub use value_objects::{LowStockThreshold, SettingValueError, ShopName};
