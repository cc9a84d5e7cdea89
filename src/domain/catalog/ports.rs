use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::entities::{DashboardStats, Product, SettingKey};
use super::errors::CatalogError;

#[async_trait]
pub trait ProductRepository: Send + Sync {
  /// Ordered by sort order, then name.
  async fn list_with_stock(&self) -> Result<Vec<Product>, CatalogError>;
}

#[async_trait]
pub trait StatsRepository: Send + Sync {
  async fn dashboard_stats(&self, now: DateTime<Utc>) -> Result<DashboardStats, CatalogError>;
}

#[async_trait]
pub trait SettingRepository: Send + Sync {
  async fn get(&self, key: SettingKey) -> Result<Option<String>, CatalogError>;
  async fn set(&self, key: SettingKey, value: &str) -> Result<(), CatalogError>;
}

#[async_trait]
pub trait VisitorRepository: Send + Sync {
  async fn count(&self) -> Result<i64, CatalogError>;
  /// Idempotent per fingerprint. Returns true for a first visit.
  async fn record(&self, fingerprint: &str) -> Result<bool, CatalogError>;
}
