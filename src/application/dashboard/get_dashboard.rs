use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

use crate::domain::admin::{Actor, AdminGuard};
use crate::domain::catalog::{
  CatalogError, DashboardStats, LowStockThreshold, Product, ProductRepository, SettingKey,
  SettingRepository, StatsRepository, VisitorRepository,
};
use crate::domain::order::{Order, OrderListFilter, OrderRepository};

pub const RECENT_ORDERS_LIMIT: i64 = 10;

#[derive(Debug)]
pub struct GetDashboardCommand {
  pub actor: Actor,
}

/// Product row with its optional flags resolved for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummaryDto {
  pub id: String,
  pub name: String,
  pub price: Decimal,
  pub compare_at_price: Option<Decimal>,
  pub category: Option<String>,
  pub stock: i64,
  pub is_active: bool,
  pub is_hot: bool,
  pub sort_order: i32,
  pub low_stock: bool,
}

impl ProductSummaryDto {
  fn from_product(p: Product, low_stock_threshold: i64) -> Self {
    let is_active = p.is_active.unwrap_or(true);
    Self {
      low_stock: is_active && p.stock <= low_stock_threshold,
      id: p.id,
      name: p.name,
      price: p.price,
      compare_at_price: p.compare_at_price,
      category: p.category,
      stock: p.stock,
      is_active,
      is_hot: p.is_hot.unwrap_or(false),
      sort_order: p.sort_order.unwrap_or(0),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentOrderDto {
  pub order_id: String,
  pub product_name: String,
  pub amount: Decimal,
  pub email: Option<String>,
  pub status: String,
  pub created_at: DateTime<Utc>,
}

impl From<Order> for RecentOrderDto {
  fn from(o: Order) -> Self {
    Self {
      order_id: o.order_id.to_string(),
      product_name: o.product_name,
      amount: o.amount,
      email: o.email,
      status: o.status.as_str().to_string(),
      created_at: o.created_at,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
  pub shop_name: Option<String>,
  pub stats: DashboardStats,
  pub products: Vec<ProductSummaryDto>,
  pub low_stock_count: usize,
  pub low_stock_threshold: i64,
  pub visitor_count: i64,
  pub recent_orders: Vec<RecentOrderDto>,
}

/// Admin landing page. Products and stats must load; every other source
/// falls back to a default when it fails.
pub struct GetDashboardUseCase {
  admin_guard: Arc<dyn AdminGuard>,
  product_repo: Arc<dyn ProductRepository>,
  stats_repo: Arc<dyn StatsRepository>,
  setting_repo: Arc<dyn SettingRepository>,
  visitor_repo: Arc<dyn VisitorRepository>,
  order_repo: Arc<dyn OrderRepository>,
}

impl GetDashboardUseCase {
  pub fn new(
    admin_guard: Arc<dyn AdminGuard>,
    product_repo: Arc<dyn ProductRepository>,
    stats_repo: Arc<dyn StatsRepository>,
    setting_repo: Arc<dyn SettingRepository>,
    visitor_repo: Arc<dyn VisitorRepository>,
    order_repo: Arc<dyn OrderRepository>,
  ) -> Self {
    Self {
      admin_guard,
      product_repo,
      stats_repo,
      setting_repo,
      visitor_repo,
      order_repo,
    }
  }

  pub async fn execute(&self, command: GetDashboardCommand) -> Result<DashboardResponse, CatalogError> {
    self.admin_guard.check_admin(&command.actor).await?;

    let (products, stats, shop_name, visitor_count, low_stock_threshold, recent_orders) = tokio::join!(
      self.product_repo.list_with_stock(),
      self.stats_repo.dashboard_stats(Utc::now()),
      self.shop_name(),
      self.visitor_count(),
      self.low_stock_threshold(),
      self.recent_orders(),
    );
    let products = products?;
    let stats = stats?;

    let products: Vec<ProductSummaryDto> = products
      .into_iter()
      .map(|p| ProductSummaryDto::from_product(p, low_stock_threshold))
      .collect();
    let low_stock_count = products.iter().filter(|p| p.low_stock).count();

    Ok(DashboardResponse {
      shop_name,
      stats,
      products,
      low_stock_count,
      low_stock_threshold,
      visitor_count,
      recent_orders,
    })
  }

  async fn shop_name(&self) -> Option<String> {
    match self.setting_repo.get(SettingKey::ShopName).await {
      Ok(name) => name,
      Err(e) => {
        tracing::warn!("Dashboard: shop name unavailable: {}", e);
        None
      }
    }
  }

  async fn visitor_count(&self) -> i64 {
    self.visitor_repo.count().await.unwrap_or_else(|e| {
      tracing::warn!("Dashboard: visitor count unavailable: {}", e);
      0
    })
  }

  async fn low_stock_threshold(&self) -> i64 {
    match self.setting_repo.get(SettingKey::LowStockThreshold).await {
      Ok(raw) => LowStockThreshold::from_setting(raw.as_deref()),
      Err(e) => {
        tracing::warn!("Dashboard: low stock threshold unavailable: {}", e);
        LowStockThreshold::DEFAULT
      }
    }
  }

  async fn recent_orders(&self) -> Vec<RecentOrderDto> {
    let filter = OrderListFilter {
      status: None,
      limit: RECENT_ORDERS_LIMIT,
      offset: 0,
    };

    match self.order_repo.list(&filter).await {
      Ok(orders) => orders.into_iter().map(RecentOrderDto::from).collect(),
      Err(e) => {
        tracing::warn!("Dashboard: recent orders unavailable: {}", e);
        Vec::new()
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::admin::AdminError;
  use crate::domain::catalog::PeriodStats;
  use crate::domain::order::OrderError;
  use crate::domain::order::services::tests::{InMemoryOrders, NamedAdmin, StoreState, order};
  use async_trait::async_trait;
  use rust_decimal_macros::dec;
  use std::collections::HashMap;
  use std::sync::Mutex;

  struct FixedProducts(Vec<Product>);

  #[async_trait]
  impl ProductRepository for FixedProducts {
    async fn list_with_stock(&self) -> Result<Vec<Product>, CatalogError> {
      Ok(self.0.clone())
    }
  }

  struct FixedStats;

  #[async_trait]
  impl StatsRepository for FixedStats {
    async fn dashboard_stats(&self, _now: DateTime<Utc>) -> Result<DashboardStats, CatalogError> {
      Ok(DashboardStats {
        total: PeriodStats {
          orders: 3,
          revenue: dec!(29.97),
        },
        ..Default::default()
      })
    }
  }

  #[derive(Default)]
  struct MapSettings(Mutex<HashMap<&'static str, String>>);

  #[async_trait]
  impl SettingRepository for MapSettings {
    async fn get(&self, key: SettingKey) -> Result<Option<String>, CatalogError> {
      Ok(self.0.lock().unwrap().get(key.as_str()).cloned())
    }

    async fn set(&self, key: SettingKey, value: &str) -> Result<(), CatalogError> {
      self.0.lock().unwrap().insert(key.as_str(), value.to_string());
      Ok(())
    }
  }

  struct FailingSettings;

  #[async_trait]
  impl SettingRepository for FailingSettings {
    async fn get(&self, _key: SettingKey) -> Result<Option<String>, CatalogError> {
      Err(CatalogError::Repository("settings table missing".to_string()))
    }

    async fn set(&self, _key: SettingKey, _value: &str) -> Result<(), CatalogError> {
      Err(CatalogError::Repository("settings table missing".to_string()))
    }
  }

  struct Visitors(Option<i64>);

  #[async_trait]
  impl VisitorRepository for Visitors {
    async fn count(&self) -> Result<i64, CatalogError> {
      self
        .0
        .ok_or_else(|| CatalogError::Repository("visitors table missing".to_string()))
    }

    async fn record(&self, _fingerprint: &str) -> Result<bool, CatalogError> {
      Ok(false)
    }
  }

  struct BrokenOrders;

  #[async_trait]
  impl OrderRepository for BrokenOrders {
    async fn find_by_order_id(
      &self,
      _order_id: &crate::domain::order::OrderId,
    ) -> Result<Option<Order>, OrderError> {
      Err(OrderError::Repository("down".to_string()))
    }

    async fn list(&self, _filter: &OrderListFilter) -> Result<Vec<Order>, OrderError> {
      Err(OrderError::Repository("down".to_string()))
    }

    async fn count(
      &self,
      _status: Option<crate::domain::order::OrderStatus>,
    ) -> Result<i64, OrderError> {
      Err(OrderError::Repository("down".to_string()))
    }

    async fn find_refund_requests(
      &self,
      _order_id: &crate::domain::order::OrderId,
    ) -> Result<Vec<crate::domain::order::RefundRequest>, OrderError> {
      Err(OrderError::Repository("down".to_string()))
    }

    async fn find_reserved_cards(
      &self,
      _order_id: &crate::domain::order::OrderId,
    ) -> Result<Vec<crate::domain::order::Card>, OrderError> {
      Err(OrderError::Repository("down".to_string()))
    }

    async fn begin(
      &self,
    ) -> Result<Box<dyn crate::domain::order::OrderUnitOfWork>, OrderError> {
      Err(OrderError::Repository("down".to_string()))
    }
  }

  fn product(id: &str, stock: i64) -> Product {
    Product {
      id: id.to_string(),
      name: format!("Product {}", id),
      price: dec!(9.99),
      compare_at_price: None,
      category: None,
      stock,
      is_active: None,
      is_hot: None,
      sort_order: None,
    }
  }

  fn orders_repo(count: usize) -> Arc<InMemoryOrders> {
    let mut state = StoreState::default();
    for i in 0..count {
      let mut o = order(&format!("ORD-{:02}", i), None);
      o.created_at = Utc::now() - chrono::Duration::minutes(i as i64);
      state.orders.insert(o.order_id.value().to_string(), o);
    }
    Arc::new(InMemoryOrders {
      state: Arc::new(Mutex::new(state)),
    })
  }

  fn use_case(
    settings: Arc<dyn SettingRepository>,
    visitors: Option<i64>,
    orders: Arc<dyn OrderRepository>,
  ) -> GetDashboardUseCase {
    GetDashboardUseCase::new(
      Arc::new(NamedAdmin),
      Arc::new(FixedProducts(vec![product("a", 2), product("b", 5), product("c", 40)])),
      Arc::new(FixedStats),
      settings,
      Arc::new(Visitors(visitors)),
      orders,
    )
  }

  fn admin() -> GetDashboardCommand {
    GetDashboardCommand {
      actor: Actor::admin("admin"),
    }
  }

  #[tokio::test]
  async fn test_dashboard_assembles_all_sources() {
    let settings = Arc::new(MapSettings::default());
    settings.set(SettingKey::ShopName, "Key Shop").await.unwrap();
    settings.set(SettingKey::LowStockThreshold, "10").await.unwrap();

    let dashboard = use_case(settings, Some(42), orders_repo(15))
      .execute(admin())
      .await
      .unwrap();

    assert_eq!(dashboard.shop_name.as_deref(), Some("Key Shop"));
    assert_eq!(dashboard.visitor_count, 42);
    assert_eq!(dashboard.low_stock_threshold, 10);
    assert_eq!(dashboard.low_stock_count, 2);
    assert_eq!(dashboard.stats.total.orders, 3);

    assert_eq!(dashboard.recent_orders.len(), 10);
    assert_eq!(dashboard.recent_orders[0].order_id, "ORD-00");
    assert_eq!(dashboard.recent_orders[9].order_id, "ORD-09");
  }

  #[tokio::test]
  async fn test_product_flags_are_normalized() {
    let dashboard = use_case(Arc::new(MapSettings::default()), Some(0), orders_repo(0))
      .execute(admin())
      .await
      .unwrap();

    let first = &dashboard.products[0];
    assert!(first.is_active);
    assert!(!first.is_hot);
    assert_eq!(first.sort_order, 0);
  }

  #[tokio::test]
  async fn test_low_stock_threshold_defaults_to_five() {
    let settings = Arc::new(MapSettings::default());
    let dashboard = use_case(settings.clone(), Some(0), orders_repo(0))
      .execute(admin())
      .await
      .unwrap();
    assert_eq!(dashboard.low_stock_threshold, 5);
    assert_eq!(dashboard.low_stock_count, 2);

    settings
      .set(SettingKey::LowStockThreshold, "plenty")
      .await
      .unwrap();
    let dashboard = use_case(settings, Some(0), orders_repo(0))
      .execute(admin())
      .await
      .unwrap();
    assert_eq!(dashboard.low_stock_threshold, 5);
  }

  #[tokio::test]
  async fn test_optional_sources_fall_back_to_defaults() {
    let dashboard = use_case(Arc::new(FailingSettings), None, Arc::new(BrokenOrders))
      .execute(admin())
      .await
      .unwrap();

    assert_eq!(dashboard.shop_name, None);
    assert_eq!(dashboard.visitor_count, 0);
    assert_eq!(dashboard.low_stock_threshold, 5);
    assert!(dashboard.recent_orders.is_empty());
    assert_eq!(dashboard.products.len(), 3);
  }

  #[tokio::test]
  async fn test_dashboard_requires_admin() {
    let result = use_case(Arc::new(MapSettings::default()), Some(0), orders_repo(0))
      .execute(GetDashboardCommand {
        actor: Actor::anonymous(),
      })
      .await;

    assert!(matches!(
      result,
      Err(CatalogError::Access(AdminError::Forbidden))
    ));
  }
}
