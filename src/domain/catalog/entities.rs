use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// Product - catalog entry; optional flags are normalized by the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id: String,
  pub name: String,
  pub price: Decimal,
  pub compare_at_price: Option<Decimal>,
  pub category: Option<String>,
  /// Cards that are neither used nor reserved.
  pub stock: i64,
  pub is_active: Option<bool>,
  pub is_hot: Option<bool>,
  pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodStats {
  pub orders: i64,
  pub revenue: Decimal,
}

/// Paid or delivered orders, bucketed by creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
  pub today: PeriodStats,
  pub week: PeriodStats,
  pub month: PeriodStats,
  pub total: PeriodStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
  ShopName,
  LowStockThreshold,
}

impl SettingKey {
  pub fn as_str(&self) -> &'static str {
    match self {
      SettingKey::ShopName => "shop_name",
      SettingKey::LowStockThreshold => "low_stock_threshold",
    }
  }
}
