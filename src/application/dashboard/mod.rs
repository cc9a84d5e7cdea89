//! Dashboard use cases
//!
//! Read-side aggregation of the admin landing page and the shop settings
//! edited from it.

mod get_dashboard;
mod update_shop_settings;

pub use get_dashboard::{
  DashboardResponse, GetDashboardCommand, GetDashboardUseCase, ProductSummaryDto,
  RecentOrderDto, RECENT_ORDERS_LIMIT,
};
pub use update_shop_settings::{
  UpdateShopSettingsCommand, UpdateShopSettingsResponse, UpdateShopSettingsUseCase,
};
