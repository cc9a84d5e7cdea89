use serde::{Deserialize, Serialize};
use validator::Validate;

/// Admin login form
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AdminLoginForm {
  #[validate(length(
    min = 1,
    max = 64,
    message = "Username must be between 1 and 64 characters"
  ))]
  pub username: String,

  #[validate(length(
    min = 1,
    max = 256,
    message = "Password must be between 1 and 256 characters"
  ))]
  pub password: String,
}

/// Shop settings form on the dashboard
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ShopSettingsForm {
  #[validate(length(
    min = 1,
    max = 100,
    message = "Shop name must be between 1 and 100 characters"
  ))]
  pub shop_name: String,

  #[validate(range(
    min = 1,
    max = 100000,
    message = "Low stock threshold must be between 1 and 100000"
  ))]
  pub low_stock_threshold: i64,
}

/// Email edit on the order details page; blank clears the email
#[derive(Debug, Clone, Deserialize)]
pub struct OrderEmailForm {
  #[serde(default)]
  pub email: Option<String>,
}

/// Batch delete from the orders list
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteOrdersRequest {
  #[serde(default)]
  pub order_ids: Vec<String>,
}

/// Query string of the orders list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrdersQuery {
  pub status: Option<String>,
  pub page: Option<i64>,
}

/// Standard error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  /// Error type/code
  pub error: String,

  /// Human-readable error message
  pub message: String,

  /// Optional detailed error information
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
  pub status: &'static str,
}
