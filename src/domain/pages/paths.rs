//! Paths of the rendered pages that mutations invalidate.

pub const ADMIN_DASHBOARD: &str = "/admin";
pub const ADMIN_ORDERS: &str = "/admin/orders";

pub fn admin_order(order_id: &str) -> String {
  format!("{}/{}", ADMIN_ORDERS, order_id)
}

pub fn public_order(order_id: &str) -> String {
  format!("/order/{}", order_id)
}

/// Every page that shows a given order, including the public status page.
pub fn pages_for_order(order_id: &str) -> Vec<String> {
  vec![
    ADMIN_ORDERS.to_string(),
    admin_order(order_id),
    public_order(order_id),
    ADMIN_DASHBOARD.to_string(),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_order_paths() {
    assert_eq!(admin_order("ORD-1"), "/admin/orders/ORD-1");
    assert_eq!(public_order("ORD-1"), "/order/ORD-1");
    assert_eq!(
      pages_for_order("ORD-1"),
      vec!["/admin/orders", "/admin/orders/ORD-1", "/order/ORD-1", "/admin"]
    );
  }
}
