use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::errors::OrderError;
use super::value_objects::{OrderId, OrderStatus};

// Order - a purchase of one product, fulfilled with one card key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
  pub order_id: OrderId,
  pub product_id: String,
  pub product_name: String,
  pub amount: Decimal,
  pub email: Option<String>,
  pub status: OrderStatus,
  pub card_key: Option<String>,
  pub paid_at: Option<DateTime<Utc>>,
  pub delivered_at: Option<DateTime<Utc>>,
  pub created_at: DateTime<Utc>,
}

impl Order {
  #[cfg(test)]
  pub fn new(
    order_id: OrderId,
    product_id: String,
    product_name: String,
    amount: Decimal,
    email: Option<String>,
  ) -> Self {
    Self {
      order_id,
      product_id,
      product_name,
      amount,
      email,
      status: OrderStatus::Pending,
      card_key: None,
      paid_at: None,
      delivered_at: None,
      created_at: Utc::now(),
    }
  }

  /// No precondition on the prior status; re-applying overwrites the timestamp.
  pub fn mark_paid(&mut self, at: DateTime<Utc>) {
    self.status = OrderStatus::Paid;
    self.paid_at = Some(at);
  }

  pub fn mark_delivered(&mut self, at: DateTime<Utc>) -> Result<(), OrderError> {
    if !self.has_card_key() {
      return Err(OrderError::MissingCardKey);
    }

    self.status = OrderStatus::Delivered;
    self.delivered_at = Some(at);
    Ok(())
  }

  /// Trimmed; empty input clears the email. No format validation.
  pub fn change_email(&mut self, email: Option<&str>) {
    self.email = email
      .map(str::trim)
      .filter(|e| !e.is_empty())
      .map(str::to_string);
  }

  pub fn has_card_key(&self) -> bool {
    self
      .card_key
      .as_deref()
      .is_some_and(|key| !key.trim().is_empty())
  }
}

// Card - one redeemable key of a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
  pub id: i64,
  pub product_id: String,
  pub card_key: String,
  pub is_used: bool,
  pub reserved_order_id: Option<String>,
  pub reserved_at: Option<DateTime<Utc>>,
  pub used_at: Option<DateTime<Utc>>,
}

impl Card {
  #[cfg(test)]
  pub fn is_reserved_by(&self, order_id: &OrderId) -> bool {
    self.reserved_order_id.as_deref() == Some(order_id.value())
  }

  /// Clears the reservation of an unused card. Returns whether anything changed.
  #[cfg(test)]
  pub fn release_reservation(&mut self) -> bool {
    if self.is_used || self.reserved_order_id.is_none() {
      return false;
    }

    self.reserved_order_id = None;
    self.reserved_at = None;
    true
  }
}

// RefundRequest - buyer request to refund an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundRequest {
  pub id: i64,
  pub order_id: String,
  pub reason: Option<String>,
  pub status: String,
  pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  fn order() -> Order {
    Order::new(
      OrderId::new("ORD-1").unwrap(),
      "p-1".to_string(),
      "Game key".to_string(),
      dec!(9.99),
      None,
    )
  }

  fn card(is_used: bool) -> Card {
    Card {
      id: 1,
      product_id: "p-1".to_string(),
      card_key: "AAAA-BBBB".to_string(),
      is_used,
      reserved_order_id: Some("ORD-1".to_string()),
      reserved_at: Some(Utc::now()),
      used_at: None,
    }
  }

  #[test]
  fn test_new_order_is_pending() {
    let order = order();
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(order.paid_at.is_none());
    assert!(!order.has_card_key());
  }

  #[test]
  fn test_mark_paid_overwrites_timestamp() {
    let mut order = order();
    let first = Utc::now() - chrono::Duration::hours(1);
    order.mark_paid(first);
    assert_eq!(order.status, OrderStatus::Paid);
    assert_eq!(order.paid_at, Some(first));

    let second = Utc::now();
    order.mark_paid(second);
    assert_eq!(order.paid_at, Some(second));
  }

  #[test]
  fn test_mark_delivered_requires_card_key() {
    let mut order = order();
    let result = order.mark_delivered(Utc::now());

    assert!(matches!(result, Err(OrderError::MissingCardKey)));
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(order.delivered_at.is_none());

    order.card_key = Some("  ".to_string());
    assert!(order.mark_delivered(Utc::now()).is_err());

    order.card_key = Some("AAAA-BBBB".to_string());
    assert!(order.mark_delivered(Utc::now()).is_ok());
    assert_eq!(order.status, OrderStatus::Delivered);
    assert!(order.delivered_at.is_some());
  }

  #[test]
  fn test_change_email() {
    let mut order = order();
    order.change_email(Some("  buyer@example.com "));
    assert_eq!(order.email.as_deref(), Some("buyer@example.com"));

    order.change_email(Some("   "));
    assert_eq!(order.email, None);

    order.change_email(Some("not an email"));
    assert_eq!(order.email.as_deref(), Some("not an email"));

    order.change_email(None);
    assert_eq!(order.email, None);
  }

  #[test]
  fn test_release_reservation_only_when_unused() {
    let order_id = OrderId::new("ORD-1").unwrap();

    let mut unused = card(false);
    assert!(unused.is_reserved_by(&order_id));
    assert!(unused.release_reservation());
    assert!(unused.reserved_order_id.is_none());
    assert!(unused.reserved_at.is_none());

    let mut used = card(true);
    assert!(!used.release_reservation());
    assert!(used.is_reserved_by(&order_id));
    assert!(used.reserved_at.is_some());
  }
}
