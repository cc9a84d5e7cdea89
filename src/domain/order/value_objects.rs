use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueObjectError {
  #[error("Missing order id")]
  MissingOrderId,

  #[error("Order id too long: maximum {max} characters")]
  OrderIdTooLong { max: usize },

  #[error("Unknown order status: {0}")]
  UnknownStatus(String),
}

// OrderId - trimmed, non-empty order identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(String);

impl OrderId {
  const MAX_LENGTH: usize = 128;

  pub fn new(value: impl AsRef<str>) -> Result<Self, ValueObjectError> {
    let trimmed = value.as_ref().trim();

    if trimmed.is_empty() {
      return Err(ValueObjectError::MissingOrderId);
    }

    if trimmed.len() > Self::MAX_LENGTH {
      return Err(ValueObjectError::OrderIdTooLong {
        max: Self::MAX_LENGTH,
      });
    }

    Ok(Self(trimmed.to_string()))
  }

  pub fn value(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for OrderId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// OrderStatus - order lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Paid,
  Delivered,
  Cancelled,
}

/// Admin actions offered for an order, derived from its status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderAction {
  MarkPaid,
  MarkDelivered,
  Cancel,
  Delete,
}

impl OrderStatus {
  pub const ALL: [OrderStatus; 4] = [
    OrderStatus::Pending,
    OrderStatus::Paid,
    OrderStatus::Delivered,
    OrderStatus::Cancelled,
  ];

  pub fn can_transition_to(&self, new_status: OrderStatus) -> bool {
    match (self, new_status) {
      (OrderStatus::Pending, OrderStatus::Paid) => true,
      (OrderStatus::Paid, OrderStatus::Delivered) => true,
      (OrderStatus::Pending, OrderStatus::Cancelled) => true,
      (OrderStatus::Paid, OrderStatus::Cancelled) => true,
      _ => false,
    }
  }

  pub fn available_actions(&self) -> Vec<OrderAction> {
    let mut actions = Vec::new();
    if self.can_transition_to(OrderStatus::Paid) {
      actions.push(OrderAction::MarkPaid);
    }
    if self.can_transition_to(OrderStatus::Delivered) {
      actions.push(OrderAction::MarkDelivered);
    }
    if self.can_transition_to(OrderStatus::Cancelled) {
      actions.push(OrderAction::Cancel);
    }
    // Any state can be deleted
    actions.push(OrderAction::Delete);
    actions
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Pending => "pending",
      OrderStatus::Paid => "paid",
      OrderStatus::Delivered => "delivered",
      OrderStatus::Cancelled => "cancelled",
    }
  }
}

impl FromStr for OrderStatus {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "pending" => Ok(OrderStatus::Pending),
      "paid" => Ok(OrderStatus::Paid),
      "delivered" => Ok(OrderStatus::Delivered),
      "cancelled" => Ok(OrderStatus::Cancelled),
      _ => Err(ValueObjectError::UnknownStatus(s.to_string())),
    }
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
