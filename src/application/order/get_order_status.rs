use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

use crate::domain::order::{OrderError, OrderService};

#[derive(Debug)]
pub struct GetOrderStatusCommand {
  pub order_id: String,
}

/// Public view of an order; never carries the card key.
#[derive(Debug, Serialize)]
pub struct OrderStatusResponse {
  pub order_id: String,
  pub product_name: String,
  pub amount: Decimal,
  pub status: String,
  pub created_at: DateTime<Utc>,
  pub paid_at: Option<DateTime<Utc>>,
  pub delivered_at: Option<DateTime<Utc>>,
}

pub struct GetOrderStatusUseCase {
  order_service: Arc<OrderService>,
}

impl GetOrderStatusUseCase {
  pub fn new(order_service: Arc<OrderService>) -> Self {
    Self { order_service }
  }

  pub async fn execute(
    &self,
    command: GetOrderStatusCommand,
  ) -> Result<OrderStatusResponse, OrderError> {
    let order = self
      .order_service
      .get_order_status(&command.order_id)
      .await?;

    Ok(OrderStatusResponse {
      order_id: order.order_id.to_string(),
      product_name: order.product_name,
      amount: order.amount,
      status: order.status.as_str().to_string(),
      created_at: order.created_at,
      paid_at: order.paid_at,
      delivered_at: order.delivered_at,
    })
  }
}
