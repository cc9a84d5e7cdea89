use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::domain::admin::Actor;
use crate::domain::order::{OrderError, OrderService};

#[derive(Debug)]
pub struct MarkOrderPaidCommand {
  pub actor: Actor,
  pub order_id: String,
}

#[derive(Debug, Serialize)]
pub struct OrderStatusChangedResponse {
  pub order_id: String,
  pub status: String,
  pub changed_at: Option<DateTime<Utc>>,
}

pub struct MarkOrderPaidUseCase {
  order_service: Arc<OrderService>,
}

impl MarkOrderPaidUseCase {
  pub fn new(order_service: Arc<OrderService>) -> Self {
    Self { order_service }
  }

  pub async fn execute(
    &self,
    command: MarkOrderPaidCommand,
  ) -> Result<OrderStatusChangedResponse, OrderError> {
    let order = self
      .order_service
      .mark_order_paid(&command.actor, &command.order_id)
      .await?;

    Ok(OrderStatusChangedResponse {
      order_id: order.order_id.to_string(),
      status: order.status.as_str().to_string(),
      changed_at: order.paid_at,
    })
  }
}
