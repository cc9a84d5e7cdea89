use std::sync::Arc;

use super::mark_order_paid::OrderStatusChangedResponse;
use crate::domain::admin::Actor;
use crate::domain::order::{OrderError, OrderService};

#[derive(Debug)]
pub struct MarkOrderDeliveredCommand {
  pub actor: Actor,
  pub order_id: String,
}

pub struct MarkOrderDeliveredUseCase {
  order_service: Arc<OrderService>,
}

impl MarkOrderDeliveredUseCase {
  pub fn new(order_service: Arc<OrderService>) -> Self {
    Self { order_service }
  }

  pub async fn execute(
    &self,
    command: MarkOrderDeliveredCommand,
  ) -> Result<OrderStatusChangedResponse, OrderError> {
    let order = self
      .order_service
      .mark_order_delivered(&command.actor, &command.order_id)
      .await?;

    Ok(OrderStatusChangedResponse {
      order_id: order.order_id.to_string(),
      status: order.status.as_str().to_string(),
      changed_at: order.delivered_at,
    })
  }
}
