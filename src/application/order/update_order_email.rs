use serde::Serialize;
use std::sync::Arc;

use crate::domain::admin::Actor;
use crate::domain::order::{OrderError, OrderService};

#[derive(Debug)]
pub struct UpdateOrderEmailCommand {
  pub actor: Actor,
  pub order_id: String,
  pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateOrderEmailResponse {
  pub order_id: String,
  pub email: Option<String>,
}

pub struct UpdateOrderEmailUseCase {
  order_service: Arc<OrderService>,
}

impl UpdateOrderEmailUseCase {
  pub fn new(order_service: Arc<OrderService>) -> Self {
    Self { order_service }
  }

  pub async fn execute(
    &self,
    command: UpdateOrderEmailCommand,
  ) -> Result<UpdateOrderEmailResponse, OrderError> {
    let order = self
      .order_service
      .update_order_email(&command.actor, &command.order_id, command.email.as_deref())
      .await?;

    Ok(UpdateOrderEmailResponse {
      order_id: order.order_id.to_string(),
      email: order.email,
    })
  }
}
