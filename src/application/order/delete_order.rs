use std::sync::Arc;

use crate::domain::admin::Actor;
use crate::domain::order::{OrderError, OrderService};

#[derive(Debug)]
pub struct DeleteOrderCommand {
  pub actor: Actor,
  pub order_id: String,
}

pub struct DeleteOrderUseCase {
  order_service: Arc<OrderService>,
}

impl DeleteOrderUseCase {
  pub fn new(order_service: Arc<OrderService>) -> Self {
    Self { order_service }
  }

  pub async fn execute(&self, command: DeleteOrderCommand) -> Result<(), OrderError> {
    self
      .order_service
      .delete_order(&command.actor, &command.order_id)
      .await?;
    Ok(())
  }
}
