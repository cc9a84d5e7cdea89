use serde::Serialize;
use std::sync::Arc;

use crate::domain::admin::Actor;
use crate::domain::order::{OrderError, OrderService};

#[derive(Debug)]
pub struct DeleteOrdersCommand {
  pub actor: Actor,
  pub order_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteOrdersResponse {
  pub deleted: usize,
  pub skipped: usize,
}

pub struct DeleteOrdersUseCase {
  order_service: Arc<OrderService>,
}

impl DeleteOrdersUseCase {
  pub fn new(order_service: Arc<OrderService>) -> Self {
    Self { order_service }
  }

  pub async fn execute(
    &self,
    command: DeleteOrdersCommand,
  ) -> Result<DeleteOrdersResponse, OrderError> {
    let outcome = self
      .order_service
      .delete_orders(&command.actor, &command.order_ids)
      .await?;

    Ok(DeleteOrdersResponse {
      deleted: outcome.deleted,
      skipped: outcome.skipped,
    })
  }
}
