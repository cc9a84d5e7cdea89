use serde::Serialize;
use std::sync::Arc;

use crate::domain::admin::Actor;
use crate::domain::order::{OrderError, OrderService};

#[derive(Debug)]
pub struct CancelOrderCommand {
  pub actor: Actor,
  pub order_id: String,
}

#[derive(Debug, Serialize)]
pub struct CancelOrderResponse {
  pub order_id: String,
  pub released_cards: u64,
}

pub struct CancelOrderUseCase {
  order_service: Arc<OrderService>,
}

impl CancelOrderUseCase {
  pub fn new(order_service: Arc<OrderService>) -> Self {
    Self { order_service }
  }

  pub async fn execute(&self, command: CancelOrderCommand) -> Result<CancelOrderResponse, OrderError> {
    let released_cards = self
      .order_service
      .cancel_order(&command.actor, &command.order_id)
      .await?;

    Ok(CancelOrderResponse {
      order_id: command.order_id.trim().to_string(),
      released_cards,
    })
  }
}
