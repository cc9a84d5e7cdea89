use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

use crate::domain::admin::Actor;
use crate::domain::order::{Card, OrderAction, OrderError, OrderService, RefundRequest};

#[derive(Debug)]
pub struct GetOrderDetailsCommand {
  pub actor: Actor,
  pub order_id: String,
}

#[derive(Debug, Serialize)]
pub struct RefundRequestDto {
  pub id: i64,
  pub reason: Option<String>,
  pub status: String,
  pub created_at: DateTime<Utc>,
}

impl From<RefundRequest> for RefundRequestDto {
  fn from(r: RefundRequest) -> Self {
    Self {
      id: r.id,
      reason: r.reason,
      status: r.status,
      created_at: r.created_at,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct CardDto {
  pub id: i64,
  pub card_key: String,
  pub is_used: bool,
  pub reserved_at: Option<DateTime<Utc>>,
}

impl From<Card> for CardDto {
  fn from(c: Card) -> Self {
    Self {
      id: c.id,
      card_key: c.card_key,
      is_used: c.is_used,
      reserved_at: c.reserved_at,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct OrderDetailsResponse {
  pub order_id: String,
  pub product_id: String,
  pub product_name: String,
  pub amount: Decimal,
  pub email: Option<String>,
  pub status: String,
  pub card_key: Option<String>,
  pub paid_at: Option<DateTime<Utc>>,
  pub delivered_at: Option<DateTime<Utc>>,
  pub created_at: DateTime<Utc>,
  pub actions: Vec<OrderAction>,
  pub refund_requests: Vec<RefundRequestDto>,
  pub reserved_cards: Vec<CardDto>,
}

pub struct GetOrderDetailsUseCase {
  order_service: Arc<OrderService>,
}

impl GetOrderDetailsUseCase {
  pub fn new(order_service: Arc<OrderService>) -> Self {
    Self { order_service }
  }

  pub async fn execute(
    &self,
    command: GetOrderDetailsCommand,
  ) -> Result<OrderDetailsResponse, OrderError> {
    let (order, refunds, cards) = self
      .order_service
      .get_order_details(&command.actor, &command.order_id)
      .await?;

    Ok(OrderDetailsResponse {
      actions: order.status.available_actions(),
      order_id: order.order_id.to_string(),
      product_id: order.product_id,
      product_name: order.product_name,
      amount: order.amount,
      email: order.email,
      status: order.status.as_str().to_string(),
      card_key: order.card_key,
      paid_at: order.paid_at,
      delivered_at: order.delivered_at,
      created_at: order.created_at,
      refund_requests: refunds.into_iter().map(RefundRequestDto::from).collect(),
      reserved_cards: cards.into_iter().map(CardDto::from).collect(),
    })
  }
}
