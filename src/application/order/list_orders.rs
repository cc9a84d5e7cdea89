use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;

use crate::domain::admin::Actor;
use crate::domain::order::{Order, OrderError, OrderListFilter, OrderService, OrderStatus};

pub const PAGE_SIZE: i64 = 50;
/// Highest page whose offset still fits in an i64.
const MAX_PAGE: i64 = i64::MAX / PAGE_SIZE;

#[derive(Debug)]
pub struct ListOrdersCommand {
  pub actor: Actor,
  pub status_filter: Option<String>,
  /// 1-based
  pub page: i64,
}

#[derive(Debug, Serialize)]
pub struct OrderListItemDto {
  pub order_id: String,
  pub product_name: String,
  pub amount: Decimal,
  pub email: Option<String>,
  pub status: String,
  pub has_card_key: bool,
  pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderListItemDto {
  fn from(o: Order) -> Self {
    Self {
      has_card_key: o.has_card_key(),
      order_id: o.order_id.to_string(),
      product_name: o.product_name,
      amount: o.amount,
      email: o.email,
      status: o.status.as_str().to_string(),
      created_at: o.created_at,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ListOrdersResponse {
  pub orders: Vec<OrderListItemDto>,
  pub total: i64,
  pub page: i64,
  pub total_pages: i64,
  pub status_filter: Option<String>,
  pub statuses: Vec<&'static str>,
}

pub struct ListOrdersUseCase {
  order_service: Arc<OrderService>,
}

impl ListOrdersUseCase {
  pub fn new(order_service: Arc<OrderService>) -> Self {
    Self { order_service }
  }

  pub async fn execute(&self, command: ListOrdersCommand) -> Result<ListOrdersResponse, OrderError> {
    let status = match command.status_filter.as_deref().map(str::trim) {
      Some("") | None => None,
      Some(s) => Some(OrderStatus::from_str(s)?),
    };
    let page = command.page.clamp(1, MAX_PAGE);

    let (orders, total) = self
      .order_service
      .list_orders(
        &command.actor,
        OrderListFilter {
          status,
          limit: PAGE_SIZE,
          offset: (page - 1) * PAGE_SIZE,
        },
      )
      .await?;

    Ok(ListOrdersResponse {
      orders: orders.into_iter().map(OrderListItemDto::from).collect(),
      total,
      page,
      total_pages: ((total + PAGE_SIZE - 1) / PAGE_SIZE).max(1),
      status_filter: status.map(|s| s.as_str().to_string()),
      statuses: OrderStatus::ALL.iter().map(|s| s.as_str()).collect(),
    })
  }
}
