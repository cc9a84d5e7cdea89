use async_trait::async_trait;

use super::entities::{Card, Order, RefundRequest};
use super::errors::OrderError;
use super::value_objects::{OrderId, OrderStatus};

#[derive(Debug, Clone, Default)]
pub struct OrderListFilter {
  pub status: Option<OrderStatus>,
  pub limit: i64,
  pub offset: i64,
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
  async fn find_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderError>;
  /// Newest first.
  async fn list(&self, filter: &OrderListFilter) -> Result<Vec<Order>, OrderError>;
  async fn count(&self, status: Option<OrderStatus>) -> Result<i64, OrderError>;
  async fn find_refund_requests(&self, order_id: &OrderId)
  -> Result<Vec<RefundRequest>, OrderError>;
  async fn find_reserved_cards(&self, order_id: &OrderId) -> Result<Vec<Card>, OrderError>;
  /// Opens a transaction; dropping it without `commit` rolls back.
  async fn begin(&self) -> Result<Box<dyn OrderUnitOfWork>, OrderError>;
}

/// Statements that must commit or roll back together.
#[async_trait]
pub trait OrderUnitOfWork: Send {
  /// Locks the row until commit or rollback.
  async fn find_order(&mut self, order_id: &OrderId) -> Result<Option<Order>, OrderError>;
  /// Writes status and the paid/delivered timestamps, nothing else.
  async fn save_lifecycle(&mut self, order: &Order) -> Result<(), OrderError>;
  async fn save_email(&mut self, order: &Order) -> Result<(), OrderError>;
  /// Returns false when no such order exists.
  async fn set_status(&mut self, order_id: &OrderId, status: OrderStatus)
  -> Result<bool, OrderError>;
  /// Clears reservation fields of unused cards reserved by the order.
  async fn release_card_reservations(&mut self, order_id: &OrderId) -> Result<u64, OrderError>;
  /// A failure here must leave the transaction usable.
  async fn delete_refund_requests(&mut self, order_id: &OrderId) -> Result<u64, OrderError>;
  async fn delete_order(&mut self, order_id: &OrderId) -> Result<bool, OrderError>;
  async fn commit(self: Box<Self>) -> Result<(), OrderError>;
}
