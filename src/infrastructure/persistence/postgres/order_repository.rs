use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Connection, FromRow, PgPool, Postgres, Transaction};
use std::str::FromStr;

use crate::domain::order::{
  Card, Order, OrderError, OrderId, OrderListFilter, OrderRepository, OrderStatus,
  OrderUnitOfWork, RefundRequest,
};

/// Database row structure for orders table
#[derive(Debug, FromRow)]
struct OrderRow {
  order_id: String,
  product_id: String,
  product_name: String,
  amount: Decimal,
  email: Option<String>,
  status: Option<String>,
  card_key: Option<String>,
  paid_at: Option<DateTime<Utc>>,
  delivered_at: Option<DateTime<Utc>>,
  created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
  type Error = OrderError;

  fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
    // Legacy rows may carry no status at all
    let status = match row.status.as_deref() {
      Some(s) => OrderStatus::from_str(s)?,
      None => OrderStatus::Pending,
    };

    Ok(Order {
      order_id: OrderId::new(row.order_id)?,
      product_id: row.product_id,
      product_name: row.product_name,
      amount: row.amount,
      email: row.email,
      status,
      card_key: row.card_key,
      paid_at: row.paid_at,
      delivered_at: row.delivered_at,
      created_at: row.created_at,
    })
  }
}

#[derive(Debug, FromRow)]
struct CardRow {
  id: i64,
  product_id: String,
  card_key: String,
  is_used: bool,
  reserved_order_id: Option<String>,
  reserved_at: Option<DateTime<Utc>>,
  used_at: Option<DateTime<Utc>>,
}

impl From<CardRow> for Card {
  fn from(row: CardRow) -> Self {
    Card {
      id: row.id,
      product_id: row.product_id,
      card_key: row.card_key,
      is_used: row.is_used,
      reserved_order_id: row.reserved_order_id,
      reserved_at: row.reserved_at,
      used_at: row.used_at,
    }
  }
}

#[derive(Debug, FromRow)]
struct RefundRequestRow {
  id: i64,
  order_id: String,
  reason: Option<String>,
  status: String,
  created_at: DateTime<Utc>,
}

impl From<RefundRequestRow> for RefundRequest {
  fn from(row: RefundRequestRow) -> Self {
    RefundRequest {
      id: row.id,
      order_id: row.order_id,
      reason: row.reason,
      status: row.status,
      created_at: row.created_at,
    }
  }
}

const ORDER_COLUMNS: &str = "order_id, product_id, product_name, amount, email, status, \
   card_key, paid_at, delivered_at, created_at";

fn query_failed(context: &str, e: sqlx::Error) -> OrderError {
  tracing::error!("{}: {}", context, e);
  OrderError::Repository(e.to_string())
}

/// PostgreSQL implementation of the OrderRepository trait
pub struct PostgresOrderRepository {
  pool: PgPool,
}

impl PostgresOrderRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
  async fn find_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderError> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
      "SELECT {} FROM orders WHERE order_id = $1",
      ORDER_COLUMNS
    ))
    .bind(order_id.value())
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| query_failed("Failed to find order", e))?;

    row.map(Order::try_from).transpose()
  }

  async fn list(&self, filter: &OrderListFilter) -> Result<Vec<Order>, OrderError> {
    let rows = sqlx::query_as::<_, OrderRow>(&format!(
      r#"
      SELECT {}
      FROM orders
      WHERE ($1::TEXT IS NULL OR COALESCE(status, 'pending') = $1)
      ORDER BY created_at DESC
      LIMIT $2 OFFSET $3
      "#,
      ORDER_COLUMNS
    ))
    .bind(filter.status.map(|s| s.as_str()))
    .bind(filter.limit)
    .bind(filter.offset)
    .fetch_all(&self.pool)
    .await
    .map_err(|e| query_failed("Failed to list orders", e))?;

    rows.into_iter().map(Order::try_from).collect()
  }

  async fn count(&self, status: Option<OrderStatus>) -> Result<i64, OrderError> {
    sqlx::query_scalar::<_, i64>(
      "SELECT COUNT(*) FROM orders WHERE ($1::TEXT IS NULL OR COALESCE(status, 'pending') = $1)",
    )
    .bind(status.map(|s| s.as_str()))
    .fetch_one(&self.pool)
    .await
    .map_err(|e| query_failed("Failed to count orders", e))
  }

  async fn find_refund_requests(
    &self,
    order_id: &OrderId,
  ) -> Result<Vec<RefundRequest>, OrderError> {
    let rows = sqlx::query_as::<_, RefundRequestRow>(
      r#"
      SELECT id, order_id, reason, status, created_at
      FROM refund_requests
      WHERE order_id = $1
      ORDER BY created_at DESC
      "#,
    )
    .bind(order_id.value())
    .fetch_all(&self.pool)
    .await
    .map_err(|e| query_failed("Failed to find refund requests", e))?;

    Ok(rows.into_iter().map(RefundRequest::from).collect())
  }

  async fn find_reserved_cards(&self, order_id: &OrderId) -> Result<Vec<Card>, OrderError> {
    let rows = sqlx::query_as::<_, CardRow>(
      r#"
      SELECT id, product_id, card_key, is_used, reserved_order_id, reserved_at, used_at
      FROM cards
      WHERE reserved_order_id = $1
      ORDER BY id
      "#,
    )
    .bind(order_id.value())
    .fetch_all(&self.pool)
    .await
    .map_err(|e| query_failed("Failed to find reserved cards", e))?;

    Ok(rows.into_iter().map(Card::from).collect())
  }

  async fn begin(&self) -> Result<Box<dyn OrderUnitOfWork>, OrderError> {
    let tx = self
      .pool
      .begin()
      .await
      .map_err(|e| query_failed("Failed to begin transaction", e))?;
    Ok(Box::new(PostgresOrderUnitOfWork { tx }))
  }
}

/// Order mutations sharing one transaction. Dropped without commit means
/// rollback.
pub struct PostgresOrderUnitOfWork {
  tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl OrderUnitOfWork for PostgresOrderUnitOfWork {
  async fn find_order(&mut self, order_id: &OrderId) -> Result<Option<Order>, OrderError> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
      "SELECT {} FROM orders WHERE order_id = $1 FOR UPDATE",
      ORDER_COLUMNS
    ))
    .bind(order_id.value())
    .fetch_optional(&mut *self.tx)
    .await
    .map_err(|e| query_failed("Failed to lock order", e))?;

    row.map(Order::try_from).transpose()
  }

  async fn save_lifecycle(&mut self, order: &Order) -> Result<(), OrderError> {
    let result = sqlx::query(
      "UPDATE orders SET status = $2, paid_at = $3, delivered_at = $4 WHERE order_id = $1",
    )
    .bind(order.order_id.value())
    .bind(order.status.as_str())
    .bind(order.paid_at)
    .bind(order.delivered_at)
    .execute(&mut *self.tx)
    .await
    .map_err(|e| query_failed("Failed to save order status", e))?;

    if result.rows_affected() == 0 {
      return Err(OrderError::OrderNotFound(order.order_id.to_string()));
    }
    Ok(())
  }

  async fn save_email(&mut self, order: &Order) -> Result<(), OrderError> {
    let result = sqlx::query("UPDATE orders SET email = $2 WHERE order_id = $1")
      .bind(order.order_id.value())
      .bind(order.email.as_deref())
      .execute(&mut *self.tx)
      .await
      .map_err(|e| query_failed("Failed to save order email", e))?;

    if result.rows_affected() == 0 {
      return Err(OrderError::OrderNotFound(order.order_id.to_string()));
    }
    Ok(())
  }

  async fn set_status(&mut self, order_id: &OrderId, status: OrderStatus) -> Result<bool, OrderError> {
    let result = sqlx::query("UPDATE orders SET status = $2 WHERE order_id = $1")
      .bind(order_id.value())
      .bind(status.as_str())
      .execute(&mut *self.tx)
      .await
      .map_err(|e| query_failed("Failed to set order status", e))?;

    Ok(result.rows_affected() > 0)
  }

  async fn release_card_reservations(&mut self, order_id: &OrderId) -> Result<u64, OrderError> {
    let result = sqlx::query(
      r#"
      UPDATE cards
      SET reserved_order_id = NULL, reserved_at = NULL
      WHERE reserved_order_id = $1 AND is_used = FALSE
      "#,
    )
    .bind(order_id.value())
    .execute(&mut *self.tx)
    .await
    .map_err(|e| query_failed("Failed to release card reservations", e))?;

    Ok(result.rows_affected())
  }

  async fn delete_refund_requests(&mut self, order_id: &OrderId) -> Result<u64, OrderError> {
    // Runs under a savepoint: a failure here must leave the outer
    // transaction usable.
    let mut savepoint = Connection::begin(&mut *self.tx).await?;

    match sqlx::query("DELETE FROM refund_requests WHERE order_id = $1")
      .bind(order_id.value())
      .execute(&mut *savepoint)
      .await
    {
      Ok(result) => {
        savepoint.commit().await?;
        Ok(result.rows_affected())
      }
      Err(e) => {
        savepoint.rollback().await?;
        Err(OrderError::Repository(e.to_string()))
      }
    }
  }

  async fn delete_order(&mut self, order_id: &OrderId) -> Result<bool, OrderError> {
    let result = sqlx::query("DELETE FROM orders WHERE order_id = $1")
      .bind(order_id.value())
      .execute(&mut *self.tx)
      .await
      .map_err(|e| query_failed("Failed to delete order", e))?;

    Ok(result.rows_affected() > 0)
  }

  async fn commit(self: Box<Self>) -> Result<(), OrderError> {
    self
      .tx
      .commit()
      .await
      .map_err(|e| query_failed("Failed to commit transaction", e))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use super::super::test_support::{insert_card, insert_order, insert_product, setup_test_db};

  #[tokio::test]
  #[ignore = "requires docker"]
  async fn test_find_and_save_order() {
    let (pool, _container) = setup_test_db().await;
    insert_order(&pool, "ORD-1", "pending", None).await;
    let repo = PostgresOrderRepository::new(pool.clone());

    let id = OrderId::new("ORD-1").unwrap();
    let mut uow = repo.begin().await.unwrap();
    let mut order = uow.find_order(&id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Pending);

    order.mark_paid(Utc::now());
    uow.save_lifecycle(&order).await.unwrap();
    uow.commit().await.unwrap();

    let stored = repo.find_by_order_id(&id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatus::Paid);
    assert!(stored.paid_at.is_some());
    assert_eq!(stored.email, order.email);

    // A concurrent email edit keeps the payment written above
    let mut uow = repo.begin().await.unwrap();
    let mut stale = order.clone();
    stale.status = OrderStatus::Pending;
    stale.change_email(Some("other@example.com"));
    uow.save_email(&stale).await.unwrap();
    uow.commit().await.unwrap();

    let stored = repo.find_by_order_id(&id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatus::Paid);
    assert_eq!(stored.email.as_deref(), Some("other@example.com"));

    let missing = OrderId::new("ORD-404").unwrap();
    assert!(repo.find_by_order_id(&missing).await.unwrap().is_none());
  }

  #[tokio::test]
  #[ignore = "requires docker"]
  async fn test_list_filters_and_paginates() {
    let (pool, _container) = setup_test_db().await;
    insert_order(&pool, "ORD-1", "pending", None).await;
    insert_order(&pool, "ORD-2", "paid", None).await;
    insert_order(&pool, "ORD-3", "paid", None).await;
    let repo = PostgresOrderRepository::new(pool.clone());

    let paid = repo
      .list(&OrderListFilter {
        status: Some(OrderStatus::Paid),
        limit: 50,
        offset: 0,
      })
      .await
      .unwrap();
    assert_eq!(paid.len(), 2);
    assert_eq!(repo.count(Some(OrderStatus::Paid)).await.unwrap(), 2);
    assert_eq!(repo.count(None).await.unwrap(), 3);

    let page = repo
      .list(&OrderListFilter {
        status: None,
        limit: 2,
        offset: 2,
      })
      .await
      .unwrap();
    assert_eq!(page.len(), 1);
  }

  #[tokio::test]
  #[ignore = "requires docker"]
  async fn test_release_keeps_used_cards() {
    let (pool, _container) = setup_test_db().await;
    insert_product(&pool, "p-1").await;
    insert_order(&pool, "ORD-1", "pending", None).await;
    insert_card(&pool, "p-1", Some("ORD-1"), false).await;
    insert_card(&pool, "p-1", Some("ORD-1"), true).await;
    let repo = PostgresOrderRepository::new(pool.clone());
    let id = OrderId::new("ORD-1").unwrap();

    let mut uow = repo.begin().await.unwrap();
    assert!(uow.set_status(&id, OrderStatus::Cancelled).await.unwrap());
    assert_eq!(uow.release_card_reservations(&id).await.unwrap(), 1);
    uow.commit().await.unwrap();

    let cards = repo.find_reserved_cards(&id).await.unwrap();
    assert_eq!(cards.len(), 1);
    assert!(cards[0].is_used);
  }

  #[tokio::test]
  #[ignore = "requires docker"]
  async fn test_delete_survives_missing_refund_table() {
    let (pool, _container) = setup_test_db().await;
    insert_product(&pool, "p-1").await;
    insert_order(&pool, "ORD-1", "pending", None).await;
    insert_card(&pool, "p-1", Some("ORD-1"), false).await;
    sqlx::query("DROP TABLE refund_requests")
      .execute(&pool)
      .await
      .unwrap();
    let repo = PostgresOrderRepository::new(pool.clone());
    let id = OrderId::new("ORD-1").unwrap();

    let mut uow = repo.begin().await.unwrap();
    assert!(uow.find_order(&id).await.unwrap().is_some());
    uow.release_card_reservations(&id).await.unwrap();
    assert!(uow.delete_refund_requests(&id).await.is_err());
    // The transaction is still usable after the failed statement
    assert!(uow.delete_order(&id).await.unwrap());
    uow.commit().await.unwrap();

    assert!(repo.find_by_order_id(&id).await.unwrap().is_none());
    assert!(repo.find_reserved_cards(&id).await.unwrap().is_empty());
  }

  #[tokio::test]
  #[ignore = "requires docker"]
  async fn test_uncommitted_unit_of_work_rolls_back() {
    let (pool, _container) = setup_test_db().await;
    insert_order(&pool, "ORD-1", "pending", None).await;
    let repo = PostgresOrderRepository::new(pool.clone());
    let id = OrderId::new("ORD-1").unwrap();

    {
      let mut uow = repo.begin().await.unwrap();
      assert!(uow.delete_order(&id).await.unwrap());
    }

    assert!(repo.find_by_order_id(&id).await.unwrap().is_some());
  }
}
