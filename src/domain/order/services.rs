use chrono::Utc;
use std::sync::Arc;

use crate::domain::admin::{Actor, AdminGuard};
use crate::domain::pages::{PageCache, paths};

use super::entities::{Card, Order, RefundRequest};
use super::errors::OrderError;
use super::ports::{OrderListFilter, OrderRepository, OrderUnitOfWork};
use super::value_objects::{OrderId, OrderStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteOrdersOutcome {
  pub deleted: usize,
  pub skipped: usize,
}

pub struct OrderService {
  order_repo: Arc<dyn OrderRepository>,
  admin_guard: Arc<dyn AdminGuard>,
  page_cache: Arc<dyn PageCache>,
}

impl OrderService {
  pub fn new(
    order_repo: Arc<dyn OrderRepository>,
    admin_guard: Arc<dyn AdminGuard>,
    page_cache: Arc<dyn PageCache>,
  ) -> Self {
    Self {
      order_repo,
      admin_guard,
      page_cache,
    }
  }

  // Lifecycle actions
  pub async fn mark_order_paid(&self, actor: &Actor, order_id: &str) -> Result<Order, OrderError> {
    self.admin_guard.check_admin(actor).await?;
    let order_id = OrderId::new(order_id)?;

    let mut uow = self.order_repo.begin().await?;
    let mut order = lock_order(uow.as_mut(), &order_id).await?;
    order.mark_paid(Utc::now());
    uow.save_lifecycle(&order).await?;
    uow.commit().await?;

    tracing::info!("Order {} marked paid", order_id);
    self.invalidate(paths::pages_for_order(order_id.value())).await;
    Ok(order)
  }

  pub async fn mark_order_delivered(
    &self,
    actor: &Actor,
    order_id: &str,
  ) -> Result<Order, OrderError> {
    self.admin_guard.check_admin(actor).await?;
    let order_id = OrderId::new(order_id)?;

    let mut uow = self.order_repo.begin().await?;
    let mut order = lock_order(uow.as_mut(), &order_id).await?;
    order.mark_delivered(Utc::now())?;
    uow.save_lifecycle(&order).await?;
    uow.commit().await?;

    tracing::info!("Order {} marked delivered", order_id);
    self.invalidate(paths::pages_for_order(order_id.value())).await;
    Ok(order)
  }

  /// Cancels the order and releases the unused cards it reserved, atomically.
  /// Returns the number of released cards.
  pub async fn cancel_order(&self, actor: &Actor, order_id: &str) -> Result<u64, OrderError> {
    self.admin_guard.check_admin(actor).await?;
    let order_id = OrderId::new(order_id)?;

    let mut uow = self.order_repo.begin().await?;
    if !uow.set_status(&order_id, OrderStatus::Cancelled).await? {
      return Err(OrderError::OrderNotFound(order_id.to_string()));
    }
    let released = uow.release_card_reservations(&order_id).await?;
    uow.commit().await?;

    tracing::info!(
      "Order {} cancelled, released {} card reservation(s)",
      order_id,
      released
    );
    self.invalidate(paths::pages_for_order(order_id.value())).await;
    Ok(released)
  }

  pub async fn update_order_email(
    &self,
    actor: &Actor,
    order_id: &str,
    email: Option<&str>,
  ) -> Result<Order, OrderError> {
    self.admin_guard.check_admin(actor).await?;
    let order_id = OrderId::new(order_id)?;

    let mut uow = self.order_repo.begin().await?;
    let mut order = lock_order(uow.as_mut(), &order_id).await?;
    order.change_email(email);
    uow.save_email(&order).await?;
    uow.commit().await?;

    tracing::info!("Order {} email updated", order_id);
    self.invalidate(paths::pages_for_order(order_id.value())).await;
    Ok(order)
  }

  /// Deletes one order. Returns false when the order did not exist.
  pub async fn delete_order(&self, actor: &Actor, order_id: &str) -> Result<bool, OrderError> {
    self.admin_guard.check_admin(actor).await?;
    let order_id = OrderId::new(order_id)?;

    let mut uow = self.order_repo.begin().await?;
    let deleted = delete_within(uow.as_mut(), &order_id).await?;
    uow.commit().await?;

    self.invalidate(paths::pages_for_order(order_id.value())).await;
    Ok(deleted)
  }

  /// Deletes a batch of orders in one transaction, skipping unknown and blank ids.
  pub async fn delete_orders(
    &self,
    actor: &Actor,
    order_ids: &[String],
  ) -> Result<DeleteOrdersOutcome, OrderError> {
    self.admin_guard.check_admin(actor).await?;

    let ids: Vec<OrderId> = order_ids
      .iter()
      .filter_map(|id| OrderId::new(id).ok())
      .collect();
    if ids.is_empty() {
      return Ok(DeleteOrdersOutcome::default());
    }

    let mut outcome = DeleteOrdersOutcome::default();
    let mut uow = self.order_repo.begin().await?;
    for id in &ids {
      if delete_within(uow.as_mut(), id).await? {
        outcome.deleted += 1;
      } else {
        outcome.skipped += 1;
      }
    }
    uow.commit().await?;

    tracing::info!(
      "Batch delete removed {} order(s), skipped {}",
      outcome.deleted,
      outcome.skipped
    );

    let mut pages = vec![
      paths::ADMIN_ORDERS.to_string(),
      paths::ADMIN_DASHBOARD.to_string(),
    ];
    for id in &ids {
      pages.push(paths::admin_order(id.value()));
      pages.push(paths::public_order(id.value()));
    }
    self.invalidate(pages).await;
    Ok(outcome)
  }

  // Reads
  pub async fn list_orders(
    &self,
    actor: &Actor,
    filter: OrderListFilter,
  ) -> Result<(Vec<Order>, i64), OrderError> {
    self.admin_guard.check_admin(actor).await?;

    let orders = self.order_repo.list(&filter).await?;
    let total = self.order_repo.count(filter.status).await?;
    Ok((orders, total))
  }

  pub async fn get_order_details(
    &self,
    actor: &Actor,
    order_id: &str,
  ) -> Result<(Order, Vec<RefundRequest>, Vec<Card>), OrderError> {
    self.admin_guard.check_admin(actor).await?;
    let order_id = OrderId::new(order_id)?;

    let order = self.load(&order_id).await?;
    let refunds = self.order_repo.find_refund_requests(&order_id).await?;
    let cards = self.order_repo.find_reserved_cards(&order_id).await?;
    Ok((order, refunds, cards))
  }

  /// Public lookup, no admin check.
  pub async fn get_order_status(&self, order_id: &str) -> Result<Order, OrderError> {
    let order_id = OrderId::new(order_id)?;
    self.load(&order_id).await
  }

  async fn load(&self, order_id: &OrderId) -> Result<Order, OrderError> {
    self
      .order_repo
      .find_by_order_id(order_id)
      .await?
      .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))
  }

  async fn invalidate(&self, pages: Vec<String>) {
    if let Err(e) = self.page_cache.invalidate(&pages).await {
      tracing::error!("Failed to invalidate cached pages {:?}: {}", pages, e);
    }
  }
}

/// Reads the order inside the transaction, holding its row until commit.
async fn lock_order(
  uow: &mut dyn OrderUnitOfWork,
  order_id: &OrderId,
) -> Result<Order, OrderError> {
  uow
    .find_order(order_id)
    .await?
    .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))
}

/// Removes one order and its dependents inside an open transaction.
async fn delete_within(
  uow: &mut dyn OrderUnitOfWork,
  order_id: &OrderId,
) -> Result<bool, OrderError> {
  if uow.find_order(order_id).await?.is_none() {
    tracing::debug!("Order {} not found, skipping delete", order_id);
    return Ok(false);
  }

  uow.release_card_reservations(order_id).await?;

  // Refund requests are optional; their absence never blocks the delete
  if let Err(e) = uow.delete_refund_requests(order_id).await {
    tracing::warn!(
      "Could not delete refund requests of order {}: {}",
      order_id,
      e
    );
  }

  uow.delete_order(order_id).await?;
  tracing::info!("Order {} deleted", order_id);
  Ok(true)
}
