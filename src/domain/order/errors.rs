use thiserror::Error;

use super::value_objects::ValueObjectError;
use crate::domain::admin::AdminError;

#[derive(Debug, Error)]
pub enum OrderError {
  #[error("{0}")]
  Validation(#[from] ValueObjectError),

  #[error(transparent)]
  Access(#[from] AdminError),

  #[error("Order not found")]
  OrderNotFound(String),

  #[error("Missing card key; cannot mark delivered")]
  MissingCardKey,

  #[error("Repository error: {0}")]
  Repository(String),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}
