use thiserror::Error;

use super::value_objects::SettingValueError;
use crate::domain::admin::AdminError;

#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("{0}")]
  Validation(#[from] SettingValueError),

  #[error(transparent)]
  Access(#[from] AdminError),

  #[error("Repository error: {0}")]
  Repository(String),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}
