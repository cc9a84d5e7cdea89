use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::catalog::{CatalogError, VisitorRepository};

pub struct PostgresVisitorRepository {
  pool: PgPool,
}

impl PostgresVisitorRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl VisitorRepository for PostgresVisitorRepository {
  async fn count(&self) -> Result<i64, CatalogError> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM visitors")
      .fetch_one(&self.pool)
      .await
      .map_err(|e| {
        tracing::error!("Failed to count visitors: {}", e);
        CatalogError::Repository(e.to_string())
      })
  }

  async fn record(&self, fingerprint: &str) -> Result<bool, CatalogError> {
    let result = sqlx::query(
      "INSERT INTO visitors (fingerprint) VALUES ($1) ON CONFLICT (fingerprint) DO NOTHING",
    )
    .bind(fingerprint)
    .execute(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to record visitor: {}", e);
      CatalogError::Repository(e.to_string())
    })?;

    Ok(result.rows_affected() > 0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use super::super::test_support::setup_test_db;

  #[tokio::test]
  #[ignore = "requires docker"]
  async fn test_visitors_are_counted_once() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresVisitorRepository::new(pool);

    assert!(repo.record("a").await.unwrap());
    assert!(!repo.record("a").await.unwrap());
    assert!(repo.record("b").await.unwrap());

    assert_eq!(repo.count().await.unwrap(), 2);
  }
}
