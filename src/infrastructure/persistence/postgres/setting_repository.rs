use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::catalog::{CatalogError, SettingKey, SettingRepository};

pub struct PostgresSettingRepository {
  pool: PgPool,
}

impl PostgresSettingRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl SettingRepository for PostgresSettingRepository {
  async fn get(&self, key: SettingKey) -> Result<Option<String>, CatalogError> {
    sqlx::query_scalar::<_, String>("SELECT value FROM settings WHERE key = $1")
      .bind(key.as_str())
      .fetch_optional(&self.pool)
      .await
      .map_err(|e| {
        tracing::error!("Failed to read setting {}: {}", key.as_str(), e);
        CatalogError::Repository(e.to_string())
      })
  }

  async fn set(&self, key: SettingKey, value: &str) -> Result<(), CatalogError> {
    sqlx::query(
      r#"
      INSERT INTO settings (key, value, updated_at)
      VALUES ($1, $2, NOW())
      ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
      "#,
    )
    .bind(key.as_str())
    .bind(value)
    .execute(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to write setting {}: {}", key.as_str(), e);
      CatalogError::Repository(e.to_string())
    })?;

    Ok(())
  }
}
