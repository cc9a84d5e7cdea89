use std::sync::Arc;

use crate::domain::admin::{Actor, AdminGuard};
use crate::domain::catalog::{
  CatalogError, LowStockThreshold, SettingKey, SettingRepository, ShopName,
};
use crate::domain::pages::{PageCache, paths};

#[derive(Debug)]
pub struct UpdateShopSettingsCommand {
  pub actor: Actor,
  pub shop_name: String,
  pub low_stock_threshold: i64,
}

#[derive(Debug, Clone)]
pub struct UpdateShopSettingsResponse {
  pub shop_name: String,
  pub low_stock_threshold: i64,
}

pub struct UpdateShopSettingsUseCase {
  admin_guard: Arc<dyn AdminGuard>,
  setting_repo: Arc<dyn SettingRepository>,
  page_cache: Arc<dyn PageCache>,
}

impl UpdateShopSettingsUseCase {
  pub fn new(
    admin_guard: Arc<dyn AdminGuard>,
    setting_repo: Arc<dyn SettingRepository>,
    page_cache: Arc<dyn PageCache>,
  ) -> Self {
    Self {
      admin_guard,
      setting_repo,
      page_cache,
    }
  }

  pub async fn execute(
    &self,
    command: UpdateShopSettingsCommand,
  ) -> Result<UpdateShopSettingsResponse, CatalogError> {
    self.admin_guard.check_admin(&command.actor).await?;

    let shop_name = ShopName::new(&command.shop_name)?;
    let threshold = LowStockThreshold::new(command.low_stock_threshold)?;

    self
      .setting_repo
      .set(SettingKey::ShopName, shop_name.value())
      .await?;
    self
      .setting_repo
      .set(SettingKey::LowStockThreshold, &threshold.value().to_string())
      .await?;

    tracing::info!(
      "Shop settings updated: shop_name={}, low_stock_threshold={}",
      shop_name.value(),
      threshold.value()
    );

    let pages = vec![paths::ADMIN_DASHBOARD.to_string()];
    if let Err(e) = self.page_cache.invalidate(&pages).await {
      tracing::error!("Failed to invalidate cached pages {:?}: {}", pages, e);
    }

    Ok(UpdateShopSettingsResponse {
      shop_name: shop_name.value().to_string(),
      low_stock_threshold: threshold.value(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::admin::AdminError;
  use crate::domain::catalog::SettingValueError;
  use crate::domain::order::services::tests::{NamedAdmin, RecordingCache};
  use async_trait::async_trait;
  use std::collections::HashMap;
  use std::sync::Mutex;

  #[derive(Default)]
  struct MapSettings(Mutex<HashMap<&'static str, String>>);

  #[async_trait]
  impl SettingRepository for MapSettings {
    async fn get(&self, key: SettingKey) -> Result<Option<String>, CatalogError> {
      Ok(self.0.lock().unwrap().get(key.as_str()).cloned())
    }

    async fn set(&self, key: SettingKey, value: &str) -> Result<(), CatalogError> {
      self.0.lock().unwrap().insert(key.as_str(), value.to_string());
      Ok(())
    }
  }

  fn setup() -> (UpdateShopSettingsUseCase, Arc<MapSettings>, Arc<RecordingCache>) {
    let settings = Arc::new(MapSettings::default());
    let cache = Arc::new(RecordingCache::default());
    let use_case =
      UpdateShopSettingsUseCase::new(Arc::new(NamedAdmin), settings.clone(), cache.clone());
    (use_case, settings, cache)
  }

  #[tokio::test]
  async fn test_update_persists_and_invalidates_dashboard() {
    let (use_case, settings, cache) = setup();

    let response = use_case
      .execute(UpdateShopSettingsCommand {
        actor: Actor::admin("admin"),
        shop_name: " Key Shop ".to_string(),
        low_stock_threshold: 3,
      })
      .await
      .unwrap();

    assert_eq!(response.shop_name, "Key Shop");
    assert_eq!(
      settings.get(SettingKey::LowStockThreshold).await.unwrap().as_deref(),
      Some("3")
    );
    assert_eq!(
      *cache.invalidated.lock().unwrap(),
      vec!["/admin".to_string()]
    );
  }

  #[tokio::test]
  async fn test_update_rejects_invalid_values() {
    let (use_case, settings, cache) = setup();

    let result = use_case
      .execute(UpdateShopSettingsCommand {
        actor: Actor::admin("admin"),
        shop_name: "Key Shop".to_string(),
        low_stock_threshold: -1,
      })
      .await;

    assert!(matches!(
      result,
      Err(CatalogError::Validation(
        SettingValueError::InvalidLowStockThreshold { .. }
      ))
    ));
    assert!(settings.0.lock().unwrap().is_empty());
    assert!(cache.invalidated.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_update_rejects_zero_threshold() {
    let (use_case, settings, _) = setup();

    let result = use_case
      .execute(UpdateShopSettingsCommand {
        actor: Actor::admin("admin"),
        shop_name: "Key Shop".to_string(),
        low_stock_threshold: 0,
      })
      .await;

    assert!(matches!(
      result,
      Err(CatalogError::Validation(
        SettingValueError::InvalidLowStockThreshold { min: 1, .. }
      ))
    ));
    assert!(settings.0.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_update_requires_admin() {
    let (use_case, settings, _) = setup();

    let result = use_case
      .execute(UpdateShopSettingsCommand {
        actor: Actor::admin("mallory"),
        shop_name: "Hacked".to_string(),
        low_stock_threshold: 1,
      })
      .await;

    assert!(matches!(
      result,
      Err(CatalogError::Access(AdminError::Forbidden))
    ));
    assert!(settings.0.lock().unwrap().is_empty());
  }
}
