use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageCacheError {
  #[error("Page cache backend error: {0}")]
  Backend(String),
}

/// A rendered page is cached per path, one entry per query-string variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageKey {
  pub path: String,
  pub variant: String,
}

impl PageKey {
  pub fn new(path: impl Into<String>, variant: impl Into<String>) -> Self {
    Self {
      path: path.into(),
      variant: variant.into(),
    }
  }
}

#[async_trait]
pub trait PageCache: Send + Sync {
  async fn get(&self, key: &PageKey) -> Result<Option<String>, PageCacheError>;
  /// Generation of a path; every invalidation of the path advances it.
  async fn version(&self, path: &str) -> Result<u64, PageCacheError>;
  /// Stores the page only while the path is still at `version`.
  /// Returns false when an invalidation happened in between.
  async fn put(&self, key: &PageKey, html: &str, version: u64) -> Result<bool, PageCacheError>;
  /// Drop every cached variant of the given paths and advance their versions.
  async fn invalidate(&self, paths: &[String]) -> Result<(), PageCacheError>;
}
