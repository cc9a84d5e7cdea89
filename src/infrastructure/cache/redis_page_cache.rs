use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use crate::domain::pages::{PageCache, PageCacheError, PageKey};

const KEY_PREFIX: &str = "cardshop:page:";
const VERSION_PREFIX: &str = "cardshop:page_version:";

// KEYS[1] version, KEYS[2] page hash; ARGV: expected version, variant, html, ttl
const PUT_IF_CURRENT: &str = r#"
if (redis.call('GET', KEYS[1]) or '0') ~= ARGV[1] then
  return 0
end
redis.call('HSET', KEYS[2], ARGV[2], ARGV[3])
redis.call('EXPIRE', KEYS[2], ARGV[4])
return 1
"#;

/// Rendered pages in Redis: one hash per path, one field per query variant.
/// Deleting the hash drops every variant of the path at once. A counter per
/// path guards writes of pages rendered before an invalidation.
pub struct RedisPageCache {
  redis: ConnectionManager,
  ttl_seconds: i64,
  put_script: redis::Script,
}

impl RedisPageCache {
  pub fn new(redis: ConnectionManager, ttl_seconds: i64) -> Self {
    Self {
      redis,
      ttl_seconds,
      put_script: redis::Script::new(PUT_IF_CURRENT),
    }
  }
}

fn page_key(path: &str) -> String {
  format!("{}{}", KEY_PREFIX, path)
}

fn version_key(path: &str) -> String {
  format!("{}{}", VERSION_PREFIX, path)
}

fn backend(e: redis::RedisError) -> PageCacheError {
  PageCacheError::Backend(e.to_string())
}

#[async_trait]
impl PageCache for RedisPageCache {
  async fn get(&self, key: &PageKey) -> Result<Option<String>, PageCacheError> {
    let mut conn = self.redis.clone();
    conn
      .hget(page_key(&key.path), &key.variant)
      .await
      .map_err(backend)
  }

  async fn version(&self, path: &str) -> Result<u64, PageCacheError> {
    let mut conn = self.redis.clone();
    let version: Option<u64> = conn.get(version_key(path)).await.map_err(backend)?;
    Ok(version.unwrap_or(0))
  }

  async fn put(&self, key: &PageKey, html: &str, version: u64) -> Result<bool, PageCacheError> {
    let mut conn = self.redis.clone();

    let stored: i64 = self
      .put_script
      .key(version_key(&key.path))
      .key(page_key(&key.path))
      .arg(version)
      .arg(&key.variant)
      .arg(html)
      .arg(self.ttl_seconds)
      .invoke_async(&mut conn)
      .await
      .map_err(backend)?;

    Ok(stored == 1)
  }

  async fn invalidate(&self, paths: &[String]) -> Result<(), PageCacheError> {
    if paths.is_empty() {
      return Ok(());
    }

    let mut pipe = redis::pipe();
    pipe.atomic();
    for path in paths {
      pipe.incr(version_key(path), 1).ignore();
      pipe.del(page_key(path)).ignore();
    }

    let mut conn = self.redis.clone();
    pipe.query_async::<()>(&mut conn).await.map_err(backend)?;

    tracing::debug!("Invalidated cached pages {:?}", paths);
    Ok(())
  }
}
