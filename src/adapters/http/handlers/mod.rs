pub mod admin_auth;
pub mod dashboard_web;
pub mod order_status_web;
pub mod orders_web;

use actix_web::{HttpRequest, HttpResponse};
use std::future::Future;

use crate::adapters::http::{errors::ApiError, middleware::ActorExt, templates::TemplateEngine};
use crate::domain::admin::{Actor, AdminGuard};
use crate::domain::pages::{PageCache, PageKey};

/// Resolve the caller and make sure it is an admin, answering anonymous
/// page visits with a redirect to the login form
pub async fn require_admin_page(
  req: &HttpRequest,
  admin_guard: &dyn AdminGuard,
) -> Result<Actor, ApiError> {
  let actor = req.actor();
  admin_guard
    .check_admin(&actor)
    .await
    .map_err(|e| ApiError::from(e).for_page())?;
  Ok(actor)
}

pub fn render(
  templates: &TemplateEngine,
  template: &str,
  context: &tera::Context,
) -> Result<String, ApiError> {
  templates
    .render(template, context)
    .map_err(|e| ApiError::Internal(format!("Template error: {}", e)))
}

fn html_response(html: String, cache_status: &'static str) -> HttpResponse {
  HttpResponse::Ok()
    .content_type("text/html; charset=utf-8")
    .insert_header(("X-Page-Cache", cache_status))
    .body(html)
}

/// Serve a rendered page from the page cache, rendering and storing it on a
/// miss. Cache failures are logged and never fail the request.
pub async fn cached_page<F, Fut>(
  page_cache: &dyn PageCache,
  req: &HttpRequest,
  render_page: F,
) -> Result<HttpResponse, ApiError>
where
  F: FnOnce() -> Fut,
  Fut: Future<Output = Result<String, ApiError>>,
{
  let key = PageKey::new(req.path(), req.query_string());

  match page_cache.get(&key).await {
    Ok(Some(html)) => return Ok(html_response(html, "hit")),
    Ok(None) => {}
    Err(e) => tracing::warn!("Page cache read failed for {}: {}", key.path, e),
  }

  let version = match page_cache.version(&key.path).await {
    Ok(version) => Some(version),
    Err(e) => {
      tracing::warn!("Page cache version read failed for {}: {}", key.path, e);
      None
    }
  };

  let html = render_page().await?;

  // A page invalidated while rendering may hold stale data; serve it, don't store it
  if let Some(version) = version {
    match page_cache.put(&key, &html, version).await {
      Ok(true) => {}
      Ok(false) => tracing::debug!("Page {} invalidated during render, not cached", key.path),
      Err(e) => tracing::warn!("Page cache write failed for {}: {}", key.path, e),
    }
  }

  Ok(html_response(html, "miss"))
}


#[cfg(test)]
mod tests {
  use super::test_support::MemoryPageCache;
  use super::*;
  use actix_web::test::TestRequest;

  #[actix_web::test]
  async fn test_cached_page_renders_once_per_variant() {
    let cache = MemoryPageCache::default();
    let req = TestRequest::get()
      .uri("/admin/orders?status=paid")
      .to_http_request();

    let first = cached_page(&cache, &req, || async { Ok("v1".to_string()) })
      .await
      .unwrap();
    assert_eq!(first.headers().get("X-Page-Cache").unwrap(), "miss");

    let second = cached_page(&cache, &req, || async {
      Err::<String, _>(ApiError::Internal("should not render".to_string()))
    })
    .await
    .unwrap();
    assert_eq!(second.headers().get("X-Page-Cache").unwrap(), "hit");

    let other = TestRequest::get()
      .uri("/admin/orders?status=pending")
      .to_http_request();
    let third = cached_page(&cache, &other, || async { Ok("v2".to_string()) })
      .await
      .unwrap();
    assert_eq!(third.headers().get("X-Page-Cache").unwrap(), "miss");

    cache
      .invalidate(&["/admin/orders".to_string()])
      .await
      .unwrap();
    assert!(cache.pages.lock().unwrap().is_empty());
  }

  #[actix_web::test]
  async fn test_page_invalidated_during_render_is_not_stored() {
    let cache = MemoryPageCache::default();
    let req = TestRequest::get().uri("/admin/orders").to_http_request();

    let served = cached_page(&cache, &req, || async {
      // An order changes while the old list is being rendered
      cache
        .invalidate(&["/admin/orders".to_string()])
        .await
        .unwrap();
      Ok("stale".to_string())
    })
    .await
    .unwrap();
    assert_eq!(served.headers().get("X-Page-Cache").unwrap(), "miss");
    assert!(cache.pages.lock().unwrap().is_empty());

    let next = cached_page(&cache, &req, || async { Ok("fresh".to_string()) })
      .await
      .unwrap();
    assert_eq!(next.headers().get("X-Page-Cache").unwrap(), "miss");

    let cached = cache
      .get(&PageKey::new("/admin/orders", ""))
      .await
      .unwrap();
    assert_eq!(cached.as_deref(), Some("fresh"));
  }
}
