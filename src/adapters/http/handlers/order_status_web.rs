use actix_web::{HttpRequest, HttpResponse, web};
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::adapters::http::{errors::ApiError, templates::TemplateEngine};
use crate::application::order::{GetOrderStatusCommand, GetOrderStatusUseCase};
use crate::domain::catalog::VisitorRepository;
use crate::domain::pages::{PageCache, paths};

use super::{cached_page, render};

/// Visitors are counted by a hash of their address, never the address itself
fn visitor_fingerprint(req: &HttpRequest) -> Option<String> {
  let info = req.connection_info();
  let addr = info.realip_remote_addr()?;
  Some(hex::encode(Sha256::digest(addr.as_bytes())))
}

// GET /order/{id}
pub async fn order_status_page(
  req: HttpRequest,
  path: web::Path<String>,
  templates: web::Data<TemplateEngine>,
  page_cache: web::Data<Arc<dyn PageCache>>,
  visitor_repo: web::Data<Arc<dyn VisitorRepository>>,
  use_case: web::Data<Arc<GetOrderStatusUseCase>>,
) -> Result<HttpResponse, ApiError> {
  if let Some(fingerprint) = visitor_fingerprint(&req) {
    match visitor_repo.record(&fingerprint).await {
      // The dashboard shows the visitor count
      Ok(true) => {
        let pages = [paths::ADMIN_DASHBOARD.to_string()];
        if let Err(e) = page_cache.invalidate(&pages).await {
          tracing::error!("Failed to invalidate cached pages {:?}: {}", pages, e);
        }
      }
      Ok(false) => {}
      Err(e) => tracing::warn!("Failed to record visitor: {}", e),
    }
  }

  let order_id = path.into_inner();
  let templates = templates.get_ref();
  let use_case = use_case.get_ref();

  cached_page(page_cache.get_ref().as_ref(), &req, move || async move {
    let order = use_case
      .execute(GetOrderStatusCommand { order_id })
      .await?;

    let mut context = tera::Context::new();
    context.insert("order", &order);
    render(templates, "pages/order_status.html.tera", &context)
  })
  .await
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::adapters::http::handlers::test_support::MemoryPageCache;
  use crate::domain::catalog::CatalogError;
  use crate::domain::order::OrderService;
  use crate::domain::pages::PageKey;
  use crate::domain::order::services::tests::{
    InMemoryOrders, NamedAdmin, RecordingCache, StoreState, order,
  };
  use actix_web::{
    App,
    http::StatusCode,
    test::{self, TestRequest},
  };
  use async_trait::async_trait;
  use std::collections::HashSet;
  use std::sync::Mutex;

  #[derive(Default)]
  struct SetVisitors {
    seen: Mutex<HashSet<String>>,
  }

  #[async_trait]
  impl VisitorRepository for SetVisitors {
    async fn count(&self) -> Result<i64, CatalogError> {
      Ok(self.seen.lock().unwrap().len() as i64)
    }

    async fn record(&self, fingerprint: &str) -> Result<bool, CatalogError> {
      Ok(self.seen.lock().unwrap().insert(fingerprint.to_string()))
    }
  }

  fn templates() -> TemplateEngine {
    let mut tera = tera::Tera::default();
    tera
      .add_raw_template(
        "pages/order_status.html.tera",
        "{{ order.order_id }}|{{ order.status }}|{{ order.card_key | default(value=\"hidden\") }}",
      )
      .unwrap();
    TemplateEngine::from_tera(tera)
  }

  fn use_case() -> Arc<GetOrderStatusUseCase> {
    let mut state = StoreState::default();
    let paid = {
      let mut o = order("ORD-1", Some("SECRET-KEY"));
      o.mark_paid(chrono::Utc::now());
      o
    };
    state.orders.insert("ORD-1".to_string(), paid);

    let service = Arc::new(OrderService::new(
      Arc::new(InMemoryOrders {
        state: Arc::new(Mutex::new(state)),
      }),
      Arc::new(NamedAdmin),
      Arc::new(RecordingCache::default()),
    ));
    Arc::new(GetOrderStatusUseCase::new(service))
  }

  #[actix_web::test]
  async fn test_public_page_hides_card_key_and_counts_visitor() {
    let visitors = Arc::new(SetVisitors::default());
    let page_cache: Arc<dyn PageCache> = Arc::new(MemoryPageCache::default());
    let visitor_repo: Arc<dyn VisitorRepository> = visitors.clone();
    let app = test::init_service(
      App::new()
        .app_data(web::Data::new(templates()))
        .app_data(web::Data::new(page_cache))
        .app_data(web::Data::new(visitor_repo))
        .app_data(web::Data::new(use_case()))
        .route("/order/{id}", web::get().to(order_status_page)),
    )
    .await;

    for _ in 0..2 {
      let req = TestRequest::get()
        .uri("/order/ORD-1")
        .insert_header(("X-Forwarded-For", "203.0.113.7"))
        .to_request();
      let body = test::call_and_read_body(&app, req).await;
      assert_eq!(body, "ORD-1|paid|hidden");
    }

    let seen = visitors.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let fingerprint = seen.iter().next().unwrap();
    assert_eq!(fingerprint.len(), 64);
    assert!(!fingerprint.contains("203.0.113.7"));
  }

  #[actix_web::test]
  async fn test_unknown_order_is_not_found() {
    let page_cache: Arc<dyn PageCache> = Arc::new(MemoryPageCache::default());
    let visitor_repo: Arc<dyn VisitorRepository> = Arc::new(SetVisitors::default());
    let app = test::init_service(
      App::new()
        .app_data(web::Data::new(templates()))
        .app_data(web::Data::new(page_cache))
        .app_data(web::Data::new(visitor_repo))
        .app_data(web::Data::new(use_case()))
        .route("/order/{id}", web::get().to(order_status_page)),
    )
    .await;

    let req = TestRequest::get().uri("/order/ORD-404").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[actix_web::test]
  async fn test_new_visitor_invalidates_cached_dashboard() {
    let cache = Arc::new(MemoryPageCache::default());
    let dashboard = PageKey::new(paths::ADMIN_DASHBOARD, "");
    assert!(cache.put(&dashboard, "Visitors: 0", 0).await.unwrap());

    let page_cache: Arc<dyn PageCache> = cache.clone();
    let visitor_repo: Arc<dyn VisitorRepository> = Arc::new(SetVisitors::default());
    let app = test::init_service(
      App::new()
        .app_data(web::Data::new(templates()))
        .app_data(web::Data::new(page_cache))
        .app_data(web::Data::new(visitor_repo))
        .app_data(web::Data::new(use_case()))
        .route("/order/{id}", web::get().to(order_status_page)),
    )
    .await;

    let req = TestRequest::get()
      .uri("/order/ORD-1")
      .insert_header(("X-Forwarded-For", "198.51.100.4"))
      .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    assert_eq!(cache.get(&dashboard).await.unwrap(), None);

    // A returning visitor leaves a fresh dashboard render alone
    let version = cache.version(paths::ADMIN_DASHBOARD).await.unwrap();
    assert!(cache.put(&dashboard, "Visitors: 1", version).await.unwrap());
    let req = TestRequest::get()
      .uri("/order/ORD-1")
      .insert_header(("X-Forwarded-For", "198.51.100.4"))
      .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    assert_eq!(
      cache.get(&dashboard).await.unwrap().as_deref(),
      Some("Visitors: 1")
    );
  }
}
