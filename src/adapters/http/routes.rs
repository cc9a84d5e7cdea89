use actix_files as fs;
use actix_web::{HttpResponse, Resource, guard, web};
use std::sync::Arc;

use crate::application::admin::{LoginAdminUseCase, LogoutAdminUseCase};
use crate::application::dashboard::{GetDashboardUseCase, UpdateShopSettingsUseCase};
use crate::application::order::{
  CancelOrderUseCase, DeleteOrderUseCase, DeleteOrdersUseCase, GetOrderDetailsUseCase,
  GetOrderStatusUseCase, ListOrdersUseCase, MarkOrderDeliveredUseCase, MarkOrderPaidUseCase,
  UpdateOrderEmailUseCase,
};
use crate::domain::admin::AdminGuard;
use crate::domain::catalog::VisitorRepository;
use crate::domain::pages::{PageCache, paths};

use super::dtos::HealthResponse;
use super::handlers::admin_auth::{self, SessionCookieSettings};
use super::handlers::{dashboard_web, order_status_web, orders_web};
use super::templates::TemplateEngine;

/// Dependencies for the web UI routes
pub struct WebRouteDependencies {
  pub templates: TemplateEngine,
  pub admin_guard: Arc<dyn AdminGuard>,
  pub page_cache: Arc<dyn PageCache>,
  pub visitor_repo: Arc<dyn VisitorRepository>,
  pub cookie_settings: SessionCookieSettings,
  pub static_dir: String,
  pub login_use_case: Arc<LoginAdminUseCase>,
  pub logout_use_case: Arc<LogoutAdminUseCase>,
  pub get_dashboard_use_case: Arc<GetDashboardUseCase>,
  pub update_settings_use_case: Arc<UpdateShopSettingsUseCase>,
  pub list_orders_use_case: Arc<ListOrdersUseCase>,
  pub get_order_details_use_case: Arc<GetOrderDetailsUseCase>,
  pub get_order_status_use_case: Arc<GetOrderStatusUseCase>,
  pub mark_paid_use_case: Arc<MarkOrderPaidUseCase>,
  pub mark_delivered_use_case: Arc<MarkOrderDeliveredUseCase>,
  pub cancel_use_case: Arc<CancelOrderUseCase>,
  pub update_email_use_case: Arc<UpdateOrderEmailUseCase>,
  pub delete_order_use_case: Arc<DeleteOrderUseCase>,
  pub delete_orders_use_case: Arc<DeleteOrdersUseCase>,
}

async fn health() -> HttpResponse {
  HttpResponse::Ok().json(HealthResponse { status: "ok" })
}

/// Login form submissions, kept apart so the caller can wrap them in a
/// rate limiter shared by every worker
pub fn login_submit_resource() -> Resource {
  web::resource("/admin/login")
    .guard(guard::Post())
    .route(web::post().to(admin_auth::login_submit))
}

/// Configure web UI routes
///
/// # Routes
///
/// - GET /health
/// - GET /admin/login, POST /admin/logout
/// - GET /admin, POST /admin/settings
/// - GET /admin/orders, GET /admin/orders/{id}
/// - POST /admin/orders/{id}/{paid,delivered,cancel,email,delete}
/// - POST /admin/orders/delete
/// - GET /order/{id}
/// - GET /static/*
pub fn configure_web_routes(cfg: &mut web::ServiceConfig, deps: WebRouteDependencies) {
  cfg
    .app_data(web::Data::new(deps.templates))
    .app_data(web::Data::new(deps.admin_guard))
    .app_data(web::Data::new(deps.page_cache))
    .app_data(web::Data::new(deps.visitor_repo))
    .app_data(web::Data::new(deps.cookie_settings))
    .app_data(web::Data::new(deps.login_use_case))
    .app_data(web::Data::new(deps.logout_use_case))
    .app_data(web::Data::new(deps.get_dashboard_use_case))
    .app_data(web::Data::new(deps.update_settings_use_case))
    .app_data(web::Data::new(deps.list_orders_use_case))
    .app_data(web::Data::new(deps.get_order_details_use_case))
    .app_data(web::Data::new(deps.get_order_status_use_case))
    .app_data(web::Data::new(deps.mark_paid_use_case))
    .app_data(web::Data::new(deps.mark_delivered_use_case))
    .app_data(web::Data::new(deps.cancel_use_case))
    .app_data(web::Data::new(deps.update_email_use_case))
    .app_data(web::Data::new(deps.delete_order_use_case))
    .app_data(web::Data::new(deps.delete_orders_use_case));

  cfg
    .route("/health", web::get().to(health))
    .route(
      "/",
      web::get().to(|| async {
        HttpResponse::Found()
          .insert_header(("Location", paths::ADMIN_DASHBOARD))
          .finish()
      }),
    );

  cfg.route("/admin/login", web::get().to(admin_auth::login_page));
  cfg.route("/admin/logout", web::post().to(admin_auth::logout));

  // Back office; handlers check the resolved actor themselves
  cfg.service(
    web::scope("/admin")
      .route("", web::get().to(dashboard_web::dashboard_page))
      .route("/settings", web::post().to(dashboard_web::update_settings))
      .route("/orders", web::get().to(orders_web::orders_page))
      .route("/orders/delete", web::post().to(orders_web::delete_batch))
      .route("/orders/{id}", web::get().to(orders_web::order_details_page))
      .route("/orders/{id}/paid", web::post().to(orders_web::mark_paid))
      .route(
        "/orders/{id}/delivered",
        web::post().to(orders_web::mark_delivered),
      )
      .route("/orders/{id}/cancel", web::post().to(orders_web::cancel))
      .route("/orders/{id}/email", web::post().to(orders_web::update_email))
      .route("/orders/{id}/delete", web::post().to(orders_web::delete_one)),
  );

  // Public order status
  cfg.route(
    "/order/{id}",
    web::get().to(order_status_web::order_status_page),
  );

  cfg.service(fs::Files::new("/static", deps.static_dir));
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::{App, http::StatusCode, test};

  #[actix_web::test]
  async fn test_health_reports_ok() {
    let app = test::init_service(App::new().route("/health", web::get().to(health))).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, serde_json::json!({ "status": "ok" }));
  }
}
