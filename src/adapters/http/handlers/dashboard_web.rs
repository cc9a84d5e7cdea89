use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use crate::adapters::http::{
  dtos::ShopSettingsForm, errors::ApiError, middleware::ActorExt, templates::TemplateEngine,
};
use crate::application::dashboard::{
  GetDashboardCommand, GetDashboardUseCase, UpdateShopSettingsCommand, UpdateShopSettingsUseCase,
};
use crate::domain::admin::AdminGuard;
use crate::domain::pages::{PageCache, paths};

use super::{cached_page, render, require_admin_page};

// GET /admin
pub async fn dashboard_page(
  req: HttpRequest,
  templates: web::Data<TemplateEngine>,
  admin_guard: web::Data<Arc<dyn AdminGuard>>,
  page_cache: web::Data<Arc<dyn PageCache>>,
  use_case: web::Data<Arc<GetDashboardUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let actor = require_admin_page(&req, admin_guard.get_ref().as_ref()).await?;
  let templates = templates.get_ref();
  let use_case = use_case.get_ref();

  cached_page(page_cache.get_ref().as_ref(), &req, move || async move {
    let dashboard = use_case
      .execute(GetDashboardCommand {
        actor: actor.clone(),
      })
      .await?;

    // Shared by every admin; nothing per-session goes into the render
    let mut context = tera::Context::new();
    context.insert("dashboard", &dashboard);
    render(&templates, "pages/admin_dashboard.html.tera", &context)
  })
  .await
}

// POST /admin/settings
pub async fn update_settings(
  req: HttpRequest,
  form: web::Form<ShopSettingsForm>,
  use_case: web::Data<Arc<UpdateShopSettingsUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let form = form.into_inner();
  form.validate()?;

  let response = use_case
    .execute(UpdateShopSettingsCommand {
      actor: req.actor(),
      shop_name: form.shop_name,
      low_stock_threshold: form.low_stock_threshold,
    })
    .await?;

  Ok(
    HttpResponse::Ok()
      .insert_header(("HX-Redirect", paths::ADMIN_DASHBOARD))
      .json(serde_json::json!({
        "shop_name": response.shop_name,
        "low_stock_threshold": response.low_stock_threshold,
      })),
  )
}
