use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;
use std::sync::Arc;

use crate::adapters::http::{
  dtos::{DeleteOrdersRequest, OrderEmailForm, OrdersQuery},
  errors::ApiError,
  middleware::ActorExt,
  templates::TemplateEngine,
};
use crate::application::order::{
  CancelOrderCommand, CancelOrderUseCase, DeleteOrderCommand, DeleteOrderUseCase,
  DeleteOrdersCommand, DeleteOrdersUseCase, GetOrderDetailsCommand, GetOrderDetailsUseCase,
  ListOrdersCommand, ListOrdersUseCase, MarkOrderDeliveredCommand, MarkOrderDeliveredUseCase,
  MarkOrderPaidCommand, MarkOrderPaidUseCase, UpdateOrderEmailCommand, UpdateOrderEmailUseCase,
};
use crate::domain::admin::AdminGuard;
use crate::domain::pages::{PageCache, paths};

use super::{cached_page, render, require_admin_page};

/// JSON body for htmx callers, plus a redirect to the page to reload
fn action_response<T: Serialize>(redirect_to: &str, body: &T) -> HttpResponse {
  HttpResponse::Ok()
    .insert_header(("HX-Redirect", redirect_to))
    .json(body)
}

// GET /admin/orders
pub async fn orders_page(
  req: HttpRequest,
  query: web::Query<OrdersQuery>,
  templates: web::Data<TemplateEngine>,
  admin_guard: web::Data<Arc<dyn AdminGuard>>,
  page_cache: web::Data<Arc<dyn PageCache>>,
  use_case: web::Data<Arc<ListOrdersUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let actor = require_admin_page(&req, admin_guard.get_ref().as_ref()).await?;
  let query = query.into_inner();
  let templates = templates.get_ref();
  let use_case = use_case.get_ref();

  cached_page(page_cache.get_ref().as_ref(), &req, move || async move {
    let response = use_case
      .execute(ListOrdersCommand {
        actor,
        status_filter: query.status,
        page: query.page.unwrap_or(1),
      })
      .await?;

    let mut context = tera::Context::new();
    context.insert("orders", &response);
    render(templates, "pages/admin_orders.html.tera", &context)
  })
  .await
}

// GET /admin/orders/{id}
pub async fn order_details_page(
  req: HttpRequest,
  path: web::Path<String>,
  templates: web::Data<TemplateEngine>,
  admin_guard: web::Data<Arc<dyn AdminGuard>>,
  page_cache: web::Data<Arc<dyn PageCache>>,
  use_case: web::Data<Arc<GetOrderDetailsUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let actor = require_admin_page(&req, admin_guard.get_ref().as_ref()).await?;
  let order_id = path.into_inner();
  let templates = templates.get_ref();
  let use_case = use_case.get_ref();

  cached_page(page_cache.get_ref().as_ref(), &req, move || async move {
    let order = use_case
      .execute(GetOrderDetailsCommand { actor, order_id })
      .await?;

    let mut context = tera::Context::new();
    context.insert("order", &order);
    render(templates, "pages/admin_order_details.html.tera", &context)
  })
  .await
}

// POST /admin/orders/{id}/paid
pub async fn mark_paid(
  req: HttpRequest,
  path: web::Path<String>,
  use_case: web::Data<Arc<MarkOrderPaidUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let order_id = path.into_inner();
  let response = use_case
    .execute(MarkOrderPaidCommand {
      actor: req.actor(),
      order_id: order_id.clone(),
    })
    .await?;

  Ok(action_response(&paths::admin_order(&order_id), &response))
}

// POST /admin/orders/{id}/delivered
pub async fn mark_delivered(
  req: HttpRequest,
  path: web::Path<String>,
  use_case: web::Data<Arc<MarkOrderDeliveredUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let order_id = path.into_inner();
  let response = use_case
    .execute(MarkOrderDeliveredCommand {
      actor: req.actor(),
      order_id: order_id.clone(),
    })
    .await?;

  Ok(action_response(&paths::admin_order(&order_id), &response))
}

// POST /admin/orders/{id}/cancel
pub async fn cancel(
  req: HttpRequest,
  path: web::Path<String>,
  use_case: web::Data<Arc<CancelOrderUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let order_id = path.into_inner();
  let response = use_case
    .execute(CancelOrderCommand {
      actor: req.actor(),
      order_id: order_id.clone(),
    })
    .await?;

  Ok(action_response(&paths::admin_order(&order_id), &response))
}

// POST /admin/orders/{id}/email
pub async fn update_email(
  req: HttpRequest,
  path: web::Path<String>,
  form: web::Form<OrderEmailForm>,
  use_case: web::Data<Arc<UpdateOrderEmailUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let order_id = path.into_inner();
  let response = use_case
    .execute(UpdateOrderEmailCommand {
      actor: req.actor(),
      order_id: order_id.clone(),
      email: form.into_inner().email,
    })
    .await?;

  Ok(action_response(&paths::admin_order(&order_id), &response))
}

// POST /admin/orders/{id}/delete
pub async fn delete_one(
  req: HttpRequest,
  path: web::Path<String>,
  use_case: web::Data<Arc<DeleteOrderUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let order_id = path.into_inner();
  use_case
    .execute(DeleteOrderCommand {
      actor: req.actor(),
      order_id: order_id.clone(),
    })
    .await?;

  Ok(action_response(
    paths::ADMIN_ORDERS,
    &serde_json::json!({ "order_id": order_id, "deleted": true }),
  ))
}

// POST /admin/orders/delete
pub async fn delete_batch(
  req: HttpRequest,
  body: web::Json<DeleteOrdersRequest>,
  use_case: web::Data<Arc<DeleteOrdersUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let response = use_case
    .execute(DeleteOrdersCommand {
      actor: req.actor(),
      order_ids: body.into_inner().order_ids,
    })
    .await?;

  Ok(action_response(paths::ADMIN_ORDERS, &response))
}
