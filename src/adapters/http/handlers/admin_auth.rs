use actix_web::{
  HttpRequest, HttpResponse,
  cookie::{Cookie, SameSite, time::Duration},
  http::StatusCode,
  web,
};
use std::sync::Arc;
use validator::Validate;

use crate::adapters::http::{
  dtos::AdminLoginForm,
  errors::{ApiError, LOGIN_PATH},
  middleware::{ActorExt, SESSION_COOKIE, session_token},
  templates::TemplateEngine,
};
use crate::application::admin::{LoginAdminCommand, LoginAdminUseCase, LogoutAdminUseCase};
use crate::domain::admin::{AdminError, AdminGuard};
use crate::domain::pages::paths;

use super::render;

/// How the session cookie is issued
#[derive(Debug, Clone, Copy)]
pub struct SessionCookieSettings {
  pub secure: bool,
  pub ttl_seconds: i64,
}

fn login_form(
  templates: &TemplateEngine,
  status: StatusCode,
  username: &str,
  error: Option<String>,
) -> Result<HttpResponse, ApiError> {
  let mut context = tera::Context::new();
  context.insert("username", username);
  context.insert("error", &error);

  let html = render(templates, "pages/admin_login.html.tera", &context)?;
  Ok(
    HttpResponse::build(status)
      .content_type("text/html; charset=utf-8")
      .body(html),
  )
}

fn redirect(location: &str) -> HttpResponse {
  HttpResponse::SeeOther()
    .insert_header(("Location", location))
    .insert_header(("HX-Redirect", location))
    .finish()
}

// GET /admin/login
pub async fn login_page(
  req: HttpRequest,
  templates: web::Data<TemplateEngine>,
  admin_guard: web::Data<Arc<dyn AdminGuard>>,
) -> Result<HttpResponse, ApiError> {
  if admin_guard.check_admin(&req.actor()).await.is_ok() {
    return Ok(redirect(paths::ADMIN_DASHBOARD));
  }

  login_form(&templates, StatusCode::OK, "", None)
}

// POST /admin/login
pub async fn login_submit(
  form: web::Form<AdminLoginForm>,
  use_case: web::Data<Arc<LoginAdminUseCase>>,
  cookie_settings: web::Data<SessionCookieSettings>,
  templates: web::Data<TemplateEngine>,
) -> Result<HttpResponse, ApiError> {
  let form = form.into_inner();
  if let Err(e) = form.validate() {
    let message = ApiError::from(e).to_string();
    return login_form(&templates, StatusCode::BAD_REQUEST, &form.username, Some(message));
  }

  let command = LoginAdminCommand {
    username: form.username.clone(),
    password: form.password,
  };

  match use_case.execute(command).await {
    Ok(response) => {
      let cookie = Cookie::build(SESSION_COOKIE, response.session_token)
        .path("/")
        .http_only(true)
        .secure(cookie_settings.secure)
        .same_site(SameSite::Strict)
        .max_age(Duration::seconds(cookie_settings.ttl_seconds))
        .finish();

      let mut res = redirect(paths::ADMIN_DASHBOARD);
      res
        .add_cookie(&cookie)
        .map_err(|e| ApiError::Internal(format!("Cookie error: {}", e)))?;
      Ok(res)
    }
    Err(e @ AdminError::InvalidCredentials) => login_form(
      &templates,
      StatusCode::UNAUTHORIZED,
      &form.username,
      Some(e.to_string()),
    ),
    Err(e) => Err(e.into()),
  }
}

// POST /admin/logout
pub async fn logout(
  req: HttpRequest,
  use_case: web::Data<Arc<LogoutAdminUseCase>>,
) -> Result<HttpResponse, ApiError> {
  if let Some(token) = session_token(&req) {
    if let Err(e) = use_case.execute(token).await {
      tracing::warn!("Logout could not delete session: {}", e);
    }
  }

  let mut expired = Cookie::build(SESSION_COOKIE, "")
    .path("/")
    .http_only(true)
    .finish();
  expired.make_removal();

  let mut res = redirect(LOGIN_PATH);
  res
    .add_cookie(&expired)
    .map_err(|e| ApiError::Internal(format!("Cookie error: {}", e)))?;
  Ok(res)
}
