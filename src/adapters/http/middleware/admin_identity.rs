use actix_web::{
  Error, HttpMessage,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
  http::header,
};
use futures_util::future::LocalBoxFuture;
use std::{
  future::{Ready, ready},
  rc::Rc,
  sync::Arc,
};

use crate::domain::admin::{AdminAccessService, Actor};

pub const SESSION_COOKIE: &str = "admin_session";

/// Session token from the `admin_session` cookie, or else from an
/// `Authorization: Bearer` header
pub fn session_token(req: &actix_web::HttpRequest) -> Option<String> {
  if let Some(cookie) = req.cookie(SESSION_COOKIE) {
    return Some(cookie.value().to_string());
  }

  req
    .headers()
    .get(header::AUTHORIZATION)
    .and_then(|h| h.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .map(|t| t.trim().to_string())
}

/// Resolves the caller into an [`Actor`] stored in request extensions.
///
/// Never rejects a request: unknown, expired or malformed sessions, and
/// session store failures, all resolve to the anonymous actor. Access
/// decisions belong to the operations themselves.
pub struct AdminIdentityMiddleware {
  access_service: Arc<AdminAccessService>,
}

impl AdminIdentityMiddleware {
  pub fn new(access_service: Arc<AdminAccessService>) -> Self {
    Self { access_service }
  }
}

impl<S, B> Transform<S, ServiceRequest> for AdminIdentityMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type InitError = ();
  type Transform = AdminIdentityMiddlewareService<S>;
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(AdminIdentityMiddlewareService {
      service: Rc::new(service),
      access_service: self.access_service.clone(),
    }))
  }
}

pub struct AdminIdentityMiddlewareService<S> {
  service: Rc<S>,
  access_service: Arc<AdminAccessService>,
}

impl<S, B> Service<ServiceRequest> for AdminIdentityMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let token = session_token(req.request());
    let access_service = self.access_service.clone();
    let service = Rc::clone(&self.service);

    Box::pin(async move {
      let actor = match token {
        Some(token) => match access_service.resolve(token).await {
          Ok(actor) => actor,
          Err(e) => {
            tracing::debug!("Session not resolved for {}: {}", req.path(), e);
            Actor::anonymous()
          }
        },
        None => Actor::anonymous(),
      };

      req.extensions_mut().insert(actor);
      service.call(req).await
    })
  }
}

/// Actor attached by [`AdminIdentityMiddleware`]; anonymous when absent
pub trait ActorExt {
  fn actor(&self) -> Actor;
}

impl ActorExt for actix_web::HttpRequest {
  fn actor(&self) -> Actor {
    self.extensions().get::<Actor>().cloned().unwrap_or_default()
  }
}
