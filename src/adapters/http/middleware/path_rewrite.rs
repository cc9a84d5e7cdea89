use actix_web::{
  Error,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
  http::Uri,
};
use futures_util::future::LocalBoxFuture;
use std::{
  collections::HashMap,
  future::{Ready, ready},
  rc::Rc,
  sync::Arc,
};

use crate::infrastructure::config::RewriteRule;

/// Rewrites exact request paths before routing. The query string is kept;
/// the client never sees the new path.
#[derive(Clone)]
pub struct PathRewriteMiddleware {
  rules: Arc<HashMap<String, String>>,
}

impl PathRewriteMiddleware {
  pub fn new(rules: &[RewriteRule]) -> Self {
    let rules = rules
      .iter()
      .map(|r| (r.source.clone(), r.destination.clone()))
      .collect();

    Self {
      rules: Arc::new(rules),
    }
  }
}

impl<S, B> Transform<S, ServiceRequest> for PathRewriteMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type InitError = ();
  type Transform = PathRewriteMiddlewareService<S>;
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(PathRewriteMiddlewareService {
      service: Rc::new(service),
      rules: self.rules.clone(),
    }))
  }
}

pub struct PathRewriteMiddlewareService<S> {
  service: Rc<S>,
  rules: Arc<HashMap<String, String>>,
}

impl<S, B> Service<ServiceRequest> for PathRewriteMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, mut req: ServiceRequest) -> Self::Future {
    if let Some(destination) = self.rules.get(req.path()) {
      let target = match req.query_string() {
        "" => destination.clone(),
        query => format!("{}?{}", destination, query),
      };

      match target.parse::<Uri>() {
        Ok(uri) => {
          tracing::debug!("Rewriting {} to {}", req.path(), uri);
          req.match_info_mut().get_mut().update(&uri);
          req.head_mut().uri = uri;
        }
        Err(e) => tracing::warn!("Invalid rewrite target {}: {}", target, e),
      }
    }

    let service = Rc::clone(&self.service);
    Box::pin(async move { service.call(req).await })
  }
}
