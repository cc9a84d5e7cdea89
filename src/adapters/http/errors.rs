use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use serde::Serialize;
use std::fmt;

use crate::domain::admin::AdminError;
use crate::domain::catalog::CatalogError;
use crate::domain::order::OrderError;

use super::dtos::ErrorResponse;

pub const LOGIN_PATH: &str = "/admin/login";

/// API error type that maps domain errors to HTTP responses
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum ApiError {
  /// Validation error (400 Bad Request)
  Validation(String),

  /// Missing resource (404 Not Found)
  NotFound(String),

  /// Request conflicts with the resource state (409 Conflict)
  Conflict(String),

  /// Authentication error (401 Unauthorized)
  Auth(AuthErrorKind),

  /// Anonymous visitor on an admin page; answered with a redirect to the
  /// login page instead of JSON
  LoginRequired,

  /// Internal server error (500 Internal Server Error)
  Internal(String),
}

/// Authentication error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuthErrorKind {
  /// Wrong username or password (401)
  InvalidCredentials,

  /// Caller is not a configured admin (401)
  AdminRequired,

  /// Malformed session token (401)
  InvalidToken,
}

impl ApiError {
  /// Admin HTML pages send anonymous callers to the login form
  pub fn for_page(self) -> Self {
    match self {
      ApiError::Auth(AuthErrorKind::AdminRequired) | ApiError::Auth(AuthErrorKind::InvalidToken) => {
        ApiError::LoginRequired
      }
      other => other,
    }
  }
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
      ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
      ApiError::Auth(kind) => write!(f, "Authentication error: {:?}", kind),
      ApiError::LoginRequired => write!(f, "Login required"),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
      ApiError::LoginRequired => StatusCode::FOUND,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    let (error_type, message) = match self {
      ApiError::Validation(msg) => ("validation_error", msg.clone()),
      ApiError::NotFound(msg) => ("not_found", msg.clone()),
      ApiError::Conflict(msg) => ("conflict", msg.clone()),
      ApiError::Auth(kind) => match kind {
        AuthErrorKind::InvalidCredentials => (
          "invalid_credentials",
          "Invalid username or password".to_string(),
        ),
        AuthErrorKind::AdminRequired => {
          ("admin_required", "Admin privileges required".to_string())
        }
        AuthErrorKind::InvalidToken => (
          "invalid_token",
          "Invalid or missing session token".to_string(),
        ),
      },
      ApiError::LoginRequired => {
        return HttpResponse::Found()
          .insert_header(("Location", LOGIN_PATH))
          .finish();
      }
      ApiError::Internal(msg) => {
        // Don't expose internal error details
        tracing::error!("Internal error: {}", msg);
        (
          "internal_error",
          "An internal server error occurred".to_string(),
        )
      }
    };

    let error_response = ErrorResponse {
      error: error_type.to_string(),
      message,
      details: None,
    };

    HttpResponse::build(status)
      .content_type(ContentType::json())
      .json(error_response)
  }
}

impl From<AdminError> for ApiError {
  fn from(error: AdminError) -> Self {
    match error {
      AdminError::Forbidden => ApiError::Auth(AuthErrorKind::AdminRequired),
      AdminError::InvalidCredentials => ApiError::Auth(AuthErrorKind::InvalidCredentials),
      AdminError::InvalidToken => ApiError::Auth(AuthErrorKind::InvalidToken),
      AdminError::Hash(msg) => ApiError::Internal(format!("Hash error: {}", msg)),
      AdminError::SessionStore(msg) => ApiError::Internal(format!("Session store error: {}", msg)),
    }
  }
}

impl From<OrderError> for ApiError {
  fn from(error: OrderError) -> Self {
    match error {
      OrderError::Validation(e) => ApiError::Validation(e.to_string()),
      OrderError::Access(e) => ApiError::from(e),
      e @ OrderError::OrderNotFound(_) => ApiError::NotFound(e.to_string()),
      e @ OrderError::MissingCardKey => ApiError::Conflict(e.to_string()),
      OrderError::Repository(msg) => ApiError::Internal(format!("Repository error: {}", msg)),
      OrderError::Database(e) => ApiError::Internal(format!("Database error: {}", e)),
    }
  }
}

impl From<CatalogError> for ApiError {
  fn from(error: CatalogError) -> Self {
    match error {
      CatalogError::Validation(e) => ApiError::Validation(e.to_string()),
      CatalogError::Access(e) => ApiError::from(e),
      CatalogError::Repository(msg) => ApiError::Internal(format!("Repository error: {}", msg)),
      CatalogError::Database(e) => ApiError::Internal(format!("Database error: {}", e)),
    }
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let mut messages: Vec<String> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errors)| {
        errors
          .iter()
          .map(|error| {
            error
              .message
              .as_ref()
              .map(|m| m.to_string())
              .unwrap_or_else(|| format!("Invalid field: {}", field))
          })
          .collect::<Vec<_>>()
      })
      .collect();
    messages.sort();

    ApiError::Validation(messages.join(", "))
  }
}
