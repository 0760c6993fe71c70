//! Error types for the points service

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("Database error: {0}")]
  Database(#[from] sea_orm::DbErr),

  #[error("User `{0}` not found")]
  UserNotFound(Uuid),

  #[error("Leaderboard scope `{0}` is not supported")]
  UnsupportedScope(&'static str),

  #[error("Invalid request: {0}")]
  BadRequest(String),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = match &self {
      Error::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
      Error::UserNotFound(_) => StatusCode::NOT_FOUND,
      Error::UnsupportedScope(_) => StatusCode::NOT_IMPLEMENTED,
      Error::BadRequest(_) => StatusCode::BAD_REQUEST,
    };

    // do not leak driver messages to clients
    let message = match &self {
      Error::Database(err) => {
        tracing::error!("Database error: {err}");
        "Database error".to_string()
      }
      other => other.to_string(),
    };

    let body = json::json!({
      "success": false,
      "error": message
    });

    (status, Json(body)).into_response()
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
