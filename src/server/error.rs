use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Errors returned by the `/chat` handler.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The body was not JSON or had no string `message` field.
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };
        log::warn!("Rejecting /chat request: {self}");
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
