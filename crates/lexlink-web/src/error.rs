//! Server error types

use crate::render::RenderError;
use crate::routes::PathError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lexlink_storage::StorageError;
use thiserror::Error;

/// Request failures; a missing entity is not an error but an empty 404
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Malformed path: {0}")]
    MalformedPath(#[from] PathError),

    #[error("Store error: {0}")]
    Store(#[from] StorageError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedPath(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }

        let body = Json(serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));
        (status, body).into_response()
    }
}
