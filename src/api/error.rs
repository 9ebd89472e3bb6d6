//! Error responses for the REST API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::service::ServiceError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// Storage failure. `message` is what the caller sees, `detail` is only
    /// logged.
    #[error("{message}: {detail}")]
    Internal { message: &'static str, detail: String },
}

impl ApiError {
    /// Map a service error, using `message` if it turns out to be a
    /// storage failure.
    pub fn service(message: &'static str) -> impl FnOnce(ServiceError) -> Self {
        move |err| match err {
            ServiceError::InvalidInput(msg) => Self::BadRequest(msg),
            ServiceError::NotFound(msg) => Self::NotFound(msg),
            ServiceError::Conflict(msg) => Self::Conflict(msg),
            ServiceError::Transport(detail) => Self::Internal { message, detail },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Internal { message, detail } => {
                tracing::error!(error = %detail, "{message}");
                (*message).to_string()
            }
            other => {
                tracing::warn!(status = status.as_u16(), error = %other, "request rejected");
                other.to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
