//! HTTP error mapping

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use quill_core::CoreError;
use quill_storage::StorageError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// A required field was missing
    #[error(transparent)]
    Validation(#[from] CoreError),

    /// The request body could not be read
    #[error("{0}")]
    BadRequest(String),

    #[error("{resource} not found")]
    NotFound { resource: &'static str, id: i64 },

    #[error("Internal server error")]
    Internal(#[source] StorageError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { resource, id } => ApiError::NotFound { resource, id },
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal(source) => {
                tracing::error!(error = %source, "Internal service error");
            }
            ApiError::NotFound { resource, id } => {
                tracing::debug!(resource, id, "Not found");
            }
            ApiError::Validation(_) | ApiError::BadRequest(_) => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let body = json!({ "error": self.to_string() });
        (self.status_code(), Json(body)).into_response()
    }
}
