use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

/// Failures raised by a record store backend.
#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("{field} out of range for the document store")]
    OutOfRange { field: &'static str },
}

#[derive(Debug, ThisError)]
pub enum AttendanceError {
    /// Missing or malformed input; rejected before the store is touched.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// A mutation was computed but could not be committed.
    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("{0}")]
    Misconfigured(String),
}

impl AttendanceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn form_not_found() -> Self {
        Self::NotFound("Form not found".to_string())
    }

    pub fn storage(context: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Storage { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AttendanceError::Validation(_) => StatusCode::BAD_REQUEST,
            AttendanceError::NotFound(_) => StatusCode::NOT_FOUND,
            AttendanceError::Storage { .. } | AttendanceError::Misconfigured(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AttendanceError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = match &self {
            AttendanceError::Validation(msg)
            | AttendanceError::NotFound(msg)
            | AttendanceError::Misconfigured(msg) => msg.clone(),
            AttendanceError::Storage { context, source } => {
                error!(error = %source, "{context}");
                context.to_string()
            }
        };
        (status, Json(ApiErrorResponse::new(message))).into_response()
    }
}

/// Standardized API error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ApiErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
