use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::editor::drag::GestureError;
use crate::render::export::ExportError;

/// Failure of a document edit. Returned by every mutator; the document the
/// caller passed in is never touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Index {index} out of range for {len} sections")]
    Range { index: usize, len: usize },
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Range error: {0}")]
    Range(String),

    #[error("Gesture conflict: {0}")]
    Gesture(String),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Session capacity reached ({0} sessions)")]
    Capacity(usize),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<EditError> for AppError {
    fn from(err: EditError) -> Self {
        match err {
            EditError::Validation(msg) => AppError::Validation(msg),
            EditError::NotFound(msg) => AppError::NotFound(msg),
            range @ EditError::Range { .. } => AppError::Range(range.to_string()),
        }
    }
}

impl From<GestureError> for AppError {
    fn from(err: GestureError) -> Self {
        match err {
            GestureError::UnknownSection(id) => AppError::NotFound(format!("Section {id} not found")),
            GestureError::LayoutMismatch { .. } | GestureError::InvalidSlot(_) => {
                AppError::Validation(err.to_string())
            }
            GestureError::Edit(edit) => edit.into(),
            GestureError::AlreadyDragging | GestureError::NotDragging => {
                AppError::Gesture(err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Range(msg) => {
                // The editor's own gesture controller never produces these.
                tracing::warn!("Reorder index out of range: {msg}");
                (StatusCode::BAD_REQUEST, "RANGE_ERROR", msg.clone())
            }
            AppError::Gesture(msg) => (StatusCode::CONFLICT, "GESTURE_CONFLICT", msg.clone()),
            AppError::Export(e) => {
                tracing::error!("Export error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXPORT_ERROR",
                    "The PDF export failed, please try again".to_string(),
                )
            }
            AppError::Capacity(max) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "CAPACITY",
                format!("No more than {max} editing sessions may be open"),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
