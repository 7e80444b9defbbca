/**
 * API Error Types
 *
 * The error taxonomy HTTP handlers speak. Every variant maps to one wire
 * code and status; the envelope a client sees is
 * `{"error":{"code","message","details"}}`.
 *
 * # Taxonomy
 *
 * - Not-found and validation failures are surfaced and never retried
 *   automatically.
 * - `StaleVersion` is distinct from generic validation so a client can
 *   refresh the card version and retry safely.
 * - `Internal` covers store invariant violations - a programming-error
 *   class that is logged loudly rather than dressed up for the client.
 */

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

use crate::backend::store::StoreError;

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authorization required")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{message}")]
    Validation {
        message: String,
        details: BTreeMap<String, String>,
    },
    #[error("Target column not found")]
    TargetColumnNotFound,
    #[error("Card can be moved only within the same board.")]
    CrossBoardMove,
    #[error("Stale version")]
    StaleVersion,
    #[error("Internal error")]
    Internal(String),
}

impl ApiError {
    /// Validation failure with a field → reason details map.
    pub fn validation<M: Into<String>>(
        message: M,
        details: impl IntoIterator<Item = (&'static str, &'static str)>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            details: details
                .into_iter()
                .map(|(field, reason)| (field.to_string(), reason.to_string()))
                .collect(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation { .. } | Self::TargetColumnNotFound => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::CrossBoardMove => StatusCode::CONFLICT,
            Self::StaleVersion => StatusCode::PRECONDITION_FAILED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code in the error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::Validation { .. } => "validation_error",
            Self::TargetColumnNotFound | Self::CrossBoardMove => "invalid_move",
            Self::StaleVersion => "precondition_failed",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::BoardNotFound => Self::NotFound("Board"),
            StoreError::ColumnNotFound => Self::NotFound("Column"),
            StoreError::CardNotFound => Self::NotFound("Card"),
            StoreError::AnchorNotFound => Self::validation("Invalid anchors", []),
            StoreError::TargetColumnNotFound => Self::TargetColumnNotFound,
            StoreError::CrossBoardMove => Self::CrossBoardMove,
            StoreError::StaleVersion { .. } => Self::StaleVersion,
            StoreError::Invariant(detail) => {
                // Broken critical-section discipline, not a client mistake.
                tracing::error!("store invariant violated: {detail}");
                Self::Internal(detail)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let details = match &self {
            Self::Validation { details, .. } => json!(details),
            _ => json!({}),
        };
        let message = match &self {
            // Never leak internal detail to the client.
            Self::Internal(_) => "Internal error".to_string(),
            other => other.to_string(),
        };
        let body = json!({
            "error": {
                "code": self.code(),
                "message": message,
                "details": details,
            }
        });
        (self.status(), Json(body)).into_response()
    }
}
