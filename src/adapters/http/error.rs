//! Error body shared by every endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ErrorCode;
use crate::domain::trip::TripError;

/// Standard error response.
///
/// `code` is the stable reason code clients branch on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthenticated, message)
    }

    pub fn internal() -> Self {
        Self::new(ErrorCode::InternalError, "Internal server error")
    }

    /// Pair with a status code into a response.
    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Maps a trip error onto its HTTP status and body.
///
/// Infrastructure details are logged and never sent to the caller.
pub fn handle_trip_error(error: TripError) -> Response {
    let status = match &error {
        TripError::Unauthenticated => StatusCode::UNAUTHORIZED,
        TripError::Forbidden => StatusCode::FORBIDDEN,
        TripError::NotFound(_) | TripError::UserNotFound(_) => StatusCode::NOT_FOUND,
        TripError::StaleVersion { .. } => StatusCode::CONFLICT,
        TripError::Infrastructure(detail) => {
            tracing::error!(error = %detail, "Request failed on infrastructure error");
            return ErrorResponse::internal().into_response_with(StatusCode::INTERNAL_SERVER_ERROR);
        }
        // Remaining variants are the validation group.
        _ => StatusCode::BAD_REQUEST,
    };

    let details = match &error {
        TripError::CapacityExceeded { capacity } => Some(serde_json::json!({ "capacity": capacity })),
        TripError::InvalidCapacity {
            requested,
            participants,
        } => Some(serde_json::json!({
            "requested": requested,
            "participants": participants,
        })),
        TripError::StaleVersion { expected, actual } => Some(serde_json::json!({
            "expected": expected,
            "actual": actual,
        })),
        TripError::ValidationFailed { field, .. } => Some(serde_json::json!({ "field": field })),
        _ => None,
    };

    let mut body = ErrorResponse::new(error.code(), error.to_string());
    if let Some(details) = details {
        body = body.with_details(details);
    }
    body.into_response_with(status)
}
