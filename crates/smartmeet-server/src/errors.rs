//! API error mapping.
//!
//! Store failure kinds map onto status codes so clients can tell them
//! apart: not-found 404, validation 400, conflict 409, schema drift 503
//! (feature degraded, not broken), partial write 502 (parent row committed,
//! dependent failed), everything else 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use smartmeet_store::StoreError;

/// An error ready to be returned from a handler.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// 400 with a caller-facing message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// 404 with a caller-facing message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    /// 503 for a degraded feature.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: message.into(),
        }
    }

    /// The mapped status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match &err {
            StoreError::TemplateNotFound(_)
            | StoreError::DistributionNotFound(_)
            | StoreError::ContactNotFound(_)
            | StoreError::OrganizationNotFound(_)
            | StoreError::MeetingNotFound(_) => StatusCode::NOT_FOUND,
            StoreError::Validation(_) => StatusCode::BAD_REQUEST,
            StoreError::Conflict { .. } => StatusCode::CONFLICT,
            StoreError::SchemaDrift { .. } => StatusCode::SERVICE_UNAVAILABLE,
            StoreError::PartialWrite { .. } => StatusCode::BAD_GATEWAY,
            StoreError::Sqlite(_)
            | StoreError::Pool(_)
            | StoreError::Serde(_)
            | StoreError::Migration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %err, "store operation failed");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
