//! JSON error responses for the admin API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::reconcile::ReconcileError;
use crate::remote::RemoteError;
use crate::routes::ValidationError;

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

/// Engine error rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub ReconcileError);

impl From<ReconcileError> for ApiError {
    fn from(e: ReconcileError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            ReconcileError::Validation(ValidationError::LockedPath { .. }) => (StatusCode::FORBIDDEN, "LOCKED_PATH"),
            ReconcileError::Validation(ValidationError::DuplicateRoute(_)) => (StatusCode::CONFLICT, "DUPLICATE_ROUTE"),
            ReconcileError::Validation(_) => (StatusCode::BAD_REQUEST, "INVALID_ROUTE"),
            ReconcileError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ReconcileError::Remote(RemoteError::Unavailable(_)) => (StatusCode::BAD_GATEWAY, "REMOTE_UNAVAILABLE"),
            ReconcileError::Remote(RemoteError::Protocol(_)) => (StatusCode::BAD_GATEWAY, "REMOTE_PROTOCOL_ERROR"),
            ReconcileError::Remote(RemoteError::Rejected { .. }) => (StatusCode::BAD_GATEWAY, "REMOTE_REJECTED"),
            ReconcileError::Remote(RemoteError::InvalidUrl(_)) => (StatusCode::INTERNAL_SERVER_ERROR, "REMOTE_MISCONFIGURED"),
            ReconcileError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            ReconcileError::WorkerStopped => (StatusCode::SERVICE_UNAVAILABLE, "ENGINE_STOPPED"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = ErrorBody {
            error: self.0.to_string(),
            code,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ReconcileError::Validation(ValidationError::LockedPath { path: "/admin".into(), locked: "/admin".into() }),
                StatusCode::FORBIDDEN,
            ),
            (ReconcileError::Validation(ValidationError::DuplicateRoute("/a".into())), StatusCode::CONFLICT),
            (ReconcileError::Validation(ValidationError::EmptyPath), StatusCode::BAD_REQUEST),
            (ReconcileError::NotFound(3), StatusCode::NOT_FOUND),
            (
                ReconcileError::Remote(RemoteError::Rejected { status: 400, detail: "bad".into() }),
                StatusCode::BAD_GATEWAY,
            ),
            (ReconcileError::WorkerStopped, StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError(err).status_and_code().0, expected);
        }
    }
}
