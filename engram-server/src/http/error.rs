//! The consistent error envelope: `{"error": {"kind", "message", "details"?}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use engram_core::errors::EngramError;

/// Wrapper giving every `EngramError` its HTTP shape.
pub struct ApiError(pub EngramError);

impl From<EngramError> for ApiError {
    fn from(e: EngramError) -> Self {
        Self(e)
    }
}

fn status_for(error: &EngramError) -> StatusCode {
    match error {
        EngramError::EmptyContent | EngramError::InvalidField { .. } => StatusCode::BAD_REQUEST,
        EngramError::NotFound { .. } => StatusCode::NOT_FOUND,
        EngramError::SecretDetected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        EngramError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        EngramError::Canceled => StatusCode::REQUEST_TIMEOUT,
        EngramError::DuplicateId { .. }
        | EngramError::EmbedderUnavailable
        | EngramError::SchemaMismatch { .. }
        | EngramError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            tracing::error!(kind = self.0.kind(), error = %self.0, "request failed");
        }

        let details = match &self.0 {
            EngramError::InvalidField { field, .. } => Some(json!({ "field": field })),
            EngramError::SecretDetected { pattern } => Some(json!({ "pattern": pattern })),
            _ => None,
        };

        let mut error = json!({
            "kind": self.0.kind(),
            "message": self.0.to_string(),
        });
        if let Some(details) = details {
            error["details"] = details;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_the_table() {
        assert_eq!(status_for(&EngramError::EmptyContent), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&EngramError::SecretDetected { pattern: "jwt" }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&EngramError::NotFound { id: "x".into() }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&EngramError::StoreUnavailable { message: "closed".into() }),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(&EngramError::internal("boom")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
