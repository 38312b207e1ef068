use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chatrelay_core::{DirectoryError, RelayError};
use serde_json::json;

/// Boundary error: HTTP status plus the `{"detail": ...}` body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "detail": self.detail }));
        (self.status, body).into_response()
    }
}

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        tracing::error!(error = %err, "User directory error");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Database error: {}", err),
        )
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::Timeout => {
                tracing::warn!("Agent call timed out");
                Self::new(StatusCode::GATEWAY_TIMEOUT, "Agent service timeout")
            }
            RelayError::Transport { status, detail } => {
                tracing::warn!(upstream_status = ?status, error = %detail, "Agent transport error");
                Self::new(
                    StatusCode::BAD_GATEWAY,
                    format!("Agent service error: {}", detail),
                )
            }
            RelayError::Unexpected(cause) => {
                tracing::error!(error = %cause, "Unexpected relay failure");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Agent communication failed: {}", cause),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_500_database_detail() {
        let unavailable: ApiError =
            DirectoryError::StoreUnavailable(anyhow::anyhow!("db not open")).into();
        assert_eq!(unavailable.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(unavailable.detail.starts_with("Database error:"));

        let failed: ApiError =
            DirectoryError::StoreOperationFailed(anyhow::anyhow!("bad bytes")).into();
        assert_eq!(failed.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(failed.detail.starts_with("Database error:"));
    }

    #[test]
    fn test_timeout_maps_to_504_fixed_detail() {
        let err: ApiError = RelayError::Timeout.into();
        assert_eq!(err.status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(err.detail, "Agent service timeout");
    }

    #[test]
    fn test_transport_maps_to_502_with_detail() {
        let err: ApiError = RelayError::Transport {
            status: Some(503),
            detail: "agent down".to_string(),
        }
        .into();
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert_eq!(err.detail, "Agent service error: agent down");
    }

    #[test]
    fn test_unexpected_maps_to_500() {
        let err: ApiError = RelayError::Unexpected(anyhow::anyhow!("weird")).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.detail, "Agent communication failed: weird");
    }
}
