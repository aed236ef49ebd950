//! API error taxonomy.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use screen_relay_core::RegistryError;
use screen_relay_store::StoreError;

/// Errors surfaced to HTTP clients.
///
/// Every client-input failure maps to a structured 4xx response; storage
/// failures are logged with cause detail and surfaced as a generic 500.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid session id format (allowed: A-Z a-z 0-9 _ -, 3-64 chars)")]
    InvalidIdentifier,
    #[error("malformed request body: {0}")]
    MalformedBody(String),
    #[error("image too large")]
    PayloadTooLarge,
    #[error("failed to decode base64 image")]
    DecodeError,
    #[error("invalid password")]
    Forbidden,
    #[error("session not found")]
    NotFound,
    #[error("failed to save image")]
    Storage(#[source] StoreError),
    #[error("internal error")]
    Internal(String),
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::InvalidId(_) => Self::InvalidIdentifier,
            RegistryError::Internal(detail) => Self::Internal(detail),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self::NotFound,
            other => Self::Storage(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidIdentifier | Self::MalformedBody(_) | Self::DecodeError => {
                StatusCode::BAD_REQUEST
            }
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        let cases = [
            (ApiError::InvalidIdentifier, StatusCode::BAD_REQUEST),
            (
                ApiError::MalformedBody("eof".into()),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::DecodeError, StatusCode::BAD_REQUEST),
            (ApiError::PayloadTooLarge, StatusCode::PAYLOAD_TOO_LARGE),
            (ApiError::Forbidden, StatusCode::FORBIDDEN),
            (ApiError::NotFound, StatusCode::NOT_FOUND),
            (
                ApiError::Internal("poisoned".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn store_not_found_maps_to_404() {
        let err = ApiError::from(StoreError::NotFound("sess_a1".into()));
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn store_io_maps_to_storage_failure() {
        let io = std::io::Error::other("disk full");
        let err = ApiError::from(StoreError::Io(io));
        assert!(matches!(err, ApiError::Storage(_)));
    }
}
