//! Gateway error types with GraphQL and HTTP mappings.
//!
//! [`ApiError`] is the central error type for the gateway. Every variant
//! carries a numeric code, a GraphQL `extensions.code` string, and an HTTP
//! status used by the plain REST endpoints.

use async_graphql::ErrorExtensions;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body for REST endpoints.
///
/// ```json
/// {
///   "error": {
///     "code": 3001,
///     "message": "storage failure: connection refused"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
}

/// Server-side error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                   |
/// |-----------|-----------------|-------------------------------|
/// | 1000–1999 | Input           | 400 Bad Request               |
/// | 2000–2999 | State/Not Found | 404 Not Found / 409 Conflict  |
/// | 3000–3999 | Server/Storage  | 500 Internal / 503 Unavailable |
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// A referenced entity does not exist (e.g. the creator of an event).
    #[error("not found: {0}")]
    NotFound(String),

    /// The write would violate a uniqueness rule (duplicate email).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Underlying persistence failure of any kind.
    #[error("storage failure: {0}")]
    Storage(String),

    /// Input could not be coerced to the expected type.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The operation needs a caller identity and the request carried none.
    #[error("missing caller identity: set the `x-user-id` header")]
    MissingIdentity,

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidInput(_) => 1001,
            Self::MissingIdentity => 1002,
            Self::NotFound(_) => 2001,
            Self::Conflict(_) => 2002,
            Self::Internal(_) => 3000,
            Self::Storage(_) => 3001,
        }
    }

    /// Returns the code exposed under `extensions.code` in GraphQL errors.
    #[must_use]
    pub const fn graphql_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Storage(_) => "STORAGE_FAILURE",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::MissingIdentity => "MISSING_IDENTITY",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) | Self::MissingIdentity => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<mongodb::error::Error> for ApiError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.graphql_code();
        async_graphql::Error::new(self.to_string()).extend_with(|_, ext| ext.set("code", code))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_ranges() {
        assert_eq!(ApiError::InvalidInput("x".to_string()).error_code(), 1001);
        assert_eq!(ApiError::NotFound("x".to_string()).error_code(), 2001);
        assert_eq!(ApiError::Conflict("x".to_string()).error_code(), 2002);
        assert_eq!(ApiError::Storage("x".to_string()).error_code(), 3001);
    }

    #[test]
    fn conflict_maps_to_409() {
        let err = ApiError::Conflict("user already exists".to_string());
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn graphql_extension_carries_code() {
        let err = ApiError::NotFound("user 42".to_string()).extend();
        assert_eq!(err.message, "not found: user 42");
        let Some(ext) = err.extensions else {
            panic!("expected extensions");
        };
        assert_eq!(
            ext.get("code"),
            Some(&async_graphql::Value::from("NOT_FOUND"))
        );
    }
}
