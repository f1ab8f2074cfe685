use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use users_core::DomainError;
use users_directory::StoreError;

pub const NOT_FOUND_MESSAGE: &str = "User not found.";
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized.";
pub const INTERNAL_MESSAGE: &str = "An unexpected error occurred.";

/// Error returned by HTTP handlers.
///
/// Internal causes are logged when the response is built and never sent to the
/// caller.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    /// Malformed JSON body or query string.
    #[error("{0}")]
    BadRequest(String),

    #[error("user not found")]
    NotFound,

    #[error("unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::Validation(msg),
            DomainError::InvalidId(_) => Self::NotFound,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(msg) | Self::BadRequest(msg) => {
                json_error(StatusCode::BAD_REQUEST, msg)
            }
            Self::NotFound => json_error(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE),
            Self::Unauthorized => json_error(StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE),
            Self::Internal(err) => {
                tracing::error!(error = ?err, "request failed with internal error");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
            }
        }
    }
}

/// `{"error": message}` with the given status.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_client_errors() {
        assert!(matches!(
            ApiError::from(DomainError::validation("bad")),
            ApiError::Validation(m) if m == "bad"
        ));
        assert!(matches!(
            ApiError::from(DomainError::invalid_id("x")),
            ApiError::NotFound
        ));
    }

    #[test]
    fn statuses_follow_the_taxonomy() {
        let cases = [
            (ApiError::Validation("v".into()), StatusCode::BAD_REQUEST),
            (ApiError::BadRequest("b".into()), StatusCode::BAD_REQUEST),
            (ApiError::NotFound, StatusCode::NOT_FOUND),
            (ApiError::Unauthorized, StatusCode::UNAUTHORIZED),
            (
                ApiError::from(StoreError::Poisoned),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
