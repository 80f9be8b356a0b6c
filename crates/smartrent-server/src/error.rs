//! Mapping of domain failures onto HTTP responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use smartrent::{ErrorBody, ErrorKind, Outcome, SmartRentError};

/// Handler error rendered as a failed `Outcome`
#[derive(Debug)]
pub enum ApiError {
    /// Use-case failure
    Domain(SmartRentError),
    /// Missing or malformed identity headers
    Unauthenticated(String),
}

impl From<SmartRentError> for ApiError {
    fn from(err: SmartRentError) -> Self {
        Self::Domain(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Domain(SmartRentError::validation(rejection.body_text()))
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::InvalidTransition => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Domain(err) => {
                let body = ErrorBody::from_error(&err);
                let status = status_for(body.kind);
                (status, Json(Outcome::<()>::Failure(body))).into_response()
            }
            Self::Unauthenticated(message) => (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "success": false,
                    "error": { "code": "UNAUTHENTICATED", "message": message }
                })),
            )
                .into_response(),
        }
    }
}

pub type ApiResult<T> = Result<Json<Outcome<T>>, ApiError>;

/// Wrap a use-case result for a handler
pub fn respond<T>(result: Result<T, SmartRentError>) -> ApiResult<T> {
    result
        .map(|data| Json(Outcome::Success(data)))
        .map_err(ApiError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(ErrorKind::InvalidTransition),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status_for(ErrorKind::Conflict), StatusCode::CONFLICT);
    }

    #[test]
    fn test_internal_error_response() {
        let response = ApiError::from(SmartRentError::Internal {
            reason: "boom".to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
