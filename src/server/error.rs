//! Mapping of crate errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::common::Error;

/// An error on its way out as `status + { "error": message }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 404 with the same body a lookup miss produces.
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Item not found")
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::ItemNotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Error::StoreUnavailable { .. } | Error::StoreMalformed { .. } | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = self.status.as_u16(), error = %self.message, "Request failed");
        } else {
            tracing::debug!(status = self.status.as_u16(), error = %self.message, "Request rejected");
        }

        let body = Json(ErrorBody {
            error: &self.message,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ItemId;

    #[test]
    fn test_status_mapping() {
        let not_found: ApiError = Error::ItemNotFound(ItemId::new(3)).into();
        assert_eq!(not_found, ApiError::not_found());

        let bad: ApiError = Error::InvalidRequest("not an object".into()).into();
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let unavailable: ApiError = Error::unavailable("items.json", io).into();
        assert_eq!(unavailable.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(unavailable.message.contains("items.json"));
    }

    #[test]
    fn test_response_status() {
        let response = ApiError::not_found().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
