use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use pix_service::ServiceError;

use crate::views::failure;

/// Every handler error ends up here. Internal details are logged, never
/// returned.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Pix(err) if err.is_user_error() => ApiError::BadRequest(err.to_string()),
            ServiceError::Validation(msg) => ApiError::BadRequest(msg),
            ServiceError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            ServiceError::NotFound(msg) => ApiError::NotFound(format!("{} not found", msg)),
            ServiceError::Conflict(msg) => ApiError::Conflict(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Internal(detail) => {
                error!(error = %detail, "request failed");
                failure(status, "internal server error")
            }
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg) => failure(status, msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pix_core::PixError;

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (ServiceError::Pix(PixError::MissingField("nome")), StatusCode::BAD_REQUEST),
            (
                ServiceError::Pix(PixError::EncodingOverflow { id: "01".into(), len: 120, max: 99 }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ServiceError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ServiceError::NotFound("pix code".into()), StatusCode::NOT_FOUND),
            (ServiceError::Conflict("x".into()), StatusCode::CONFLICT),
            (ServiceError::Database("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }
}
