//! Maps `TutorError` onto HTTP status codes (spec §7 error kinds).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use tutor_types::error::TutorError;

pub struct ApiError(pub TutorError);

impl From<TutorError> for ApiError {
    fn from(error: TutorError) -> Self {
        Self(error)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    kind: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            TutorError::InputInvalid(_) => StatusCode::BAD_REQUEST,
            TutorError::NotFound(_) => StatusCode::NOT_FOUND,
            TutorError::ProviderQuota(_) => StatusCode::TOO_MANY_REQUESTS,
            TutorError::ProviderTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            TutorError::ProviderUnavailable(_) => StatusCode::BAD_GATEWAY,
            TutorError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            TutorError::Cancelled => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody { kind: self.0.kind().to_string(), message: self.0.to_string() };
        (status, Json(body)).into_response()
    }
}
