use axum::{http::StatusCode, Json};

use crate::models::error::ErrorResponse;
use crate::services::operations::ServiceError;
use crate::services::session::AuthError;

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse::new(message)))
}

/// Translate a use-case failure into the HTTP response the client sees
pub fn map_service_error(err: ServiceError) -> ApiError {
    match &err {
        ServiceError::InvalidArgument(_) | ServiceError::InvalidTransition(_) => {
            api_error(StatusCode::BAD_REQUEST, err.to_string())
        }
        ServiceError::NotFound(_) => api_error(StatusCode::NOT_FOUND, err.to_string()),
        ServiceError::Conflict(_) => api_error(StatusCode::CONFLICT, err.to_string()),
        // Details are already logged by the service
        ServiceError::Storage(_) => api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Storage unavailable, try again later",
        ),
    }
}

pub fn map_auth_error(err: AuthError) -> ApiError {
    api_error(StatusCode::UNAUTHORIZED, err.to_string())
}
