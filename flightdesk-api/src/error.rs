use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use flightdesk_core::{CoreError, UpstreamError};
use serde::{Deserialize, Serialize};

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    Core(CoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::Core(CoreError::ValidationError(msg)) => {
                (StatusCode::BAD_REQUEST, ApiError::new("VALIDATION_ERROR", msg))
            }
            AppError::Core(err @ CoreError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", err.to_string()))
            }
            AppError::Core(CoreError::UpstreamError(err)) => {
                tracing::warn!("Upstream failure: {}", err);
                let code = match &err {
                    UpstreamError::LocationNotFound(_) => "LOCATION_NOT_FOUND",
                    _ => "UPSTREAM_ERROR",
                };
                (StatusCode::BAD_GATEWAY, ApiError::new(code, err.to_string()))
            }
            AppError::Core(CoreError::StoreError(err)) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("STORE_ERROR", "Internal Server Error"),
                )
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        AppError::Core(err)
    }
}
