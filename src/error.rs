use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

/// Failure kinds surfaced by the user directory.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("User not found")]
    NotFound,

    #[error("{0}")]
    InvalidArgument(String),

    /// Carries only the public message; the cause is logged where it happened.
    #[error("{0}")]
    Internal(&'static str),

    #[error("Request body too large")]
    PayloadTooLarge,
}

impl ServiceError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::Internal(_) => "INTERNAL",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        match &self {
            Self::Internal(msg) => error!(error_code = code, message = %msg, "request failed"),
            _ => debug!(error_code = code, message = %self, "client error"),
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code,
        };
        (status, Json(body)).into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
