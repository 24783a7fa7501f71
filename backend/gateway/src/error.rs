//! Maps `TextGrabError` onto HTTP responses: `{"error": {"message": ...}}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use textgrab_core::TextGrabError;
use textgrab_logging::redact_sensitive_data;
use tracing::{error, warn};

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub message: String,
}

/// An error returned from a gateway handler.
#[derive(Debug)]
pub struct ApiError(pub TextGrabError);

impl From<TextGrabError> for ApiError {
    fn from(err: TextGrabError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            TextGrabError::InvalidImage(_)
            | TextGrabError::BadRequest(_)
            | TextGrabError::NotConfigured(_) => StatusCode::BAD_REQUEST,
            TextGrabError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            TextGrabError::Provider { .. } => StatusCode::BAD_GATEWAY,
            TextGrabError::Config(_) | TextGrabError::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-facing message. Internal failures are not described.
    pub fn message(&self) -> String {
        match &self.0 {
            TextGrabError::Config(_) | TextGrabError::Other(_) => {
                "internal server error".to_string()
            }
            other => redact_sensitive_data(&other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self.0 {
            TextGrabError::Provider { provider, message } => {
                warn!(provider = %provider, message = %redact_sensitive_data(message), "Provider call failed");
            }
            TextGrabError::Config(_) | TextGrabError::Other(_) => {
                error!(error = %redact_sensitive_data(&format!("{:#}", self.0)), "Request failed");
            }
            _ => {}
        }
        let body = ErrorBody {
            error: ErrorDetail {
                message: self.message(),
            },
        };
        (status, Json(body)).into_response()
    }
}
