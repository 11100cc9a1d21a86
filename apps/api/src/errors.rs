use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Everything that can go wrong while generating documents.
///
/// Each variant maps to a distinct user-facing outcome, so callers must not
/// collapse them: configuration problems are the operator's fault (500),
/// everything downstream of a valid request is an upstream/transient
/// condition the user can retry (502).
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("provider rejected credentials (status {0})")]
    Authentication(u16),

    #[error("provider request failed: {0}")]
    Upstream(String),

    #[error("provider response had no recognizable text content")]
    ResponseFormat,

    #[error("generated output is missing the <{0}> section")]
    Format(&'static str),

    #[error("pdf rendering failed: {0}")]
    Render(String),
}

impl GenerateError {
    pub fn status(&self) -> StatusCode {
        match self {
            GenerateError::Validation(_) => StatusCode::BAD_REQUEST,
            GenerateError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GenerateError::Authentication(_)
            | GenerateError::Upstream(_)
            | GenerateError::ResponseFormat
            | GenerateError::Format(_)
            | GenerateError::Render(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// The message returned to the client. Generic for everything except
    /// validation — upstream/internal detail stays in the server logs.
    pub fn public_message(&self) -> String {
        match self {
            GenerateError::Validation(msg) => msg.clone(),
            GenerateError::Configuration(_) => {
                "Server configuration issue. Please contact support.".to_string()
            }
            GenerateError::Authentication(_) => {
                "AI provider authentication failed. Please try again later.".to_string()
            }
            GenerateError::Upstream(_)
            | GenerateError::ResponseFormat
            | GenerateError::Format(_)
            | GenerateError::Render(_) => {
                "Failed to generate documents right now. Please try again.".to_string()
            }
        }
    }
}

/// A `GenerateError` paired with the request's correlation id.
/// Implements `IntoResponse` so handlers can return `Result<T, ApiError>`.
#[derive(Debug)]
pub struct ApiError {
    pub request_id: Uuid,
    pub source: GenerateError,
}

impl ApiError {
    pub fn new(request_id: Uuid, source: GenerateError) -> Self {
        Self { request_id, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.source.status();
        if status.is_server_error() {
            tracing::error!(request_id = %self.request_id, status = status.as_u16(), error = %self.source, "generate-documents failed");
        } else {
            tracing::warn!(request_id = %self.request_id, status = status.as_u16(), error = %self.source, "generate-documents rejected");
        }

        let body = Json(json!({
            "error": self.source.public_message(),
            "requestId": self.request_id,
        }));

        (status, body).into_response()
    }
}
