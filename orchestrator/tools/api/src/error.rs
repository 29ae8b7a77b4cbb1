use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use orchestrator_core::{ConfigurationError, OrchestratorError, ValidationError};
use serde::Serialize;
use tracing::warn;

/// HTTP face of an [`OrchestratorError`].
#[derive(Debug)]
pub struct ApiError(OrchestratorError);

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match &self.0 {
            OrchestratorError::Validation(_) => StatusCode::BAD_REQUEST,
            OrchestratorError::Configuration(ConfigurationError::RegionNotConfigured { .. }) => {
                StatusCode::NOT_FOUND
            }
            OrchestratorError::Configuration(ConfigurationError::UnsupportedRegion { .. }) => {
                StatusCode::BAD_REQUEST
            }
            OrchestratorError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            OrchestratorError::Dependency(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<OrchestratorError> for ApiError {
    fn from(value: OrchestratorError) -> Self {
        Self(value)
    }
}

/// Bodies that are not valid JSON or do not fit the payload shape are caller
/// errors, reported like any other validation failure.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(
            ValidationError::MalformedBody {
                reason: rejection.body_text(),
            }
            .into(),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.0.kind().label(),
            message: self.0.to_string(),
        };
        warn!(status = %status, kind = body.error, message = %body.message, "request failed");

        (status, Json(body)).into_response()
    }
}
