use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::assessment::{AssessmentServiceError, SessionStoreError, TransitionError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("workflow error: {0}")]
    Workflow(#[from] AssessmentServiceError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Workflow(err) => workflow_status(err),
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

fn workflow_status(err: &AssessmentServiceError) -> StatusCode {
    match err {
        AssessmentServiceError::Transition(TransitionError::Validation(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AssessmentServiceError::Transition(_) => StatusCode::CONFLICT,
        AssessmentServiceError::Store(SessionStoreError::NotFound) => StatusCode::NOT_FOUND,
        AssessmentServiceError::Store(SessionStoreError::Conflict)
        | AssessmentServiceError::Store(SessionStoreError::Stale { .. }) => StatusCode::CONFLICT,
        AssessmentServiceError::Store(SessionStoreError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        AssessmentServiceError::Submission(_) => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = json!({ "error": self.to_string() });

        if let AppError::Workflow(AssessmentServiceError::Transition(err)) = &self {
            match err {
                TransitionError::Validation(errors) => body["fields"] = json!(errors),
                TransitionError::EarlierStepIncomplete { step, errors } => {
                    body["step"] = json!(step);
                    body["fields"] = json!(errors);
                }
                TransitionError::InvalidTransition { .. } | TransitionError::StepMismatch { .. } => {}
            }
        }

        (status, Json(body)).into_response()
    }
}
