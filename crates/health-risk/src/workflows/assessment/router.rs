use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use super::domain::{DiabetesAnswers, HeartHealthAnswers, PersonalInfo};
use super::scoring::{assess_diabetes, assess_heart, DiabetesAssessment, HeartAssessment};
use super::service::{AssessmentService, SubmissionTicket};
use super::session::{Session, SessionEvent};
use super::store::{SessionId, SessionRepository, StoredSession};
use super::submission::RecordSubmitter;
use super::summary::AssessmentSummary;
use crate::error::AppError;

/// A server-held session as returned to the client.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: SessionId,
    pub revision: u64,
    pub session: Session,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<AssessmentSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission: Option<SubmissionView>,
}

impl From<StoredSession> for SessionResponse {
    fn from(record: StoredSession) -> Self {
        Self {
            session_id: record.id,
            revision: record.revision,
            session: record.session,
            summary: None,
            submission: None,
        }
    }
}

/// Public view of the submission fired on leaving the heart health step.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionView {
    Dispatched,
    Confirmed { reference: String },
}

impl From<&SubmissionTicket> for SubmissionView {
    fn from(ticket: &SubmissionTicket) -> Self {
        match ticket {
            SubmissionTicket::Dispatched(_) => Self::Dispatched,
            SubmissionTicket::Confirmed(receipt) => Self::Confirmed {
                reference: receipt.reference.clone(),
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ScoreRequest {
    pub personal_info: PersonalInfo,
    pub diabetes: DiabetesAnswers,
    pub heart_health: HeartHealthAnswers,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub diabetes: DiabetesAssessment,
    pub heart: HeartAssessment,
}

/// Router builder exposing the assessment session and scoring endpoints.
pub fn assessment_router<S, R>(service: Arc<AssessmentService<S, R>>) -> Router
where
    S: RecordSubmitter + 'static,
    R: SessionRepository + 'static,
{
    Router::new()
        .route("/api/v1/assessment/sessions", post(start_handler::<S, R>))
        .route(
            "/api/v1/assessment/sessions/:session_id",
            get(session_handler::<S, R>),
        )
        .route(
            "/api/v1/assessment/sessions/:session_id/events",
            post(event_handler::<S, R>),
        )
        .route("/api/v1/assessment/score", post(score_handler))
        .with_state(service)
}

pub(crate) async fn start_handler<S, R>(
    State(service): State<Arc<AssessmentService<S, R>>>,
) -> Result<Response, AppError>
where
    S: RecordSubmitter + 'static,
    R: SessionRepository + 'static,
{
    let record = service.open()?;
    Ok((StatusCode::CREATED, axum::Json(SessionResponse::from(record))).into_response())
}

pub(crate) async fn session_handler<S, R>(
    State(service): State<Arc<AssessmentService<S, R>>>,
    Path(session_id): Path<String>,
) -> Result<Response, AppError>
where
    S: RecordSubmitter + 'static,
    R: SessionRepository + 'static,
{
    let record = service.fetch(&SessionId(session_id))?;
    Ok((StatusCode::OK, axum::Json(SessionResponse::from(record))).into_response())
}

pub(crate) async fn event_handler<S, R>(
    State(service): State<Arc<AssessmentService<S, R>>>,
    Path(session_id): Path<String>,
    axum::Json(event): axum::Json<SessionEvent>,
) -> Result<Response, AppError>
where
    S: RecordSubmitter + 'static,
    R: SessionRepository + 'static,
{
    let step = service.dispatch(&SessionId(session_id), event).await?;
    let body = SessionResponse {
        submission: step.submission.as_ref().map(SubmissionView::from),
        summary: step.summary,
        ..SessionResponse::from(step.record)
    };
    Ok((StatusCode::OK, axum::Json(body)).into_response())
}

pub(crate) async fn score_handler(axum::Json(request): axum::Json<ScoreRequest>) -> Response {
    let body = ScoreResponse {
        diabetes: assess_diabetes(&request.personal_info, &request.diabetes),
        heart: assess_heart(&request.heart_health),
    };
    (StatusCode::OK, axum::Json(body)).into_response()
}
