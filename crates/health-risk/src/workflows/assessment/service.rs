use std::sync::Arc;

use chrono::{Local, Utc};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::cipher::FieldCipher;
use super::session::{
    apply, Session, SessionEffect, SessionEvent, Step, Transition, TransitionError,
};
use super::store::{SessionId, SessionRepository, SessionStoreError, StoredSession};
use super::submission::{RecordSubmitter, SubmissionError, SubmissionReceipt, SubmissionRecord};
use super::summary::AssessmentSummary;
use crate::config::{AssessmentConfig, SubmissionPolicy};

/// Handle on the record submission fired when leaving the heart health step.
#[derive(Debug)]
pub enum SubmissionTicket {
    /// Running in the background; the session already moved on.
    Dispatched(JoinHandle<Result<SubmissionReceipt, SubmissionError>>),
    /// Awaited before the session moved on.
    Confirmed(SubmissionReceipt),
}

/// Outcome of one event applied to a caller-held session.
#[derive(Debug)]
pub struct AssessmentStep {
    pub session: Session,
    pub summary: Option<AssessmentSummary>,
    pub submission: Option<SubmissionTicket>,
}

/// Outcome of one event applied to a session held by the service.
#[derive(Debug)]
pub struct StoredStep {
    pub record: StoredSession,
    pub summary: Option<AssessmentSummary>,
    pub submission: Option<SubmissionTicket>,
}

/// Service composing the session state machine, session store, field cipher, and record store.
pub struct AssessmentService<S, R> {
    submitter: Arc<S>,
    sessions: Arc<R>,
    cipher: Arc<FieldCipher>,
    policy: SubmissionPolicy,
}

impl<S, R> AssessmentService<S, R>
where
    S: RecordSubmitter + 'static,
    R: SessionRepository + 'static,
{
    pub fn new(
        submitter: Arc<S>,
        sessions: Arc<R>,
        cipher: FieldCipher,
        policy: SubmissionPolicy,
    ) -> Self {
        Self {
            submitter,
            sessions,
            cipher: Arc::new(cipher),
            policy,
        }
    }

    pub fn from_config(submitter: Arc<S>, sessions: Arc<R>, config: &AssessmentConfig) -> Self {
        Self::new(
            submitter,
            sessions,
            FieldCipher::from_config(config),
            config.submission_policy,
        )
    }

    pub fn policy(&self) -> SubmissionPolicy {
        self.policy
    }

    /// Begin a caller-held session at the consent gate.
    pub fn start(&self) -> Session {
        info!("assessment session started");
        Session::new()
    }

    /// Begin a session held by the service and return its id.
    pub fn open(&self) -> Result<StoredSession, AssessmentServiceError> {
        let record = self
            .sessions
            .insert(StoredSession::fresh(SessionId::generate()))?;
        info!(session_id = %record.id, "assessment session opened");
        Ok(record)
    }

    pub fn fetch(&self, id: &SessionId) -> Result<StoredSession, AssessmentServiceError> {
        self.sessions
            .fetch(id)?
            .ok_or(AssessmentServiceError::Store(SessionStoreError::NotFound))
    }

    /// Apply `event` to a caller-held `session` and carry out any side effect it produces.
    pub async fn handle(
        &self,
        session: &Session,
        event: SessionEvent,
    ) -> Result<AssessmentStep, AssessmentServiceError> {
        let transition = self.transition(session, event)?;
        let submission = self.run_effect(&transition).await?;
        let summary = summary_for(&transition.session);

        Ok(AssessmentStep {
            session: transition.session,
            summary,
            submission,
        })
    }

    /// Apply `event` to the stored session `id`. The new session is committed before any side
    /// effect runs; a blocking submission that fails restores the previous session.
    pub async fn dispatch(
        &self,
        id: &SessionId,
        event: SessionEvent,
    ) -> Result<StoredStep, AssessmentServiceError> {
        let current = self.fetch(id)?;
        let transition = self.transition(&current.session, event)?;
        let record = self
            .sessions
            .replace(id, current.revision, transition.session.clone())?;

        let submission = match self.run_effect(&transition).await {
            Ok(submission) => submission,
            Err(err) => {
                if let Err(rollback) = self.sessions.replace(id, record.revision, current.session)
                {
                    warn!(session_id = %id, %rollback, "failed to restore session after submission error");
                }
                return Err(err);
            }
        };
        let summary = summary_for(&record.session);

        Ok(StoredStep {
            record,
            summary,
            submission,
        })
    }

    fn transition(
        &self,
        session: &Session,
        event: SessionEvent,
    ) -> Result<Transition, AssessmentServiceError> {
        let from = session.step;
        let event_name = event.name();
        let transition = apply(session, event).inspect_err(|err| {
            info!(step = from.label(), event = event_name, %err, "transition refused");
        })?;
        info!(
            from = from.label(),
            to = transition.session.step.label(),
            event = event_name,
            "assessment step advanced"
        );
        Ok(transition)
    }

    async fn run_effect(
        &self,
        transition: &Transition,
    ) -> Result<Option<SubmissionTicket>, AssessmentServiceError> {
        match transition.effect {
            Some(SessionEffect::SubmitRecord) => Ok(Some(self.submit(&transition.session).await?)),
            Some(SessionEffect::RegisterInterest { .. }) => {
                info!("respondent opted in to education material");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn submit(&self, session: &Session) -> Result<SubmissionTicket, AssessmentServiceError> {
        let record = SubmissionRecord::from_session(session, &self.cipher, Utc::now());

        match self.policy {
            SubmissionPolicy::Optimistic => {
                let submitter = Arc::clone(&self.submitter);
                let handle = tokio::spawn(async move {
                    let outcome = match record {
                        Ok(record) => submitter.submit(record).await,
                        Err(err) => Err(SubmissionError::from(err)),
                    };
                    match &outcome {
                        Ok(receipt) => info!(reference = %receipt.reference, "assessment record stored"),
                        Err(err) => warn!(%err, "assessment record submission failed"),
                    }
                    outcome
                });
                Ok(SubmissionTicket::Dispatched(handle))
            }
            SubmissionPolicy::Blocking => {
                let receipt = self
                    .submitter
                    .submit(record.map_err(SubmissionError::from)?)
                    .await
                    .inspect_err(|err| warn!(%err, "assessment record submission failed"))?;
                info!(reference = %receipt.reference, "assessment record stored");
                Ok(SubmissionTicket::Confirmed(receipt))
            }
        }
    }
}

fn summary_for(session: &Session) -> Option<AssessmentSummary> {
    (session.step == Step::Summary)
        .then(|| AssessmentSummary::from_session(session, Local::now().date_naive()))
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Store(#[from] SessionStoreError),
}
