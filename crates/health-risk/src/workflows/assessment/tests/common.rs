use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::config::SubmissionPolicy;
use crate::workflows::assessment::cipher::FieldCipher;
use crate::workflows::assessment::domain::{
    DiabetesAnswers, HeartHealthAnswers, PersonalInfo,
};
use crate::workflows::assessment::service::AssessmentService;
use crate::workflows::assessment::session::{Session, Step};
use crate::workflows::assessment::store::{
    SessionId, SessionRepository, SessionStoreError, StoredSession,
};
use crate::workflows::assessment::submission::{
    RecordSubmitter, SubmissionError, SubmissionReceipt, SubmissionRecord,
};

pub(super) const TEST_SECRET: &str = "assessment-test-secret";

pub(super) fn personal_info() -> PersonalInfo {
    PersonalInfo {
        first_name: "Priya".to_string(),
        last_name: "Raman".to_string(),
        age: "35-49".to_string(),
        gender: "female".to_string(),
        city: "Edison".to_string(),
        state: "NJ".to_string(),
        language: "Tamil".to_string(),
        country_of_origin: "India".to_string(),
        phone: "(732) 555-0142".to_string(),
        email: "priya.raman@example.org".to_string(),
        religion: String::new(),
        contact_preference: "email".to_string(),
    }
}

pub(super) fn diabetes_answers() -> DiabetesAnswers {
    DiabetesAnswers {
        waist: "80-89".to_string(),
        activity_type: "moderate".to_string(),
        family_history: "one".to_string(),
    }
}

pub(super) fn heart_answers() -> HeartHealthAnswers {
    HeartHealthAnswers {
        hypertension: "yes".to_string(),
        cholesterol: "yes".to_string(),
        diabetes: "no".to_string(),
        smoking: "no".to_string(),
        activity: "no".to_string(),
        family_heart_history: "no".to_string(),
    }
}

/// A session parked on `step` with every earlier step filled in.
pub(super) fn session_at(step: Step) -> Session {
    let mut session = Session::new();
    session.step = step;
    session.consent_shown = step == Step::Consent;
    if matches!(step, Step::Diabetes | Step::HeartHealth | Step::Summary) {
        session.personal_info = personal_info();
    }
    if matches!(step, Step::HeartHealth | Step::Summary) {
        session.diabetes = diabetes_answers();
    }
    if step == Step::Summary {
        session.heart_health = heart_answers();
    }
    session
}

pub(super) fn cipher() -> FieldCipher {
    FieldCipher::from_secret(TEST_SECRET)
}

pub(super) type TestService = AssessmentService<MemorySubmitter, MemorySessionStore>;

pub(super) fn build_service(
    policy: SubmissionPolicy,
) -> (TestService, Arc<MemorySubmitter>, Arc<MemorySessionStore>) {
    let submitter = Arc::new(MemorySubmitter::default());
    let sessions = Arc::new(MemorySessionStore::default());
    let service = AssessmentService::new(submitter.clone(), sessions.clone(), cipher(), policy);
    (service, submitter, sessions)
}

#[derive(Default, Clone)]
pub(super) struct MemorySessionStore {
    records: Arc<Mutex<HashMap<SessionId, StoredSession>>>,
}

impl MemorySessionStore {
    /// Store `session` as if it had been reached through the service.
    pub(super) fn seed(&self, session: Session) -> SessionId {
        let mut record = StoredSession::fresh(SessionId::generate());
        record.session = session;
        let id = record.id.clone();
        self.insert(record).expect("fresh id");
        id
    }

    pub(super) fn step_of(&self, id: &SessionId) -> Step {
        let guard = self.records.lock().expect("session mutex poisoned");
        guard.get(id).expect("session stored").session.step
    }
}

impl SessionRepository for MemorySessionStore {
    fn insert(&self, record: StoredSession) -> Result<StoredSession, SessionStoreError> {
        let mut guard = self.records.lock().expect("session mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(SessionStoreError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<StoredSession>, SessionStoreError> {
        let guard = self.records.lock().expect("session mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn replace(
        &self,
        id: &SessionId,
        expected_revision: u64,
        session: Session,
    ) -> Result<StoredSession, SessionStoreError> {
        let mut guard = self.records.lock().expect("session mutex poisoned");
        let record = guard.get_mut(id).ok_or(SessionStoreError::NotFound)?;
        if record.revision != expected_revision {
            return Err(SessionStoreError::Stale {
                expected: expected_revision,
                found: record.revision,
            });
        }
        record.revision += 1;
        record.session = session;
        Ok(record.clone())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemorySubmitter {
    records: Arc<Mutex<Vec<SubmissionRecord>>>,
}

impl MemorySubmitter {
    pub(super) fn records(&self) -> Vec<SubmissionRecord> {
        self.records.lock().expect("submitter mutex poisoned").clone()
    }
}

#[async_trait]
impl RecordSubmitter for MemorySubmitter {
    async fn submit(&self, record: SubmissionRecord) -> Result<SubmissionReceipt, SubmissionError> {
        let mut guard = self.records.lock().expect("submitter mutex poisoned");
        guard.push(record);
        Ok(SubmissionReceipt {
            reference: format!("rec-{:04}", guard.len()),
        })
    }
}

/// Counts attempts and fails every one of them.
#[derive(Default)]
pub(super) struct OfflineSubmitter {
    attempts: AtomicUsize,
}

impl OfflineSubmitter {
    pub(super) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordSubmitter for OfflineSubmitter {
    async fn submit(&self, _record: SubmissionRecord) -> Result<SubmissionReceipt, SubmissionError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SubmissionError::Transport("record store offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
