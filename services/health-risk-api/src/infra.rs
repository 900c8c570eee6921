use async_trait::async_trait;
use health_risk::workflows::assessment::{
    RecordSubmitter, Session, SessionId, SessionRepository, SessionStoreError, StoredSession,
    SubmissionError, SubmissionReceipt, SubmissionRecord,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Record store kept in process memory until a remote store is wired in.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRecordSubmitter {
    records: Arc<Mutex<Vec<SubmissionRecord>>>,
}

impl InMemoryRecordSubmitter {
    pub(crate) fn records(&self) -> Vec<SubmissionRecord> {
        self.records.lock().expect("record mutex poisoned").clone()
    }
}

#[async_trait]
impl RecordSubmitter for InMemoryRecordSubmitter {
    async fn submit(&self, record: SubmissionRecord) -> Result<SubmissionReceipt, SubmissionError> {
        let fields = record.fields().len();
        let mut guard = self.records.lock().expect("record mutex poisoned");
        guard.push(record);
        let reference = format!("assessment-{:06}", guard.len());
        info!(%reference, fields, "record stored in memory");
        Ok(SubmissionReceipt { reference })
    }
}

/// In-progress sessions kept in process memory; lost on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemorySessionRepository {
    sessions: Arc<Mutex<HashMap<SessionId, StoredSession>>>,
}

impl SessionRepository for InMemorySessionRepository {
    fn insert(&self, record: StoredSession) -> Result<StoredSession, SessionStoreError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(SessionStoreError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<StoredSession>, SessionStoreError> {
        let guard = self.sessions.lock().expect("session mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn replace(
        &self,
        id: &SessionId,
        expected_revision: u64,
        session: Session,
    ) -> Result<StoredSession, SessionStoreError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use health_risk::workflows::assessment::{FieldCipher, Session};

    #[tokio::test]
    async fn stores_records_with_sequential_references() {
        let submitter = InMemoryRecordSubmitter::default();
        let submitted_at = Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap();
        let record = SubmissionRecord::from_session(
            &Session::new(),
            &FieldCipher::from_secret("infra-test"),
            submitted_at,
        )
        .expect("record builds");

        let first = submitter.submit(record.clone()).await.expect("stored");
        let second = submitter.submit(record).await.expect("stored");

        assert_eq!(first.reference, "assessment-000001");
        assert_eq!(second.reference, "assessment-000002");
        assert_eq!(submitter.records().len(), 2);
    }

    #[test]
    fn session_replace_requires_the_current_revision() {
        let repository = InMemorySessionRepository::default();
        let id = SessionId("as-infra".to_string());
        repository
            .insert(StoredSession::fresh(id.clone()))
            .expect("inserted");
        assert!(matches!(
            repository.insert(StoredSession::fresh(id.clone())),
            Err(SessionStoreError::Conflict)
        ));

        let mut advanced = Session::new();
        advanced.consent_shown = false;
        let updated = repository
            .replace(&id, 0, advanced.clone())
            .expect("current revision");
        assert_eq!(updated.revision, 1);

        assert!(matches!(
            repository.replace(&id, 0, Session::new()),
            Err(SessionStoreError::Stale {
                expected: 0,
                found: 1
            })
        ));
        let held = repository.fetch(&id).expect("fetch").expect("present");
        assert_eq!(held.session, advanced);
        assert!(matches!(
            repository.replace(&SessionId("as-missing".to_string()), 0, Session::new()),
            Err(SessionStoreError::NotFound)
        ));
    }
}
