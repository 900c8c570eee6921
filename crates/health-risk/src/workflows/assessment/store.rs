use std::fmt;

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::OsRng;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::session::Session;

const SESSION_ID_BYTES: usize = 16;

/// Opaque, unguessable handle a client uses to address its server-held session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn generate() -> Self {
        let mut bytes = [0u8; SESSION_ID_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(format!("as-{}", URL_SAFE_NO_PAD.encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A session as held by the service. `revision` increases by one on every committed change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub id: SessionId,
    pub revision: u64,
    pub session: Session,
}

impl StoredSession {
    pub fn fresh(id: SessionId) -> Self {
        Self {
            id,
            revision: 0,
            session: Session::new(),
        }
    }
}

/// Storage abstraction for in-progress sessions.
pub trait SessionRepository: Send + Sync {
    fn insert(&self, record: StoredSession) -> Result<StoredSession, SessionStoreError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<StoredSession>, SessionStoreError>;
    /// Store `session` only if the held revision still equals `expected_revision`, returning the
    /// record at its next revision.
    fn replace(
        &self,
        id: &SessionId,
        expected_revision: u64,
        session: Session,
    ) -> Result<StoredSession, SessionStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session changed concurrently (expected revision {expected}, found {found})")]
    Stale { expected: u64, found: u64 },
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
