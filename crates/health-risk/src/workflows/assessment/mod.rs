//! Health risk self-assessment: consent gate, three questionnaire steps, and a scored summary.
//!
//! The session state machine is pure; the service layers the session store, the field cipher,
//! and the record store on top so the router and tests can drive it headless.

pub mod cipher;
pub mod domain;
pub mod router;
pub mod scoring;
pub mod service;
pub mod session;
pub mod store;
pub mod submission;
pub mod summary;
pub mod validation;

#[cfg(test)]
mod tests;

pub use cipher::{CipherError, FieldCipher};
pub use domain::{
    ActivityType, AgeBracket, ContactPreference, DiabetesAnswers, DiabetesUpdate,
    FamilyDiabetesHistory, Gender, HeartHealthAnswers, HeartHealthUpdate, PersonalInfo,
    PersonalInfoUpdate, SmokingStatus, StepRecord, StepUpdate, WaistCategory, YesNo, YesNoUnsure,
};
pub use router::assessment_router;
pub use scoring::{
    assess_diabetes, assess_heart, diabetes_score, heart_score, ColorBand, DiabetesAssessment,
    DiabetesRiskCategory, HeartAssessment, HeartRiskCategory, RiskFactor, ScoreComponent,
};
pub use service::{
    AssessmentService, AssessmentServiceError, AssessmentStep, StoredStep, SubmissionTicket,
};
pub use session::{apply, Session, SessionEffect, SessionEvent, Step, Transition, TransitionError};
pub use store::{SessionId, SessionRepository, SessionStoreError, StoredSession};
pub use submission::{
    RecordSubmitter, SubmissionError, SubmissionReceipt, SubmissionRecord, ENCRYPTED_FIELDS,
};
pub use summary::AssessmentSummary;
pub use validation::{validate, ValidationErrors};
