use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::cipher::{CipherError, FieldCipher};
use super::domain::{SmokingStatus, YesNo, YesNoUnsure};
use super::scoring::{assess_diabetes, assess_heart};
use super::session::Session;

/// Personal info fields that only leave the service encrypted.
pub const ENCRYPTED_FIELDS: [&str; 4] = ["first_name", "last_name", "phone", "email"];

/// Flat row handed to the record store when a respondent finishes the questionnaires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionRecord(BTreeMap<String, Value>);

impl SubmissionRecord {
    pub fn from_session(
        session: &Session,
        cipher: &FieldCipher,
        submitted_at: DateTime<Utc>,
    ) -> Result<Self, CipherError> {
        let personal = &session.personal_info;
        let diabetes = &session.diabetes;
        let heart = &session.heart_health;
        let mut fields = BTreeMap::new();

        for (field, value) in [
            ("first_name", &personal.first_name),
            ("last_name", &personal.last_name),
            ("phone", &personal.phone),
            ("email", &personal.email),
        ] {
            fields.insert(field.to_string(), Value::from(cipher.encrypt(value.trim())?));
        }

        for (field, value) in [
            ("age", &personal.age),
            ("gender", &personal.gender),
            ("city", &personal.city),
            ("state", &personal.state),
            ("language", &personal.language),
            ("country_of_origin", &personal.country_of_origin),
            ("religion", &personal.religion),
            ("contact_preference", &personal.contact_preference),
            ("waist", &diabetes.waist),
            ("activity_type", &diabetes.activity_type),
            ("family_history", &diabetes.family_history),
        ] {
            fields.insert(field.to_string(), Value::from(value.trim()));
        }

        // Flags collapse "no"/"not_sure" and "current"/"past"; the `_answer` column keeps the choice.
        for (field, value) in [
            ("hypertension", &heart.hypertension),
            ("cholesterol", &heart.cholesterol),
            ("diabetes", &heart.diabetes),
            ("family_heart_history", &heart.family_heart_history),
        ] {
            let flag = YesNoUnsure::parse(value) == Some(YesNoUnsure::Yes);
            fields.insert(field.to_string(), Value::from(u8::from(flag)));
            fields.insert(format!("{field}_answer"), Value::from(value.as_str()));
        }
        let active = YesNo::parse(&heart.activity) == Some(YesNo::Yes);
        fields.insert("activity".to_string(), Value::from(u8::from(active)));
        let smoker = matches!(
            SmokingStatus::parse(&heart.smoking),
            Some(SmokingStatus::Current | SmokingStatus::Past)
        );
        fields.insert("smoking".to_string(), Value::from(u8::from(smoker)));
        fields.insert(
            "smoking_answer".to_string(),
            Value::from(heart.smoking.as_str()),
        );

        fields.insert(
            "diabetes_score".to_string(),
            Value::from(assess_diabetes(personal, diabetes).score),
        );
        fields.insert(
            "heart_score".to_string(),
            Value::from(assess_heart(heart).score),
        );
        fields.insert(
            "submitted_at".to_string(),
            Value::from(submitted_at.to_rfc3339()),
        );

        Ok(Self(fields))
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.0
    }
}

/// Acknowledgement from the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub reference: String,
}

/// Outbound boundary to the remote record store.
#[async_trait]
pub trait RecordSubmitter: Send + Sync {
    async fn submit(&self, record: SubmissionRecord) -> Result<SubmissionReceipt, SubmissionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("record store unavailable: {0}")]
    Transport(String),
    #[error("record store rejected the submission: {0}")]
    Rejected(String),
    #[error(transparent)]
    Encryption(#[from] CipherError),
}
