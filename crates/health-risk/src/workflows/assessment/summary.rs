use chrono::NaiveDate;
use serde::Serialize;

use super::domain::Gender;
use super::scoring::{assess_diabetes, assess_heart, DiabetesAssessment, HeartAssessment};
use super::session::Session;

pub const GUIDANCE_NOTES: [&str; 3] = [
    "These are preliminary screening test scores, not a diagnosis.",
    "Results should be reviewed and confirmed by your Primary Care Physician.",
    "For follow-up and additional guidance, contact the South Asian Center for Diabetes & Heart Health.",
];

/// Result page content for a completed session.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentSummary {
    pub participant: String,
    pub gender: String,
    pub assessed_on: NaiveDate,
    pub diabetes: DiabetesAssessment,
    pub diabetes_interpretation: String,
    pub heart: HeartAssessment,
    pub heart_interpretation: String,
    pub guidance: Vec<&'static str>,
}

impl AssessmentSummary {
    pub fn from_session(session: &Session, assessed_on: NaiveDate) -> Self {
        let personal = &session.personal_info;
        let diabetes = assess_diabetes(personal, &session.diabetes);
        let heart = assess_heart(&session.heart_health);

        let gender = personal
            .gender()
            .map(Gender::label)
            .unwrap_or(personal.gender.as_str())
            .to_string();

        Self {
            participant: personal.full_name(),
            gender,
            assessed_on,
            diabetes_interpretation: format!(
                "Your score places you in the {} category for diabetes risk.",
                diabetes.label
            ),
            heart_interpretation: format!(
                "Your score places you in the {} category for Heart Health Risk.",
                heart.label
            ),
            diabetes,
            heart,
            guidance: GUIDANCE_NOTES.to_vec(),
        }
    }
}
