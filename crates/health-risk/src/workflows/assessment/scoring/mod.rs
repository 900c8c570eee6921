mod category;
mod diabetes;
mod heart;

pub use category::{ColorBand, DiabetesRiskCategory, HeartRiskCategory};
pub use diabetes::{diabetes_score, DIABETES_SCORE_MAX};
pub use heart::{heart_score, HEART_SCORE_MAX};

use serde::{Deserialize, Serialize};

use super::domain::{DiabetesAnswers, HeartHealthAnswers, PersonalInfo};

/// Answer that fed a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    Age,
    Waist,
    ActivityType,
    FamilyDiabetesHistory,
    Hypertension,
    Cholesterol,
    Diabetes,
    Smoking,
    Activity,
    FamilyHeartHistory,
}

/// Discrete contribution to a score, kept so results can be explained line by line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: RiskFactor,
    pub points: u8,
    pub notes: String,
}

/// Indian Diabetes Risk Score with its banding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiabetesAssessment {
    pub score: u8,
    pub category: DiabetesRiskCategory,
    pub label: String,
    pub color: ColorBand,
    pub components: Vec<ScoreComponent>,
}

impl DiabetesAssessment {
    pub fn from_components(components: Vec<ScoreComponent>) -> Self {
        let score = total(&components);
        let category = DiabetesRiskCategory::from_score(score);
        Self {
            score,
            category,
            label: category.label().to_string(),
            color: category.color(),
            components,
        }
    }
}

/// Heart health questionnaire count with its banding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartAssessment {
    pub score: u8,
    pub category: HeartRiskCategory,
    pub label: String,
    pub color: ColorBand,
    pub components: Vec<ScoreComponent>,
}

impl HeartAssessment {
    pub fn from_components(components: Vec<ScoreComponent>) -> Self {
        let score = total(&components);
        let category = HeartRiskCategory::from_score(score);
        Self {
            score,
            category,
            label: category.label().to_string(),
            color: category.color(),
            components,
        }
    }
}

/// Score the IDRS from the personal info (age, gender) and diabetes answers.
pub fn assess_diabetes(personal: &PersonalInfo, answers: &DiabetesAnswers) -> DiabetesAssessment {
    DiabetesAssessment::from_components(diabetes::components(
        &personal.age,
        &personal.gender,
        &answers.waist,
        &answers.activity_type,
        &answers.family_history,
    ))
}

pub fn assess_heart(answers: &HeartHealthAnswers) -> HeartAssessment {
    HeartAssessment::from_components(heart::components(answers))
}

fn total(components: &[ScoreComponent]) -> u8 {
    components
        .iter()
        .fold(0u8, |sum, component| sum.saturating_add(component.points))
}
