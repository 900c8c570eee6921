use super::{total, RiskFactor, ScoreComponent};
use crate::workflows::assessment::domain::{
    HeartHealthAnswers, SmokingStatus, YesNo, YesNoUnsure,
};

pub const HEART_SCORE_MAX: u8 = 6;

/// Number of answers that count toward heart risk, 0..=6.
pub fn heart_score(
    hypertension: &str,
    cholesterol: &str,
    diabetes: &str,
    smoking: &str,
    activity: &str,
    family_heart_history: &str,
) -> u8 {
    total(&components(&HeartHealthAnswers {
        hypertension: hypertension.to_string(),
        cholesterol: cholesterol.to_string(),
        diabetes: diabetes.to_string(),
        smoking: smoking.to_string(),
        activity: activity.to_string(),
        family_heart_history: family_heart_history.to_string(),
    }))
}

pub(super) fn components(answers: &HeartHealthAnswers) -> Vec<ScoreComponent> {
    let is_yes = |raw: &str| YesNoUnsure::parse(raw) == Some(YesNoUnsure::Yes);

    vec![
        flag(
            RiskFactor::Hypertension,
            is_yes(&answers.hypertension),
            "history of high blood pressure",
        ),
        flag(
            RiskFactor::Cholesterol,
            is_yes(&answers.cholesterol),
            "abnormal lipid levels",
        ),
        flag(
            RiskFactor::Diabetes,
            is_yes(&answers.diabetes),
            "diabetes or prediabetes",
        ),
        flag(
            RiskFactor::Smoking,
            matches!(
                SmokingStatus::parse(&answers.smoking),
                Some(SmokingStatus::Current | SmokingStatus::Past)
            ),
            "current or past smoker",
        ),
        // Scored on "yes"; "no" adds nothing.
        flag(
            RiskFactor::Activity,
            YesNo::parse(&answers.activity) == Some(YesNo::Yes),
            "answered yes to the activity question",
        ),
        flag(
            RiskFactor::FamilyHeartHistory,
            is_yes(&answers.family_heart_history),
            "early heart disease in immediate family",
        ),
    ]
}

fn flag(factor: RiskFactor, present: bool, description: &str) -> ScoreComponent {
    ScoreComponent {
        factor,
        points: u8::from(present),
        notes: if present {
            description.to_string()
        } else {
            format!("not reported: {description}")
        },
    }
}
