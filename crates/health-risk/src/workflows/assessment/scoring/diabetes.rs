use super::{total, RiskFactor, ScoreComponent};
use crate::workflows::assessment::domain::{
    ActivityType, AgeBracket, FamilyDiabetesHistory, Gender, WaistCategory,
};

pub const DIABETES_SCORE_MAX: u8 = 100;

/// IDRS total for raw answer values. Unrecognized values contribute 0.
pub fn diabetes_score(
    age: &str,
    gender: &str,
    waist: &str,
    activity_type: &str,
    family_history: &str,
) -> u8 {
    total(&components(
        age,
        gender,
        waist,
        activity_type,
        family_history,
    ))
}

pub(super) fn components(
    age: &str,
    gender: &str,
    waist: &str,
    activity_type: &str,
    family_history: &str,
) -> Vec<ScoreComponent> {
    let gender = Gender::parse(gender);

    vec![
        component(RiskFactor::Age, age, AgeBracket::parse(age).map(age_points)),
        component(
            RiskFactor::Waist,
            waist,
            WaistCategory::parse(gender, waist).map(waist_points),
        ),
        component(
            RiskFactor::ActivityType,
            activity_type,
            ActivityType::parse(activity_type).map(activity_points),
        ),
        component(
            RiskFactor::FamilyDiabetesHistory,
            family_history,
            FamilyDiabetesHistory::parse(family_history).map(family_points),
        ),
    ]
}

const fn age_points(age: AgeBracket) -> u8 {
    match age {
        AgeBracket::Under33 => 0,
        AgeBracket::From35To49 => 20,
        AgeBracket::FiftyOrOlder => 30,
    }
}

const fn waist_points(waist: WaistCategory) -> u8 {
    match waist {
        WaistCategory::Normal => 0,
        WaistCategory::Elevated => 10,
        WaistCategory::High => 20,
    }
}

const fn activity_points(activity: ActivityType) -> u8 {
    match activity {
        ActivityType::Vigorous => 0,
        ActivityType::Moderate => 10,
        ActivityType::Mild => 20,
        ActivityType::Sedentary => 30,
    }
}

const fn family_points(history: FamilyDiabetesHistory) -> u8 {
    match history {
        FamilyDiabetesHistory::Neither => 0,
        FamilyDiabetesHistory::OneParent => 10,
        FamilyDiabetesHistory::BothParents => 20,
    }
}

fn component(factor: RiskFactor, raw: &str, points: Option<u8>) -> ScoreComponent {
    match points {
        Some(points) => ScoreComponent {
            factor,
            points,
            notes: format!("'{raw}' scores {points}"),
        },
        None => ScoreComponent {
            factor,
            points: 0,
            notes: format!("unrecognized answer '{raw}' scored as 0"),
        },
    }
}
