//! Answer records and the choice values they accept. A choice matches only its exact
//! lowercase wire value; any other spelling is unrecognized.

use serde::{Deserialize, Serialize};

/// Age brackets offered on the personal info step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgeBracket {
    Under33,
    From35To49,
    FiftyOrOlder,
}

impl AgeBracket {
    pub const fn ordered() -> [Self; 3] {
        [Self::Under33, Self::From35To49, Self::FiftyOrOlder]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Under33 => "<33",
            Self::From35To49 => "35-49",
            Self::FiftyOrOlder => ">=50",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ordered().into_iter().find(|age| age.as_str() == raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    Other,
    PreferNotToSay,
}

impl Gender {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
            Self::PreferNotToSay => "prefer-not-to-say",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
            Self::PreferNotToSay => "Prefer not to say",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            "other" => Some(Self::Other),
            "prefer-not-to-say" => Some(Self::PreferNotToSay),
            _ => None,
        }
    }

    pub fn is_male(self) -> bool {
        matches!(self, Self::Male)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactPreference {
    Phone,
    Sms,
    Email,
}

impl ContactPreference {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "phone" => Some(Self::Phone),
            "sms" => Some(Self::Sms),
            "email" => Some(Self::Email),
            _ => None,
        }
    }
}

/// Abdominal obesity band. The centimetre thresholds behind each band depend on gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaistCategory {
    Normal,
    Elevated,
    High,
}

const MALE_WAIST_OPTIONS: [&str; 3] = ["<90", "90-99", ">=100"];
const NON_MALE_WAIST_OPTIONS: [&str; 3] = ["<80", "80-89", ">=90"];

impl WaistCategory {
    const ORDERED: [Self; 3] = [Self::Normal, Self::Elevated, Self::High];

    /// Option labels shown for the given gender; anything but male uses the lower thresholds.
    pub fn options(gender: Option<Gender>) -> [&'static str; 3] {
        if gender.is_some_and(Gender::is_male) {
            MALE_WAIST_OPTIONS
        } else {
            NON_MALE_WAIST_OPTIONS
        }
    }

    pub fn parse(gender: Option<Gender>, raw: &str) -> Option<Self> {
        Self::options(gender)
            .iter()
            .position(|option| *option == raw)
            .map(|index| Self::ORDERED[index])
    }

    /// True when `raw` is a waist label for any gender.
    pub fn is_known_label(raw: &str) -> bool {
        MALE_WAIST_OPTIONS
            .iter()
            .chain(NON_MALE_WAIST_OPTIONS.iter())
            .any(|option| *option == raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityType {
    Vigorous,
    Moderate,
    Mild,
    Sedentary,
}

impl ActivityType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "vigorous" => Some(Self::Vigorous),
            "moderate" => Some(Self::Moderate),
            "mild" => Some(Self::Mild),
            "none" => Some(Self::Sedentary),
            _ => None,
        }
    }
}

/// Parents with a diabetes diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FamilyDiabetesHistory {
    Neither,
    OneParent,
    BothParents,
}

impl FamilyDiabetesHistory {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "none" => Some(Self::Neither),
            "one" => Some(Self::OneParent),
            "both" => Some(Self::BothParents),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YesNoUnsure {
    Yes,
    No,
    NotSure,
}

impl YesNoUnsure {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            "not_sure" => Some(Self::NotSure),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SmokingStatus {
    Current,
    Past,
    Never,
}

impl SmokingStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "current" => Some(Self::Current),
            "past" => Some(Self::Past),
            "no" => Some(Self::Never),
            _ => None,
        }
    }
}

/// Demographic answers collected on the first step. Values are kept exactly as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub age: String,
    pub gender: String,
    pub city: String,
    pub state: String,
    pub language: String,
    pub country_of_origin: String,
    pub phone: String,
    pub email: String,
    pub religion: String,
    pub contact_preference: String,
}

impl PersonalInfo {
    pub fn age_bracket(&self) -> Option<AgeBracket> {
        AgeBracket::parse(&self.age)
    }

    pub fn gender(&self) -> Option<Gender> {
        Gender::parse(&self.gender)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    pub fn merged(&self, update: PersonalInfoUpdate) -> Self {
        let mut merged = self.clone();
        let PersonalInfoUpdate {
            first_name,
            last_name,
            age,
            gender,
            city,
            state,
            language,
            country_of_origin,
            phone,
            email,
            religion,
            contact_preference,
        } = update;

        overwrite(&mut merged.first_name, first_name);
        overwrite(&mut merged.last_name, last_name);
        overwrite(&mut merged.age, age);
        overwrite(&mut merged.gender, gender);
        overwrite(&mut merged.city, city);
        overwrite(&mut merged.state, state);
        overwrite(&mut merged.language, language);
        overwrite(&mut merged.country_of_origin, country_of_origin);
        overwrite(&mut merged.phone, phone);
        overwrite(&mut merged.email, email);
        overwrite(&mut merged.religion, religion);
        overwrite(&mut merged.contact_preference, contact_preference);
        merged
    }
}

/// Partial edit of [`PersonalInfo`]; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfoUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub language: Option<String>,
    pub country_of_origin: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub religion: Option<String>,
    pub contact_preference: Option<String>,
}

impl From<PersonalInfo> for PersonalInfoUpdate {
    fn from(info: PersonalInfo) -> Self {
        Self {
            first_name: Some(info.first_name),
            last_name: Some(info.last_name),
            age: Some(info.age),
            gender: Some(info.gender),
            city: Some(info.city),
            state: Some(info.state),
            language: Some(info.language),
            country_of_origin: Some(info.country_of_origin),
            phone: Some(info.phone),
            email: Some(info.email),
            religion: Some(info.religion),
            contact_preference: Some(info.contact_preference),
        }
    }
}

/// IDRS questionnaire answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiabetesAnswers {
    pub waist: String,
    pub activity_type: String,
    pub family_history: String,
}

impl DiabetesAnswers {
    pub fn merged(&self, update: DiabetesUpdate) -> Self {
        let mut merged = self.clone();
        overwrite(&mut merged.waist, update.waist);
        overwrite(&mut merged.activity_type, update.activity_type);
        overwrite(&mut merged.family_history, update.family_history);
        merged
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiabetesUpdate {
    pub waist: Option<String>,
    pub activity_type: Option<String>,
    pub family_history: Option<String>,
}

impl From<DiabetesAnswers> for DiabetesUpdate {
    fn from(answers: DiabetesAnswers) -> Self {
        Self {
            waist: Some(answers.waist),
            activity_type: Some(answers.activity_type),
            family_history: Some(answers.family_history),
        }
    }
}

/// Heart health questionnaire answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartHealthAnswers {
    pub hypertension: String,
    pub cholesterol: String,
    pub diabetes: String,
    pub smoking: String,
    pub activity: String,
    pub family_heart_history: String,
}

impl HeartHealthAnswers {
    pub fn merged(&self, update: HeartHealthUpdate) -> Self {
        let mut merged = self.clone();
        overwrite(&mut merged.hypertension, update.hypertension);
        overwrite(&mut merged.cholesterol, update.cholesterol);
        overwrite(&mut merged.diabetes, update.diabetes);
        overwrite(&mut merged.smoking, update.smoking);
        overwrite(&mut merged.activity, update.activity);
        overwrite(&mut merged.family_heart_history, update.family_heart_history);
        merged
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartHealthUpdate {
    pub hypertension: Option<String>,
    pub cholesterol: Option<String>,
    pub diabetes: Option<String>,
    pub smoking: Option<String>,
    pub activity: Option<String>,
    pub family_heart_history: Option<String>,
}

impl From<HeartHealthAnswers> for HeartHealthUpdate {
    fn from(answers: HeartHealthAnswers) -> Self {
        Self {
            hypertension: Some(answers.hypertension),
            cholesterol: Some(answers.cholesterol),
            diabetes: Some(answers.diabetes),
            smoking: Some(answers.smoking),
            activity: Some(answers.activity),
            family_heart_history: Some(answers.family_heart_history),
        }
    }
}

/// Partial answers submitted with a step's "next" action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepUpdate {
    PersonalInfo(PersonalInfoUpdate),
    Diabetes(DiabetesUpdate),
    HeartHealth(HeartHealthUpdate),
}

/// Borrowed view of one step's record, the unit validation works on.
#[derive(Debug, Clone, Copy)]
pub enum StepRecord<'a> {
    PersonalInfo(&'a PersonalInfo),
    Diabetes(&'a DiabetesAnswers),
    HeartHealth(&'a HeartHealthAnswers),
}

fn overwrite(slot: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waist_options_follow_gender() {
        assert_eq!(
            WaistCategory::parse(Some(Gender::Male), ">=100"),
            Some(WaistCategory::High)
        );
        assert_eq!(WaistCategory::parse(Some(Gender::Male), ">=90"), None);
        assert_eq!(
            WaistCategory::parse(Some(Gender::Female), ">=90"),
            Some(WaistCategory::High)
        );
        assert_eq!(
            WaistCategory::parse(None, "80-89"),
            Some(WaistCategory::Elevated)
        );
        assert!(WaistCategory::is_known_label("90-99"));
        assert!(!WaistCategory::is_known_label("95"));
    }

    #[test]
    fn choices_match_only_their_canonical_spelling() {
        assert_eq!(YesNoUnsure::parse("yes"), Some(YesNoUnsure::Yes));
        for raw in ["YES", "Yes", " yes ", "yes\n"] {
            assert_eq!(YesNoUnsure::parse(raw), None, "{raw:?}");
        }
        assert_eq!(Gender::parse("Male"), None);
        assert_eq!(SmokingStatus::parse("Current"), None);
        assert_eq!(AgeBracket::parse(" >=50"), None);
        assert_eq!(WaistCategory::parse(Some(Gender::Male), ">=100 "), None);
        assert!(!WaistCategory::is_known_label(" <80"));
    }

    #[test]
    fn merge_only_touches_provided_fields() {
        let info = PersonalInfo {
            first_name: "Asha".to_string(),
            city: "Edison".to_string(),
            ..PersonalInfo::default()
        };

        let merged = info.merged(PersonalInfoUpdate {
            city: Some("Newark".to_string()),
            ..PersonalInfoUpdate::default()
        });

        assert_eq!(merged.first_name, "Asha");
        assert_eq!(merged.city, "Newark");
    }

    #[test]
    fn step_update_uses_step_tag() {
        let update: StepUpdate = serde_json::from_str(
            r#"{"step":"diabetes","waist":"<80","activity_type":"mild"}"#,
        )
        .expect("tagged update parses");

        match update {
            StepUpdate::Diabetes(update) => {
                assert_eq!(update.waist.as_deref(), Some("<80"));
                assert!(update.family_history.is_none());
            }
            other => panic!("expected diabetes update, got {other:?}"),
        }
    }
}
