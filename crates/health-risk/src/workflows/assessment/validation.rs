use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::domain::{
    ActivityType, AgeBracket, ContactPreference, DiabetesAnswers, FamilyDiabetesHistory, Gender,
    HeartHealthAnswers, PersonalInfo, SmokingStatus, StepRecord, WaistCategory, YesNo,
    YesNoUnsure,
};

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const SELECT_MESSAGE: &str = "Please select an option";
pub const MAX_LENGTH_MESSAGE: &str = "Maximum 100 characters allowed.";
pub const PHONE_MESSAGE: &str = "Enter a valid US phone number.";
pub const EMAIL_MESSAGE: &str = "Enter a valid email address.";
pub const CAPTURE_EMAIL_REQUIRED_MESSAGE: &str = "Please enter your email address";
pub const CAPTURE_EMAIL_INVALID_MESSAGE: &str = "Please enter a valid email address";

pub const MAX_FIELD_CHARS: usize = 100;

/// Optional country code, area code starting 2-9, then 3 + 4 digits with optional separators.
const US_PHONE_PATTERN: &str = r"^(\+1[\s.-]?)?\(?[2-9][0-9]{2}\)?[\s.-]?[0-9]{3}[\s.-]?[0-9]{4}$";
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

static US_PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(US_PHONE_PATTERN).expect("valid phone regex"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid email regex"));

/// Field name to message. Empty means the record is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }

    fn record(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.0.keys().map(String::as_str).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate one step's record.
pub fn validate(record: StepRecord<'_>) -> ValidationErrors {
    match record {
        StepRecord::PersonalInfo(info) => validate_personal_info(info),
        StepRecord::Diabetes(answers) => validate_diabetes(answers),
        StepRecord::HeartHealth(answers) => validate_heart_health(answers),
    }
}

/// Same as [`validate`], shaped for `?`.
pub fn ensure_valid(record: StepRecord<'_>) -> Result<(), ValidationErrors> {
    validate(record).into_result()
}

pub fn validate_personal_info(info: &PersonalInfo) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    for (field, value) in [
        ("first_name", &info.first_name),
        ("last_name", &info.last_name),
        ("city", &info.city),
        ("state", &info.state),
        ("phone", &info.phone),
        ("email", &info.email),
    ] {
        if is_blank(value) {
            errors.record(field, REQUIRED_MESSAGE);
        }
    }

    require_choice(&mut errors, "age", AgeBracket::parse(&info.age).is_some());
    require_choice(&mut errors, "gender", Gender::parse(&info.gender).is_some());
    require_choice(
        &mut errors,
        "contact_preference",
        ContactPreference::parse(&info.contact_preference).is_some(),
    );

    for (field, value) in [
        ("first_name", &info.first_name),
        ("last_name", &info.last_name),
        ("city", &info.city),
        ("state", &info.state),
        ("language", &info.language),
        ("country_of_origin", &info.country_of_origin),
        ("email", &info.email),
        ("religion", &info.religion),
    ] {
        if value.chars().count() > MAX_FIELD_CHARS {
            errors.record(field, MAX_LENGTH_MESSAGE);
        }
    }

    if !is_blank(&info.phone) && !is_us_phone(&info.phone) {
        errors.record("phone", PHONE_MESSAGE);
    }
    if !is_blank(&info.email) && !is_email(&info.email) {
        errors.record("email", EMAIL_MESSAGE);
    }

    errors
}

pub fn validate_diabetes(answers: &DiabetesAnswers) -> ValidationErrors {
    diabetes_errors(answers, WaistCategory::is_known_label(&answers.waist))
}

/// Diabetes validation that also requires the waist band to belong to the respondent's gender.
pub fn validate_diabetes_for(
    answers: &DiabetesAnswers,
    gender: Option<Gender>,
) -> ValidationErrors {
    diabetes_errors(
        answers,
        WaistCategory::parse(gender, &answers.waist).is_some(),
    )
}

fn diabetes_errors(answers: &DiabetesAnswers, waist_recognized: bool) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    require_choice(&mut errors, "waist", waist_recognized);
    require_choice(
        &mut errors,
        "activity_type",
        ActivityType::parse(&answers.activity_type).is_some(),
    );
    require_choice(
        &mut errors,
        "family_history",
        FamilyDiabetesHistory::parse(&answers.family_history).is_some(),
    );
    errors
}

pub fn validate_heart_health(answers: &HeartHealthAnswers) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    for (field, value) in [
        ("hypertension", &answers.hypertension),
        ("cholesterol", &answers.cholesterol),
        ("diabetes", &answers.diabetes),
        ("family_heart_history", &answers.family_heart_history),
    ] {
        require_choice(&mut errors, field, YesNoUnsure::parse(value).is_some());
    }
    require_choice(
        &mut errors,
        "smoking",
        SmokingStatus::parse(&answers.smoking).is_some(),
    );
    require_choice(
        &mut errors,
        "activity",
        YesNo::parse(&answers.activity).is_some(),
    );
    errors
}

/// Validate the address offered in the opt-in email capture after consent is denied.
pub fn validate_capture_email(email: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if is_blank(email) {
        errors.record("email", CAPTURE_EMAIL_REQUIRED_MESSAGE);
    } else if !is_email(email) {
        errors.record("email", CAPTURE_EMAIL_INVALID_MESSAGE);
    }
    errors.into_result()
}

pub fn is_us_phone(value: &str) -> bool {
    US_PHONE_RE.is_match(value.trim())
}

pub fn is_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn require_choice(errors: &mut ValidationErrors, field: &str, recognized: bool) {
    if !recognized {
        errors.record(field, SELECT_MESSAGE);
    }
}
