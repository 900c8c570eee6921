use serde::{Deserialize, Serialize};

use super::domain::{DiabetesAnswers, HeartHealthAnswers, PersonalInfo, StepRecord, StepUpdate};
use super::validation::{
    ensure_valid, validate_capture_email, validate_diabetes_for, ValidationErrors,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Consent,
    EmailCapture,
    PersonalInfo,
    Diabetes,
    HeartHealth,
    Summary,
    Exited,
}

impl Step {
    /// Position in the four-page form, `None` for the gates and the terminal state.
    pub const fn number(self) -> Option<u8> {
        match self {
            Self::PersonalInfo => Some(1),
            Self::Diabetes => Some(2),
            Self::HeartHealth => Some(3),
            Self::Summary => Some(4),
            Self::Consent | Self::EmailCapture | Self::Exited => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Consent => "Consent",
            Self::EmailCapture => "Email Capture",
            Self::PersonalInfo => "Personal Info",
            Self::Diabetes => "Diabetes Risk",
            Self::HeartHealth => "Heart Health",
            Self::Summary => "Summary",
            Self::Exited => "Exited",
        }
    }
}

/// Everything one respondent has entered so far. Replaced wholesale on every transition,
/// whether the caller or a [`SessionRepository`](super::store::SessionRepository) holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub step: Step,
    #[serde(default)]
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub diabetes: DiabetesAnswers,
    #[serde(default)]
    pub heart_health: HeartHealthAnswers,
    #[serde(default)]
    pub consent_shown: bool,
    #[serde(default)]
    pub email_modal_shown: bool,
    /// Set when the completed answers were handed to the record store.
    #[serde(default)]
    pub record_submitted: bool,
}

impl Session {
    /// Fresh session waiting on the consent gate.
    pub fn new() -> Self {
        Self {
            step: Step::Consent,
            personal_info: PersonalInfo::default(),
            diabetes: DiabetesAnswers::default(),
            heart_health: HeartHealthAnswers::default(),
            consent_shown: true,
            email_modal_shown: false,
            record_submitted: false,
        }
    }

    fn restarted() -> Self {
        Self {
            step: Step::PersonalInfo,
            consent_shown: false,
            ..Self::new()
        }
    }

    fn exited() -> Self {
        Self {
            step: Step::Exited,
            consent_shown: false,
            ..Self::new()
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.step == Step::Exited
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    Accept,
    Deny,
    Next { update: StepUpdate },
    Previous,
    Reset,
    Home,
    ExitEmailCapture {
        #[serde(default)]
        email: Option<String>,
    },
}

impl SessionEvent {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Deny => "deny",
            Self::Next { .. } => "next",
            Self::Previous => "previous",
            Self::Reset => "reset",
            Self::Home => "home",
            Self::ExitEmailCapture { .. } => "exit_email_capture",
        }
    }
}

/// Work the caller must carry out after a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEffect {
    /// Send the completed answers to the record store. Emitted once, on leaving heart health.
    SubmitRecord,
    /// The respondent declined consent but asked for education material.
    RegisterInterest { email: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub session: Session,
    pub effect: Option<SessionEffect>,
}

impl Transition {
    fn to(session: Session) -> Self {
        Self {
            session,
            effect: None,
        }
    }

    fn with_effect(session: Session, effect: SessionEffect) -> Self {
        Self {
            session,
            effect: Some(effect),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    #[error("step answers failed validation: {0}")]
    Validation(ValidationErrors),
    #[error("'{event}' is not allowed from the {} step", .step.label())]
    InvalidTransition { step: Step, event: &'static str },
    #[error("answers for the {} step were sent while on the {} step", .update.label(), .step.label())]
    StepMismatch { step: Step, update: Step },
    #[error("the {} step was never completed: {errors}", .step.label())]
    EarlierStepIncomplete { step: Step, errors: ValidationErrors },
}

impl TransitionError {
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Compute the session that follows `event`. The input session is never modified; on error
/// the caller keeps it as is.
pub fn apply(session: &Session, event: SessionEvent) -> Result<Transition, TransitionError> {
    let event_name = event.name();
    let invalid = || TransitionError::InvalidTransition {
        step: session.step,
        event: event_name,
    };

    match (session.step, event) {
        (Step::Consent, SessionEvent::Accept) => Ok(Transition::to(Session {
            step: Step::PersonalInfo,
            consent_shown: false,
            ..session.clone()
        })),
        (Step::Consent, SessionEvent::Deny) => Ok(Transition::to(Session {
            step: Step::EmailCapture,
            consent_shown: false,
            email_modal_shown: true,
            ..session.clone()
        })),
        (Step::EmailCapture, SessionEvent::ExitEmailCapture { email }) => {
            match email.filter(|email| !email.trim().is_empty()) {
                Some(email) => {
                    validate_capture_email(&email).map_err(TransitionError::Validation)?;
                    Ok(Transition::with_effect(
                        Session::exited(),
                        SessionEffect::RegisterInterest {
                            email: email.trim().to_string(),
                        },
                    ))
                }
                None => Ok(Transition::to(Session::exited())),
            }
        }
        (step, SessionEvent::Next { update }) => advance(session, step, update),
        (Step::Diabetes, SessionEvent::Previous) => Ok(Transition::to(Session {
            step: Step::PersonalInfo,
            ..session.clone()
        })),
        (Step::HeartHealth, SessionEvent::Previous) => Ok(Transition::to(Session {
            step: Step::Diabetes,
            ..session.clone()
        })),
        (Step::Summary, SessionEvent::Reset) => Ok(Transition::to(Session::restarted())),
        (Step::Summary, SessionEvent::Home) => Ok(Transition::to(Session::exited())),
        _ => Err(invalid()),
    }
}

fn advance(
    session: &Session,
    step: Step,
    update: StepUpdate,
) -> Result<Transition, TransitionError> {
    match (step, update) {
        (Step::PersonalInfo, StepUpdate::PersonalInfo(update)) => {
            let personal_info = session.personal_info.merged(update);
            ensure_valid(StepRecord::PersonalInfo(&personal_info))
                .map_err(TransitionError::Validation)?;
            Ok(Transition::to(Session {
                step: Step::Diabetes,
                personal_info,
                ..session.clone()
            }))
        }
        (Step::Diabetes, StepUpdate::Diabetes(update)) => {
            require_earlier_steps(session, step)?;
            let diabetes = session.diabetes.merged(update);
            validate_diabetes_for(&diabetes, session.personal_info.gender())
                .into_result()
                .map_err(TransitionError::Validation)?;
            Ok(Transition::to(Session {
                step: Step::HeartHealth,
                diabetes,
                ..session.clone()
            }))
        }
        (Step::HeartHealth, StepUpdate::HeartHealth(_)) if session.record_submitted => {
            Err(TransitionError::InvalidTransition {
                step,
                event: "next",
            })
        }
        (Step::HeartHealth, StepUpdate::HeartHealth(update)) => {
            require_earlier_steps(session, step)?;
            let heart_health = session.heart_health.merged(update);
            ensure_valid(StepRecord::HeartHealth(&heart_health))
                .map_err(TransitionError::Validation)?;
            Ok(Transition::with_effect(
                Session {
                    step: Step::Summary,
                    heart_health,
                    record_submitted: true,
                    ..session.clone()
                },
                SessionEffect::SubmitRecord,
            ))
        }
        (step @ (Step::PersonalInfo | Step::Diabetes | Step::HeartHealth), update) => {
            Err(TransitionError::StepMismatch {
                step,
                update: update_step(&update),
            })
        }
        (step, _) => Err(TransitionError::InvalidTransition {
            step,
            event: "next",
        }),
    }
}

/// A form step is only reachable through valid answers on every step before it.
fn require_earlier_steps(session: &Session, step: Step) -> Result<(), TransitionError> {
    let incomplete = |step, errors| TransitionError::EarlierStepIncomplete { step, errors };

    if matches!(step, Step::Diabetes | Step::HeartHealth) {
        ensure_valid(StepRecord::PersonalInfo(&session.personal_info))
            .map_err(|errors| incomplete(Step::PersonalInfo, errors))?;
    }
    if step == Step::HeartHealth {
        validate_diabetes_for(&session.diabetes, session.personal_info.gender())
            .into_result()
            .map_err(|errors| incomplete(Step::Diabetes, errors))?;
    }
    Ok(())
}

fn update_step(update: &StepUpdate) -> Step {
    match update {
        StepUpdate::PersonalInfo(_) => Step::PersonalInfo,
        StepUpdate::Diabetes(_) => Step::Diabetes,
        StepUpdate::HeartHealth(_) => Step::HeartHealth,
    }
}
