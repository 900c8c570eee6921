use super::common::*;
use crate::workflows::assessment::domain::{
    DiabetesUpdate, HeartHealthAnswers, HeartHealthUpdate, PersonalInfo, PersonalInfoUpdate,
    StepUpdate,
};
use crate::workflows::assessment::session::{
    apply, Session, SessionEffect, SessionEvent, Step, TransitionError,
};
use crate::workflows::assessment::validation::REQUIRED_MESSAGE;

fn next(update: StepUpdate) -> SessionEvent {
    SessionEvent::Next { update }
}

#[test]
fn new_session_waits_on_consent() {
    let session = Session::new();
    assert_eq!(session.step, Step::Consent);
    assert!(session.consent_shown);
    assert!(!session.email_modal_shown);
    assert_eq!(session.personal_info, PersonalInfo::default());
}

#[test]
fn accepting_consent_opens_personal_info() {
    let transition = apply(&Session::new(), SessionEvent::Accept).expect("accept allowed");
    assert_eq!(transition.session.step, Step::PersonalInfo);
    assert!(!transition.session.consent_shown);
    assert!(transition.effect.is_none());
}

#[test]
fn denying_consent_routes_to_email_capture_and_out() {
    let denied = apply(&Session::new(), SessionEvent::Deny).expect("deny allowed");
    assert_eq!(denied.session.step, Step::EmailCapture);
    assert!(denied.session.email_modal_shown);

    let not_interested = apply(
        &denied.session,
        SessionEvent::ExitEmailCapture { email: None },
    )
    .expect("exit allowed");
    assert!(not_interested.session.is_terminal());
    assert!(not_interested.effect.is_none());

    let interested = apply(
        &denied.session,
        SessionEvent::ExitEmailCapture {
            email: Some(" asha@example.org ".to_string()),
        },
    )
    .expect("exit with email allowed");
    assert_eq!(
        interested.effect,
        Some(SessionEffect::RegisterInterest {
            email: "asha@example.org".to_string()
        })
    );

    let err = apply(
        &denied.session,
        SessionEvent::ExitEmailCapture {
            email: Some("asha".to_string()),
        },
    )
    .expect_err("malformed email keeps the modal open");
    assert!(err.validation_errors().is_some());
}

#[test]
fn form_steps_are_unreachable_before_consent() {
    let err = apply(
        &Session::new(),
        next(StepUpdate::PersonalInfo(personal_info().into())),
    )
    .expect_err("next refused at consent");
    assert!(matches!(
        err,
        TransitionError::InvalidTransition {
            step: Step::Consent,
            event: "next"
        }
    ));
}

#[test]
fn valid_personal_info_advances_and_merges() {
    let session = session_at(Step::PersonalInfo);
    let transition = apply(
        &session,
        next(StepUpdate::PersonalInfo(personal_info().into())),
    )
    .expect("valid answers advance");

    assert_eq!(transition.session.step, Step::Diabetes);
    assert_eq!(transition.session.personal_info, personal_info());
    assert!(transition.effect.is_none());
}

#[test]
fn invalid_personal_info_stays_and_reports_fields() {
    let session = session_at(Step::PersonalInfo);
    let update = PersonalInfoUpdate {
        first_name: Some(String::new()),
        ..personal_info().into()
    };

    let err = apply(&session, next(StepUpdate::PersonalInfo(update))).expect_err("invalid");
    let errors = err.validation_errors().expect("validation failure");
    assert_eq!(errors.get("first_name"), Some(REQUIRED_MESSAGE));
    assert_eq!(errors.len(), 1);
    assert_eq!(session.step, Step::PersonalInfo);
    assert_eq!(session.personal_info, PersonalInfo::default());
}

#[test]
fn partial_updates_merge_over_stored_answers() {
    let mut session = session_at(Step::PersonalInfo);
    session.personal_info = PersonalInfo {
        city: String::new(),
        ..personal_info()
    };

    let transition = apply(
        &session,
        next(StepUpdate::PersonalInfo(PersonalInfoUpdate {
            city: Some("Iselin".to_string()),
            ..PersonalInfoUpdate::default()
        })),
    )
    .expect("merged record is valid");

    assert_eq!(transition.session.personal_info.city, "Iselin");
    assert_eq!(transition.session.personal_info.first_name, "Priya");
}

#[test]
fn diabetes_step_checks_waist_against_gender() {
    let session = session_at(Step::Diabetes);
    let err = apply(
        &session,
        next(StepUpdate::Diabetes(DiabetesUpdate {
            waist: Some(">=100".to_string()),
            ..diabetes_answers().into()
        })),
    )
    .expect_err("male band rejected for a female respondent");
    assert!(err
        .validation_errors()
        .and_then(|errors| errors.get("waist"))
        .is_some());

    let transition = apply(
        &session,
        next(StepUpdate::Diabetes(diabetes_answers().into())),
    )
    .expect("valid diabetes answers");
    assert_eq!(transition.session.step, Step::HeartHealth);
}

#[test]
fn previous_never_validates() {
    let mut session = session_at(Step::HeartHealth);
    session.diabetes.waist = "not a band".to_string();

    let back = apply(&session, SessionEvent::Previous).expect("previous allowed");
    assert_eq!(back.session.step, Step::Diabetes);

    let back = apply(&back.session, SessionEvent::Previous).expect("previous allowed");
    assert_eq!(back.session.step, Step::PersonalInfo);
    assert_eq!(back.session.diabetes.waist, "not a band");

    let err = apply(&back.session, SessionEvent::Previous).expect_err("no step before 1");
    assert!(matches!(err, TransitionError::InvalidTransition { .. }));
}

#[test]
fn finishing_heart_health_emits_one_submission() {
    let session = session_at(Step::HeartHealth);
    let transition = apply(
        &session,
        next(StepUpdate::HeartHealth(heart_answers().into())),
    )
    .expect("valid heart answers");

    assert_eq!(transition.session.step, Step::Summary);
    assert_eq!(transition.effect, Some(SessionEffect::SubmitRecord));
}

#[test]
fn invalid_heart_health_emits_nothing() {
    let session = session_at(Step::HeartHealth);
    let err = apply(
        &session,
        next(StepUpdate::HeartHealth(HeartHealthUpdate {
            smoking: Some("sometimes".to_string()),
            ..heart_answers().into()
        })),
    )
    .expect_err("invalid smoking answer");
    assert!(err.validation_errors().is_some());
}

#[test]
fn answers_for_another_step_are_refused() {
    let err = apply(
        &session_at(Step::Diabetes),
        next(StepUpdate::HeartHealth(heart_answers().into())),
    )
    .expect_err("mismatched step");
    assert!(matches!(
        err,
        TransitionError::StepMismatch {
            step: Step::Diabetes,
            update: Step::HeartHealth
        }
    ));
}

#[test]
fn summary_only_leaves_by_reset_or_home() {
    let summary = session_at(Step::Summary);

    for event in [
        SessionEvent::Previous,
        SessionEvent::Accept,
        next(StepUpdate::HeartHealth(heart_answers().into())),
    ] {
        assert!(apply(&summary, event).is_err());
    }

    let reset = apply(&summary, SessionEvent::Reset).expect("reset allowed");
    assert_eq!(reset.session.step, Step::PersonalInfo);
    assert_eq!(reset.session.personal_info, PersonalInfo::default());
    assert_eq!(reset.session.heart_health, HeartHealthAnswers::default());

    let home = apply(&summary, SessionEvent::Home).expect("home allowed");
    assert!(home.session.is_terminal());
    assert!(apply(&home.session, SessionEvent::Reset).is_err());
}

#[test]
fn events_round_trip_through_json() {
    let event: SessionEvent = serde_json::from_str(
        r#"{"type":"next","update":{"step":"heart_health","smoking":"past"}}"#,
    )
    .expect("event parses");
    match event {
        SessionEvent::Next {
            update: StepUpdate::HeartHealth(update),
        } => assert_eq!(update.smoking.as_deref(), Some("past")),
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn steps_cannot_be_skipped_by_claiming_a_later_step() {
    let mut forged = Session::new();
    forged.step = Step::HeartHealth;

    let err = apply(
        &forged,
        next(StepUpdate::HeartHealth(heart_answers().into())),
    )
    .expect_err("unanswered earlier steps");
    match err {
        TransitionError::EarlierStepIncomplete { step, errors } => {
            assert_eq!(step, Step::PersonalInfo);
            assert_eq!(errors.get("first_name"), Some(REQUIRED_MESSAGE));
        }
        other => panic!("unexpected error {other:?}"),
    }

    forged.personal_info = personal_info();
    let err = apply(
        &forged,
        next(StepUpdate::HeartHealth(heart_answers().into())),
    )
    .expect_err("diabetes step unanswered");
    assert!(matches!(
        err,
        TransitionError::EarlierStepIncomplete {
            step: Step::Diabetes,
            ..
        }
    ));

    forged.step = Step::Diabetes;
    forged.personal_info.phone = "12345".to_string();
    let err = apply(
        &forged,
        next(StepUpdate::Diabetes(diabetes_answers().into())),
    )
    .expect_err("personal info invalid");
    assert!(matches!(
        err,
        TransitionError::EarlierStepIncomplete {
            step: Step::PersonalInfo,
            ..
        }
    ));
}

#[test]
fn a_submitted_session_cannot_submit_again() {
    let transition = apply(
        &session_at(Step::HeartHealth),
        next(StepUpdate::HeartHealth(heart_answers().into())),
    )
    .expect("valid heart answers");
    assert!(transition.session.record_submitted);

    let mut replayed = transition.session;
    replayed.step = Step::HeartHealth;
    let err = apply(
        &replayed,
        next(StepUpdate::HeartHealth(heart_answers().into())),
    )
    .expect_err("second submission refused");
    assert!(matches!(
        err,
        TransitionError::InvalidTransition {
            step: Step::HeartHealth,
            event: "next"
        }
    ));

    let reset = apply(&session_at(Step::Summary), SessionEvent::Reset).expect("reset allowed");
    assert!(!reset.session.record_submitted);
}
