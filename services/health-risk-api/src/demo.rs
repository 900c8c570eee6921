use crate::infra::{InMemoryRecordSubmitter, InMemorySessionRepository};
use clap::Args;
use health_risk::config::SubmissionPolicy;
use health_risk::error::AppError;
use health_risk::workflows::assessment::{
    assess_diabetes, assess_heart, AssessmentService, AssessmentSummary, DiabetesAnswers,
    DiabetesAssessment, FieldCipher, HeartAssessment, HeartHealthAnswers, PersonalInfo,
    PersonalInfoUpdate, SessionEvent, StepUpdate, StoredStep, SubmissionTicket, ENCRYPTED_FIELDS,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct ScoreArgs {
    /// Age bracket (<33, 35-49, >=50)
    #[arg(long, default_value = "")]
    pub(crate) age: String,
    /// Gender (male, female, other, prefer-not-to-say)
    #[arg(long, default_value = "")]
    pub(crate) gender: String,
    /// Waist band label for the given gender, e.g. 90-99
    #[arg(long, default_value = "")]
    pub(crate) waist: String,
    /// Physical activity type (vigorous, moderate, mild, none)
    #[arg(long, default_value = "")]
    pub(crate) activity: String,
    /// Parents with diabetes (none, one, both)
    #[arg(long, default_value = "")]
    pub(crate) family_history: String,
    /// High blood pressure (yes, no, not_sure)
    #[arg(long, default_value = "")]
    pub(crate) hypertension: String,
    /// Abnormal cholesterol (yes, no, not_sure)
    #[arg(long, default_value = "")]
    pub(crate) cholesterol: String,
    /// Diabetes or prediabetes (yes, no, not_sure)
    #[arg(long, default_value = "")]
    pub(crate) diabetes: String,
    /// Smoking status (current, past, no)
    #[arg(long, default_value = "")]
    pub(crate) smoking: String,
    /// Answer to the heart health activity question (yes, no)
    #[arg(long, default_value = "")]
    pub(crate) heart_activity: String,
    /// Early heart disease in immediate family (yes, no, not_sure)
    #[arg(long, default_value = "")]
    pub(crate) family_heart_history: String,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Await the record submission before showing the summary.
    #[arg(long)]
    pub(crate) blocking: bool,
    /// Decline consent and leave an email for education material instead.
    #[arg(long)]
    pub(crate) decline: bool,
}

pub(crate) fn run_score(args: ScoreArgs) {
    let personal = PersonalInfo {
        age: args.age,
        gender: args.gender,
        ..PersonalInfo::default()
    };
    let diabetes = DiabetesAnswers {
        waist: args.waist,
        activity_type: args.activity,
        family_history: args.family_history,
    };
    let heart = HeartHealthAnswers {
        hypertension: args.hypertension,
        cholesterol: args.cholesterol,
        diabetes: args.diabetes,
        smoking: args.smoking,
        activity: args.heart_activity,
        family_heart_history: args.family_heart_history,
    };

    render_diabetes(&assess_diabetes(&personal, &diabetes));
    render_heart(&assess_heart(&heart));
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let policy = if args.blocking {
        SubmissionPolicy::Blocking
    } else {
        SubmissionPolicy::Optimistic
    };
    let submitter = Arc::new(InMemoryRecordSubmitter::default());
    let sessions = Arc::new(InMemorySessionRepository::default());
    let cipher = FieldCipher::ephemeral();
    let service = AssessmentService::new(Arc::clone(&submitter), sessions, cipher, policy);

    let id = service.open()?.id;
    println!("Health risk assessment demo ({policy:?} submission), session {id}");

    if args.decline {
        let step = service.dispatch(&id, SessionEvent::Deny).await?;
        println!("Consent declined, now at {}", step.record.session.step.label());
        let step = service
            .dispatch(
                &id,
                SessionEvent::ExitEmailCapture {
                    email: Some("asha.k@example.org".to_string()),
                },
            )
            .await?;
        println!(
            "Education material requested, session {}",
            step.record.session.step.label()
        );
        return Ok(());
    }

    let step = service.dispatch(&id, SessionEvent::Accept).await?;
    println!("Consent accepted, now at {}", step.record.session.step.label());

    let bad_phone = PersonalInfoUpdate {
        phone: Some("555-0100".to_string()),
        ..demo_personal_info().into()
    };
    match service
        .dispatch(
            &id,
            SessionEvent::Next {
                update: StepUpdate::PersonalInfo(bad_phone),
            },
        )
        .await
    {
        Ok(_) => println!("  Unexpectedly accepted an invalid phone number"),
        Err(err) => println!("  First attempt refused: {err}"),
    }

    for update in [
        StepUpdate::PersonalInfo(demo_personal_info().into()),
        StepUpdate::Diabetes(demo_diabetes_answers().into()),
    ] {
        let step = service.dispatch(&id, SessionEvent::Next { update }).await?;
        println!("Answers saved, now at {}", step.record.session.step.label());
    }

    let StoredStep {
        record,
        summary,
        submission,
    } = service
        .dispatch(
            &id,
            SessionEvent::Next {
                update: StepUpdate::HeartHealth(demo_heart_answers().into()),
            },
        )
        .await?;
    println!(
        "Questionnaires complete, now at {} (revision {})",
        record.session.step.label(),
        record.revision
    );

    if let Some(summary) = summary {
        render_summary(&summary);
    }
    report_submission(submission).await;

    for record in submitter.records() {
        println!("\nStored record (identifying fields encrypted)");
        for (field, value) in record.fields() {
            if ENCRYPTED_FIELDS.contains(&field.as_str()) {
                println!("  {field}: <{} chars sealed>", value.as_str().map_or(0, str::len));
            } else {
                println!("  {field}: {value}");
            }
        }
    }

    let restarted = service.dispatch(&id, SessionEvent::Reset).await?.record;
    println!(
        "\nReset for the next respondent, now at {}",
        restarted.session.step.label()
    );
    Ok(())
}

async fn report_submission(submission: Option<SubmissionTicket>) {
    match submission {
        Some(SubmissionTicket::Confirmed(receipt)) => {
            println!("\nSubmission confirmed as {}", receipt.reference);
        }
        Some(SubmissionTicket::Dispatched(handle)) => match handle.await {
            Ok(Ok(receipt)) => println!("\nBackground submission stored as {}", receipt.reference),
            Ok(Err(err)) => println!("\nBackground submission failed: {err}"),
            Err(err) => println!("\nBackground submission task aborted: {err}"),
        },
        None => println!("\nNo submission was triggered"),
    }
}

fn render_summary(summary: &AssessmentSummary) {
    println!("\nAssessment summary");
    println!("  Participant: {}", summary.participant);
    println!("  Gender: {}", summary.gender);
    println!("  Date: {}", summary.assessed_on.format("%B %-d, %Y"));
    render_diabetes(&summary.diabetes);
    println!("  {}", summary.diabetes_interpretation);
    render_heart(&summary.heart);
    println!("  {}", summary.heart_interpretation);
    println!("  Notes:");
    for note in &summary.guidance {
        println!("  - {note}");
    }
}

fn render_diabetes(assessment: &DiabetesAssessment) {
    println!(
        "Diabetes risk (IDRS): {} / 100, {} ({})",
        assessment.score,
        assessment.label,
        assessment.color.hex()
    );
    for component in &assessment.components {
        println!(
            "  {:?}: +{} ({})",
            component.factor, component.points, component.notes
        );
    }
}

fn render_heart(assessment: &HeartAssessment) {
    println!(
        "Heart health risk: {} / 6, {} ({})",
        assessment.score,
        assessment.label,
        assessment.color.hex()
    );
    for component in assessment.components.iter().filter(|c| c.points > 0) {
        println!("  {:?}: {}", component.factor, component.notes);
    }
}

fn demo_personal_info() -> PersonalInfo {
    PersonalInfo {
        first_name: "Arjun".to_string(),
        last_name: "Mehta".to_string(),
        age: ">=50".to_string(),
        gender: "male".to_string(),
        city: "Jersey City".to_string(),
        state: "NJ".to_string(),
        language: "Gujarati".to_string(),
        country_of_origin: "India".to_string(),
        phone: "201-555-0187".to_string(),
        email: "arjun.mehta@example.com".to_string(),
        religion: String::new(),
        contact_preference: "sms".to_string(),
    }
}

fn demo_diabetes_answers() -> DiabetesAnswers {
    DiabetesAnswers {
        waist: "90-99".to_string(),
        activity_type: "mild".to_string(),
        family_history: "one".to_string(),
    }
}

fn demo_heart_answers() -> HeartHealthAnswers {
    HeartHealthAnswers {
        hypertension: "yes".to_string(),
        cholesterol: "not_sure".to_string(),
        diabetes: "no".to_string(),
        smoking: "past".to_string(),
        activity: "no".to_string(),
        family_heart_history: "yes".to_string(),
    }
}
