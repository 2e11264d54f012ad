use crate::infra::parse_date;
use crate::reports::{render_applicants, render_onboarding, render_positions};
use chrono::{Duration, Local, NaiveDate, NaiveTime};
use clap::Args;
use hiring_desk::backend::MemoryBackend;
use hiring_desk::client::{HiringBackend, HttpBackend, DEFAULT_UPCOMING_DAYS};
use hiring_desk::config::AppConfig;
use hiring_desk::error::AppError;
use hiring_desk::hiring::applications::{Applicant, ApplicantFilter, ApplicationStage};
use hiring_desk::hiring::interviews::{CompleteInterview, Interview, ScheduleInterview};
use hiring_desk::hiring::offers::OfferForm;
use hiring_desk::hiring::positions::{Position, PositionStatus};
use hiring_desk::onboarding::sections::{EmploymentDetails, PersonalInformation};
use hiring_desk::onboarding::{
    CandidateFilter, CreateOnboardingCandidate, OnboardingCandidate, SectionForm,
};
use hiring_desk::stores::{
    ApplicationsStore, InterviewsStore, OfferTemplatesStore, OffersStore, OnboardingStore,
    PositionsStore,
};
use hiring_desk::views::{ApplicantRowView, ApplicantsPage, OnboardingDashboard, PositionsOverview};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the demo date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Run against HIRING_API_URL instead of the seeded in-process backend
    #[arg(long)]
    pub(crate) remote: bool,
    /// Stop after the offer is accepted
    #[arg(long)]
    pub(crate) skip_onboarding: bool,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let transcript = if args.remote {
        let config = AppConfig::load()?;
        let backend = Arc::new(HttpBackend::new(&config.api)?);
        demo_transcript(backend, today, args.skip_onboarding).await?
    } else {
        let backend = Arc::new(MemoryBackend::seeded(today));
        demo_transcript(backend, today, args.skip_onboarding).await?
    };
    println!("{transcript}");
    Ok(())
}

/// Walks one applicant from their last interview through offer acceptance and the first
/// onboarding sections. Workflow rejections are reported in the transcript, not raised.
pub(crate) async fn demo_transcript<B: HiringBackend>(
    backend: Arc<B>,
    today: NaiveDate,
    skip_onboarding: bool,
) -> Result<String, AppError> {
    let mut out = vec![format!("Hiring desk demo ({today})")];

    let mut positions = PositionsStore::new(backend.clone());
    positions.fetch().await?;
    out.push("\nPositions".to_string());
    out.push(render_positions(&PositionsOverview::build(positions.items(), None)));

    let Some(position) = positions
        .items()
        .iter()
        .find(|position| position.status == PositionStatus::Open && !position.stages.is_empty())
        .cloned()
    else {
        out.push("No open position with interview stages to walk through.".to_string());
        return Ok(out.join("\n"));
    };

    let mut applications = ApplicationsStore::for_position(backend.clone(), position.id.clone());
    applications.fetch().await?;
    let applicants = applications.applicants(positions.items());
    out.push(format!("\nPipeline for {} {}", position.req_id, position.title));
    out.push(render_applicants(&ApplicantsPage::build(
        &applicants,
        &ApplicantFilter::default(),
        Some(&position.req_id),
    )));

    let Some(candidate) = applicants
        .iter()
        .map(ApplicantRowView::new)
        .find(|row| {
            row.can_schedule_interview && row.applicant.stage == ApplicationStage::Interview
        })
        .map(|row| row.applicant)
    else {
        out.push("No applicant is waiting on an interview round.".to_string());
        return Ok(out.join("\n"));
    };

    out.push(format!("\nInterviews for {}", candidate.name));
    let mut interviews = InterviewsStore::new(backend.clone());
    let interview = match next_interview(&mut interviews, &candidate, &position, today).await {
        Ok(Some(interview)) => interview,
        Ok(None) => {
            out.push("  No interview stage left to schedule.".to_string());
            return Ok(out.join("\n"));
        }
        Err(err) => {
            out.push(format!("  Scheduling failed: {err}"));
            return Ok(out.join("\n"));
        }
    };
    out.push(format!(
        "- Round {} ({}) on {} at {} | {}",
        interview.stage_number,
        interview.stage_name,
        interview.scheduled_date,
        interview.scheduled_time.format("%H:%M"),
        interview.location
    ));

    let feedback = CompleteInterview {
        feedback: Some("Clear lesson plan and strong lab safety answers.".to_string()),
        rating: Some(5),
    };
    if let Err(err) = interviews.complete(&interview.id, &feedback).await {
        out.push(format!("  Completion rejected: {err}"));
        return Ok(out.join("\n"));
    }
    let application = applications.get(&candidate.id).await?;
    let candidate = Applicant::from_application(&application).with_position(&position);
    let row = ApplicantRowView::new(&candidate);
    out.push(format!(
        "- Marked complete with rating 5 -> {}{}",
        row.interview_progress,
        if row.can_send_offer { " (offer ready)" } else { "" }
    ));
    if !row.can_send_offer {
        return Ok(out.join("\n"));
    }

    match applications.advance_stage(&candidate.id).await {
        Ok(advanced) => out.push(format!("- Advanced to {}", advanced.stage)),
        Err(err) => out.push(format!("  Advance rejected: {err}")),
    }

    out.push("\nOffer".to_string());
    let mut templates = OfferTemplatesStore::new(backend.clone());
    let Some(template) = templates.fetch_active().await?.cloned() else {
        out.push("  No active template found".to_string());
        return Ok(out.join("\n"));
    };
    let mut form = OfferForm::new(&candidate, &template, today);
    let payload = match form.next().and_then(|_| form.to_create_offer()) {
        Ok(payload) => payload,
        Err(err) => {
            out.push(format!("  Offer form incomplete: {err}"));
            return Ok(out.join("\n"));
        }
    };

    let mut offers = OffersStore::new(backend.clone());
    let offer = match offers.create(&payload).await {
        Ok(offer) => offer,
        Err(err) => {
            out.push(format!("  Offer rejected: {err}"));
            return Ok(out.join("\n"));
        }
    };
    out.push(format!(
        "- Sent {} using \"{}\": ${:.0} at FTE {}, starting {}, expires {}",
        offer.id, template.name, offer.salary, offer.fte, offer.start_date, offer.expiration_date
    ));
    let offer = match offers.accept(&offer.id).await {
        Ok(offer) => offer,
        Err(err) => {
            out.push(format!("  Acceptance rejected: {err}"));
            return Ok(out.join("\n"));
        }
    };
    let application = applications.get(&candidate.id).await?;
    out.push(format!(
        "- Offer {} on {} | application now {}",
        offer.status,
        offer.accepted_date.unwrap_or(today),
        application.stage
    ));

    if skip_onboarding {
        return Ok(out.join("\n"));
    }

    out.push("\nOnboarding".to_string());
    let mut onboarding = OnboardingStore::new(backend);
    let request = CreateOnboardingCandidate {
        name: candidate.name.clone(),
        email: candidate.email.clone(),
        position: candidate.position_title.clone(),
        offer_date: offer.offer_date,
        start_date: Some(offer.start_date),
        job_application: Some(candidate.id.clone()),
    };
    let new_hire = onboarding.create(&request).await?;
    for section in first_sections(&new_hire, &position) {
        let title = section.section().title();
        let saved = match section.to_update(true) {
            Ok(update) => onboarding.save_section(&new_hire.id, &update).await,
            Err(err) => {
                out.push(format!("  {title} not saved: {err}"));
                continue;
            }
        };
        match saved {
            Ok(progress) => out.push(format!(
                "- Saved {} (completed: {})",
                progress.section.title(),
                progress.is_completed
            )),
            Err(err) => out.push(format!("  {title} rejected: {err}")),
        }
    }
    if let Err(err) = onboarding.submit(&new_hire.id).await {
        out.push(format!("  Submission held: {err}"));
    }

    onboarding.fetch().await?;
    out.push(render_onboarding(&OnboardingDashboard::build(
        onboarding.items(),
        &CandidateFilter::default(),
    )));
    Ok(out.join("\n"))
}

/// The applicant's next round: an already scheduled interview when one exists, otherwise a new
/// one booked three days out.
async fn next_interview<B: HiringBackend>(
    interviews: &mut InterviewsStore<B>,
    applicant: &Applicant,
    position: &Position,
    today: NaiveDate,
) -> Result<Option<Interview>, AppError> {
    let round = applicant.completed_interview_stages + 1;
    interviews.fetch_upcoming(DEFAULT_UPCOMING_DAYS).await?;
    if let Some(existing) = interviews
        .for_application(&applicant.id)
        .find(|interview| interview.stage_number == round)
    {
        return Ok(Some(existing.clone()));
    }

    let Some(stage) = position.stage(round) else {
        return Ok(None);
    };
    let request = ScheduleInterview {
        application: applicant.id.clone(),
        stage: stage.id.clone(),
        scheduled_date: today + Duration::days(3),
        scheduled_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default(),
        location: position.worksite.clone(),
        notes: None,
    };
    Ok(Some(interviews.schedule(&request).await?))
}

fn first_sections(candidate: &OnboardingCandidate, position: &Position) -> Vec<SectionForm> {
    let (first_name, last_name) = candidate
        .name
        .split_once(' ')
        .unwrap_or((candidate.name.as_str(), ""));
    let personal = PersonalInformation {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: candidate.email.clone(),
        phone: "(630) 555-0142".to_string(),
        address: "412 Wolf Road".to_string(),
        city: "Oswego".to_string(),
        state: "IL".to_string(),
        zip_code: "60543".to_string(),
        date_of_birth: "1990-04-18".to_string(),
        ..PersonalInformation::default()
    };
    let employment = EmploymentDetails {
        status: "Full-time".to_string(),
        hire_date: candidate
            .start_date
            .map(|date| date.to_string())
            .unwrap_or_default(),
        work_location: position.worksite.clone(),
        department: position.department.clone(),
        job_title: position.title.clone(),
        ..EmploymentDetails::default()
    };
    vec![
        SectionForm::PersonalInfo(personal),
        SectionForm::EmploymentDetails(employment),
    ]
}
