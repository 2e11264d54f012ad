use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};

use super::{single_page, BackendError};
use crate::client::{ApiError, ApplicantQuery, HiringBackend, ListResponse};
use crate::fixtures::{self, Seed};
use crate::hiring::applications::{next_stage, Application, ApplicationStage};
use crate::hiring::interviews::{
    self, CompleteInterview, Interview, InterviewStats, InterviewStatus, InterviewUpdate,
    ScheduleInterview,
};
use crate::hiring::offers::{
    extract_template_fields, CreateOffer, CreateOfferTemplate, DeclineOffer, Offer, OfferStats,
    OfferStatus, OfferTemplate, OfferUpdate, PreviewResponse,
};
use crate::hiring::positions::{
    InterviewStage, Position, PositionForm, PositionStats, PositionStatus,
};
use crate::hiring::users::UserDirectory;
use crate::hiring::window_end;
use crate::onboarding::{
    CreateOnboardingCandidate, OnboardingCandidate, OnboardingError, OnboardingStats,
    OnboardingSubmitted, SectionSaved, SectionUpdate,
};

const FINAL_STAGE: &str = "Application is already at final stage";
const REJECTED_STAGE: &str = "Rejected applications cannot be advanced";
const DATE_FORMAT_MESSAGE: &str = "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.";
const SUBMITTED_MESSAGE: &str = "Onboarding form submitted successfully";

trait Record {
    fn id(&self) -> &str;
}

macro_rules! record {
    ($($ty:ty),*) => {
        $(impl Record for $ty {
            fn id(&self) -> &str {
                &self.id
            }
        })*
    };
}

record!(Application, Position, Interview, Offer, OfferTemplate, OnboardingCandidate);

fn find<'a, T: Record>(items: &'a [T], id: &str) -> Result<&'a T, BackendError> {
    items
        .iter()
        .find(|item| item.id() == id)
        .ok_or(BackendError::NotFound)
}

fn find_mut<'a, T: Record>(items: &'a mut [T], id: &str) -> Result<&'a mut T, BackendError> {
    items
        .iter_mut()
        .find(|item| item.id() == id)
        .ok_or(BackendError::NotFound)
}

fn remove<T: Record>(items: &mut Vec<T>, id: &str) -> Result<T, BackendError> {
    let index = items
        .iter()
        .position(|item| item.id() == id)
        .ok_or(BackendError::NotFound)?;
    Ok(items.remove(index))
}

/// Mutex-guarded hiring records that follow the backend's workflow rules.
#[derive(Debug)]
pub struct MemoryBackend {
    state: Mutex<Seed>,
    next_id: AtomicU64,
    today: Option<NaiveDate>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new(Seed::default())
    }
}

impl MemoryBackend {
    pub fn new(seed: Seed) -> Self {
        Self {
            state: Mutex::new(seed),
            next_id: AtomicU64::new(1000),
            today: None,
        }
    }

    /// Seeded with the demo records laid out around `today`, with the clock pinned to it.
    pub fn seeded(today: NaiveDate) -> Self {
        Self::new(fixtures::seed(today)).with_today(today)
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }

    /// `today` and the last day of a `days` window, resolved before the state lock is taken.
    fn window(&self, days: i64) -> Result<(NaiveDate, NaiveDate), BackendError> {
        let today = self.today();
        let end = window_end(today, days).ok_or_else(|| {
            BackendError::invalid("days", format!("{days} days is out of range"))
        })?;
        Ok((today, end))
    }

    fn now(&self) -> DateTime<Utc> {
        match self.today {
            Some(day) => day
                .and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default())
                .and_utc(),
            None => Utc::now(),
        }
    }

    fn state(&self) -> MutexGuard<'_, Seed> {
        self.state.lock().expect("memory backend mutex poisoned")
    }

    fn allocate_id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    pub fn applications(&self, position: Option<&str>) -> Vec<Application> {
        self.state()
            .applications
            .iter()
            .filter(|application| position.map_or(true, |id| application.position == id))
            .cloned()
            .collect()
    }

    pub fn application(&self, id: &str) -> Result<Application, BackendError> {
        find(&self.state().applications, id).cloned()
    }

    pub fn advance_stage(&self, id: &str) -> Result<Application, BackendError> {
        let mut state = self.state();
        let application = find_mut(&mut state.applications, id)?;
        if application.stage == ApplicationStage::Rejected {
            return Err(BackendError::rejected(REJECTED_STAGE));
        }
        application.stage =
            next_stage(application.stage).ok_or_else(|| BackendError::rejected(FINAL_STAGE))?;
        tracing::info!(application = id, stage = %application.stage, "application advanced");
        Ok(application.clone())
    }

    pub fn reject_application(&self, id: &str) -> Result<Application, BackendError> {
        let mut state = self.state();
        let application = find_mut(&mut state.applications, id)?;
        application.stage = ApplicationStage::Rejected;
        tracing::info!(application = id, "application rejected");
        Ok(application.clone())
    }

    /// Forces any stage, bypassing the workflow. The stage must match a label exactly.
    pub fn demo_set_stage(
        &self,
        id: &str,
        stage: Option<&str>,
    ) -> Result<Application, BackendError> {
        let mut state = self.state();
        let application = find_mut(&mut state.applications, id)?;
        let raw = stage
            .filter(|raw| !raw.is_empty())
            .ok_or_else(|| BackendError::rejected("stage parameter is required"))?;
        let stage = ApplicationStage::all()
            .into_iter()
            .find(|candidate| candidate.label() == raw)
            .ok_or_else(|| {
                let valid: Vec<&str> = ApplicationStage::all()
                    .into_iter()
                    .map(ApplicationStage::label)
                    .collect();
                BackendError::Rejected(format!(
                    "Invalid stage. Must be one of: {}",
                    valid.join(", ")
                ))
            })?;
        application.stage = stage;
        tracing::warn!(application = id, stage = %stage, "stage forced");
        Ok(application.clone())
    }

    pub fn positions(&self) -> Vec<Position> {
        let state = self.state();
        state
            .positions
            .iter()
            .map(|position| with_counts(&state, position))
            .collect()
    }

    pub fn position(&self, id: &str) -> Result<Position, BackendError> {
        let state = self.state();
        find(&state.positions, id).map(|position| with_counts(&state, position))
    }

    pub fn create_position(&self, form: &PositionForm) -> Result<Position, BackendError> {
        let parsed = ParsedPosition::from_form(form)?;
        let id = self.allocate_id("pos");
        let mut state = self.state();
        if state
            .positions
            .iter()
            .any(|position| position.req_id == form.req_id.trim())
        {
            return Err(BackendError::invalid(
                "req_id",
                "position with this req id already exists.",
            ));
        }

        let mut position = Position {
            id: id.clone(),
            req_id: String::new(),
            title: String::new(),
            department: String::new(),
            worksite: String::new(),
            primary_job_title: String::new(),
            fte: 0.0,
            salary_range: String::new(),
            start_date: None,
            posting_start_date: None,
            posting_end_date: None,
            status: PositionStatus::Draft,
            description: String::new(),
            requirements: String::new(),
            applicant_count: 0,
            interview_count: 0,
            stages: Vec::new(),
            interview_stages: 0,
            created_at: Some(self.now()),
        };
        parsed.apply(form, &mut position);
        tracing::info!(position = %id, req_id = %position.req_id, "position created");
        state.positions.push(position.clone());
        Ok(position)
    }

    pub fn update_position(&self, id: &str, form: &PositionForm) -> Result<Position, BackendError> {
        let parsed = ParsedPosition::from_form(form)?;
        let mut guard = self.state();
        let state = &mut *guard;
        if state
            .positions
            .iter()
            .any(|position| position.id != id && position.req_id == form.req_id.trim())
        {
            return Err(BackendError::invalid(
                "req_id",
                "position with this req id already exists.",
            ));
        }
        let position = find_mut(&mut state.positions, id)?;
        parsed.apply(form, position);
        let updated = position.clone();
        Ok(with_counts(state, &updated))
    }

    /// Removes the position with its applications and everything hanging off them.
    pub fn delete_position(&self, id: &str) -> Result<(), BackendError> {
        let mut guard = self.state();
        let state = &mut *guard;
        remove(&mut state.positions, id)?;
        let orphaned: Vec<String> = state
            .applications
            .iter()
            .filter(|application| application.position == id)
            .map(|application| application.id.clone())
            .collect();
        state
            .applications
            .retain(|application| application.position != id);
        state
            .interviews
            .retain(|interview| !orphaned.contains(&interview.application));
        state
            .offers
            .retain(|offer| !orphaned.contains(&offer.application));
        tracing::info!(position = id, removed_applications = orphaned.len(), "position deleted");
        Ok(())
    }

    /// `stage` of `"all"` or `None` keeps every stage.
    /// `certified` filters only on `"true"`/`"false"`.
    pub fn position_applicants(
        &self,
        id: &str,
        stage: Option<&str>,
        certified: Option<&str>,
    ) -> Result<Vec<Application>, BackendError> {
        let state = self.state();
        find(&state.positions, id)?;
        let stage = stage.filter(|stage| !stage.is_empty() && *stage != "all");
        let certified = match certified {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        };
        Ok(state
            .applications
            .iter()
            .filter(|application| application.position == id)
            .filter(|application| stage.map_or(true, |stage| application.stage.label() == stage))
            .filter(|application| certified.map_or(true, |flag| application.certified == flag))
            .cloned()
            .collect())
    }

    pub fn position_stats(&self) -> PositionStats {
        let today = self.today();
        let month_start = today.with_day(1).unwrap_or(today);
        let state = self.state();
        let status_count = |status: PositionStatus| {
            state
                .positions
                .iter()
                .filter(|position| position.status == status)
                .count()
        };
        let offer_count = |status: OfferStatus| {
            state
                .offers
                .iter()
                .filter(|offer| offer.status == status)
                .count()
        };
        PositionStats {
            total_positions: state.positions.len(),
            open_positions: state
                .positions
                .iter()
                .filter(|position| position.is_accepting_applications(today))
                .count(),
            draft_positions: status_count(PositionStatus::Draft),
            closed_positions: status_count(PositionStatus::Closed),
            total_applications: state.applications.len(),
            applications_this_month: state
                .applications
                .iter()
                .filter_map(|application| application.submitted_at)
                .filter(|submitted| submitted.date_naive() >= month_start)
                .count(),
            pending_offers: offer_count(OfferStatus::Pending),
            accepted_offers: offer_count(OfferStatus::Accepted),
        }
    }

    pub fn interviews(&self) -> Vec<Interview> {
        self.state().interviews.clone()
    }

    pub fn interview(&self, id: &str) -> Result<Interview, BackendError> {
        find(&self.state().interviews, id).cloned()
    }

    pub fn upcoming_interviews(&self, days: i64) -> Result<Vec<Interview>, BackendError> {
        let (today, end) = self.window(days)?;
        Ok(interviews::upcoming(&self.state().interviews, today, end)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn interviews_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<Interview> {
        interviews::in_date_range(&self.state().interviews, start, end)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Query-string form of [`Self::interviews_between`]; both bounds are required.
    pub fn interviews_in_range(
        &self,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Vec<Interview>, BackendError> {
        let (Some(start), Some(end)) = (
            start.filter(|value| !value.is_empty()),
            end.filter(|value| !value.is_empty()),
        ) else {
            return Err(BackendError::rejected(
                "start_date and end_date parameters are required",
            ));
        };
        let start = parse_date(start)
            .ok_or_else(|| BackendError::invalid("start_date", DATE_FORMAT_MESSAGE))?;
        let end =
            parse_date(end).ok_or_else(|| BackendError::invalid("end_date", DATE_FORMAT_MESSAGE))?;
        Ok(self.interviews_between(start, end))
    }

    pub fn schedule_interview(
        &self,
        request: &ScheduleInterview,
    ) -> Result<Interview, BackendError> {
        let id = self.allocate_id("int");
        let mut state = self.state();
        let application = find(&state.applications, &request.application)
            .map_err(|_| invalid_pk("application", &request.application))?;
        let position = find(&state.positions, &application.position)?;
        let stage = position
            .stages
            .iter()
            .find(|stage| stage.id == request.stage)
            .ok_or_else(|| invalid_pk("stage", &request.stage))?;

        let interview = Interview {
            id: id.clone(),
            application: application.id.clone(),
            stage: stage.id.clone(),
            stage_number: stage.stage_number,
            stage_name: stage.stage_name.clone(),
            scheduled_date: request.scheduled_date,
            scheduled_time: request.scheduled_time,
            location: request.location.clone(),
            zoom_link: Some(zoom_link(&id, self.now())),
            status: InterviewStatus::Scheduled,
            notes: request.notes.clone(),
            feedback: None,
            rating: None,
            applicant_name: application.applicant_name.clone(),
            position_title: position.title.clone(),
        };
        tracing::info!(
            interview = %id,
            application = %interview.application,
            stage = interview.stage_number,
            date = %interview.scheduled_date,
            "interview scheduled"
        );
        state.interviews.push(interview.clone());
        Ok(interview)
    }

    /// Completes the interview and raises the application's completed stage count to its
    /// stage number.
    pub fn complete_interview(
        &self,
        id: &str,
        request: &CompleteInterview,
    ) -> Result<Interview, BackendError> {
        if let Some(rating) = request.rating {
            if !(1..=5).contains(&rating) {
                return Err(BackendError::invalid("rating", "Rating must be between 1 and 5."));
            }
        }
        let mut guard = self.state();
        let state = &mut *guard;
        let interview = find_mut(&mut state.interviews, id)?;
        interview.status = InterviewStatus::Completed;
        if let Some(feedback) = request.feedback.as_ref().filter(|text| !text.is_empty()) {
            interview.feedback = Some(feedback.clone());
        }
        if request.rating.is_some() {
            interview.rating = request.rating;
        }
        let completed = interview.clone();

        if let Ok(application) = find_mut(&mut state.applications, &completed.application) {
            application.completed_interview_stages = application
                .completed_interview_stages
                .max(completed.stage_number);
        }
        tracing::info!(interview = id, stage = completed.stage_number, "interview completed");
        Ok(completed)
    }

    pub fn update_interview(
        &self,
        id: &str,
        update: &InterviewUpdate,
    ) -> Result<Interview, BackendError> {
        let mut state = self.state();
        let interview = find_mut(&mut state.interviews, id)?;
        if let Some(date) = update.scheduled_date {
            interview.scheduled_date = date;
        }
        if let Some(time) = update.scheduled_time {
            interview.scheduled_time = time;
        }
        if let Some(location) = &update.location {
            interview.location = location.clone();
        }
        if let Some(status) = update.status {
            interview.status = status;
        }
        if let Some(notes) = &update.notes {
            interview.notes = Some(notes.clone());
        }
        Ok(interview.clone())
    }

    pub fn delete_interview(&self, id: &str) -> Result<(), BackendError> {
        remove(&mut self.state().interviews, id).map(|_| ())
    }

    pub fn interview_stats(&self) -> InterviewStats {
        let today = self.today();
        InterviewStats::from_interviews(&self.state().interviews, today)
    }

    /// Newest offer first.
    pub fn offers(&self) -> Vec<Offer> {
        let mut offers = self.state().offers.clone();
        offers.sort_by(|a, b| b.offer_date.cmp(&a.offer_date));
        offers
    }

    pub fn offer(&self, id: &str) -> Result<Offer, BackendError> {
        find(&self.state().offers, id).cloned()
    }

    pub fn create_offer(&self, request: &CreateOffer) -> Result<Offer, BackendError> {
        if request.salary <= 0.0 {
            return Err(BackendError::invalid("salary", "Salary must be greater than zero."));
        }
        if request.expiration_date < request.offer_date {
            return Err(BackendError::invalid(
                "expiration_date",
                "Expiration date cannot be before the offer date.",
            ));
        }
        let id = self.allocate_id("offer");
        let mut state = self.state();
        let application = find(&state.applications, &request.application)
            .map_err(|_| invalid_pk("application", &request.application))?;
        let position = state
            .positions
            .iter()
            .find(|position| position.id == application.position);

        let offer = Offer {
            id: id.clone(),
            application: application.id.clone(),
            salary: request.salary,
            fte: request.fte,
            start_date: request.start_date,
            benefits: request.benefits.clone(),
            offer_date: request.offer_date,
            expiration_date: request.expiration_date,
            status: OfferStatus::Pending,
            accepted_date: None,
            declined_reason: None,
            template_text: request.template_text.clone(),
            template_data: request.template_data.clone(),
            candidate_name: application.applicant_name.clone(),
            candidate_email: application.applicant_email.clone(),
            position_title: position.map(|p| p.title.clone()).unwrap_or_default(),
            position_req_id: position.map(|p| p.req_id.clone()).unwrap_or_default(),
            department: position.map(|p| p.department.clone()).unwrap_or_default(),
            worksite: position.map(|p| p.worksite.clone()).unwrap_or_default(),
            employee_category: "Certified".to_string(),
        };
        tracing::info!(
            offer = %id,
            application = %offer.application,
            salary = offer.salary,
            "offer created"
        );
        state.offers.push(offer.clone());
        Ok(offer)
    }

    pub fn update_offer(&self, id: &str, update: &OfferUpdate) -> Result<Offer, BackendError> {
        let mut state = self.state();
        let offer = find_mut(&mut state.offers, id)?;
        if let Some(salary) = update.salary {
            offer.salary = salary;
        }
        if let Some(fte) = update.fte {
            offer.fte = fte;
        }
        if let Some(start_date) = update.start_date {
            offer.start_date = start_date;
        }
        if let Some(benefits) = &update.benefits {
            offer.benefits = benefits.clone();
        }
        if let Some(expiration_date) = update.expiration_date {
            offer.expiration_date = expiration_date;
        }
        if let Some(status) = update.status {
            offer.status = status;
        }
        Ok(offer.clone())
    }

    pub fn delete_offer(&self, id: &str) -> Result<(), BackendError> {
        remove(&mut self.state().offers, id).map(|_| ())
    }

    /// Pending offers only. Moves the application to `Offer Accepted`.
    pub fn accept_offer(&self, id: &str) -> Result<Offer, BackendError> {
        let today = self.today();
        let mut guard = self.state();
        let state = &mut *guard;
        let offer = find_mut(&mut state.offers, id)?;
        if offer.status != OfferStatus::Pending {
            return Err(BackendError::rejected("Only pending offers can be accepted"));
        }
        offer.status = OfferStatus::Accepted;
        offer.accepted_date = Some(today);
        let accepted = offer.clone();

        if let Ok(application) = find_mut(&mut state.applications, &accepted.application) {
            application.stage = ApplicationStage::OfferAccepted;
        }
        tracing::info!(offer = id, application = %accepted.application, "offer accepted");
        Ok(accepted)
    }

    pub fn decline_offer(&self, id: &str, request: &DeclineOffer) -> Result<Offer, BackendError> {
        let mut state = self.state();
        let offer = find_mut(&mut state.offers, id)?;
        if offer.status != OfferStatus::Pending {
            return Err(BackendError::rejected("Only pending offers can be declined"));
        }
        offer.status = OfferStatus::Declined;
        offer.declined_reason = Some(request.reason.clone());
        tracing::info!(offer = id, "offer declined");
        Ok(offer.clone())
    }

    pub fn expiring_offers(&self, days: i64) -> Result<Vec<Offer>, BackendError> {
        let (today, end) = self.window(days)?;
        Ok(self
            .state()
            .offers
            .iter()
            .filter(|offer| offer.is_expiring_by(today, end))
            .cloned()
            .collect())
    }

    pub fn offer_stats(&self) -> OfferStats {
        OfferStats::from_offers(&self.state().offers)
    }

    pub fn offer_templates(&self) -> Vec<OfferTemplate> {
        self.state().offer_templates.clone()
    }

    pub fn offer_template(&self, id: &str) -> Result<OfferTemplate, BackendError> {
        find(&self.state().offer_templates, id).cloned()
    }

    pub fn active_offer_template(&self) -> Result<OfferTemplate, BackendError> {
        self.state()
            .offer_templates
            .iter()
            .find(|template| template.is_active)
            .cloned()
            .ok_or_else(|| BackendError::Missing("No active template found".to_string()))
    }

    pub fn create_offer_template(
        &self,
        request: &CreateOfferTemplate,
    ) -> Result<OfferTemplate, BackendError> {
        validate_template(request)?;
        let template = OfferTemplate {
            id: self.allocate_id("tpl"),
            name: request.name.trim().to_string(),
            template_text: request.template_text.clone(),
            description: request.description.clone(),
            is_active: request.is_active,
            extracted_fields: extract_template_fields(&request.template_text),
            created_at: Some(self.now()),
        };
        self.state().offer_templates.push(template.clone());
        Ok(template)
    }

    pub fn update_offer_template(
        &self,
        id: &str,
        request: &CreateOfferTemplate,
    ) -> Result<OfferTemplate, BackendError> {
        validate_template(request)?;
        let mut state = self.state();
        let template = find_mut(&mut state.offer_templates, id)?;
        template.name = request.name.trim().to_string();
        template.template_text = request.template_text.clone();
        template.description = request.description.clone();
        template.is_active = request.is_active;
        template.extracted_fields = extract_template_fields(&request.template_text);
        Ok(template.clone())
    }

    pub fn delete_offer_template(&self, id: &str) -> Result<(), BackendError> {
        remove(&mut self.state().offer_templates, id).map(|_| ())
    }

    pub fn preview_offer_template(
        &self,
        id: &str,
        data: &BTreeMap<String, String>,
    ) -> Result<PreviewResponse, BackendError> {
        let state = self.state();
        let template = find(&state.offer_templates, id)?;
        Ok(PreviewResponse {
            preview: template.fill(data),
        })
    }

    pub fn onboarding_candidates(&self) -> Vec<OnboardingCandidate> {
        self.state().onboarding_candidates.clone()
    }

    pub fn onboarding_candidate(&self, id: &str) -> Result<OnboardingCandidate, BackendError> {
        find(&self.state().onboarding_candidates, id).cloned()
    }

    pub fn create_onboarding_candidate(
        &self,
        request: &CreateOnboardingCandidate,
    ) -> Result<OnboardingCandidate, BackendError> {
        if request.name.trim().is_empty() {
            return Err(BackendError::invalid("name", "This field may not be blank."));
        }
        if request.email.trim().is_empty() {
            return Err(BackendError::invalid("email", "This field may not be blank."));
        }
        let candidate = OnboardingCandidate::new(self.allocate_id("onb"), request.clone());
        self.state().onboarding_candidates.push(candidate.clone());
        Ok(candidate)
    }

    pub fn update_onboarding_section(
        &self,
        id: &str,
        update: &SectionUpdate,
    ) -> Result<SectionSaved, BackendError> {
        let now = self.now();
        let mut state = self.state();
        let candidate = find_mut(&mut state.onboarding_candidates, id)?;
        let section = candidate
            .record_section(update.clone(), now)
            .map_err(onboarding_error)?
            .clone();
        Ok(SectionSaved {
            section,
            candidate: candidate.clone(),
        })
    }

    pub fn submit_onboarding(&self, id: &str) -> Result<OnboardingSubmitted, BackendError> {
        let now = self.now();
        let mut state = self.state();
        let candidate = find_mut(&mut state.onboarding_candidates, id)?;
        candidate.submit(now).map_err(onboarding_error)?;
        tracing::info!(candidate = id, "onboarding submitted");
        Ok(OnboardingSubmitted {
            message: SUBMITTED_MESSAGE.to_string(),
            candidate: candidate.clone(),
        })
    }

    pub fn delete_onboarding_candidate(&self, id: &str) -> Result<(), BackendError> {
        remove(&mut self.state().onboarding_candidates, id).map(|_| ())
    }

    pub fn onboarding_stats(&self) -> OnboardingStats {
        OnboardingStats::from_candidates(&self.state().onboarding_candidates)
    }

    pub fn users(&self) -> UserDirectory {
        UserDirectory {
            users: self.state().users.clone(),
        }
    }
}

/// Position with its applicant and scheduled-interview counters recomputed.
fn with_counts(state: &Seed, position: &Position) -> Position {
    let application_ids: Vec<&str> = state
        .applications
        .iter()
        .filter(|application| application.position == position.id)
        .map(|application| application.id.as_str())
        .collect();
    let mut position = position.clone();
    position.applicant_count = application_ids.len() as u32;
    position.interview_count = state
        .interviews
        .iter()
        .filter(|interview| interview.status == InterviewStatus::Scheduled)
        .filter(|interview| application_ids.contains(&interview.application.as_str()))
        .count() as u32;
    position
}

/// Typed values of a validated [`PositionForm`].
struct ParsedPosition {
    fte: f64,
    start_date: NaiveDate,
    posting_start_date: Option<NaiveDate>,
    posting_end_date: Option<NaiveDate>,
}

impl ParsedPosition {
    fn from_form(form: &PositionForm) -> Result<Self, BackendError> {
        form.validate().map_err(BackendError::Invalid)?;
        let fte = form
            .fte
            .trim()
            .parse::<f64>()
            .map_err(|_| BackendError::invalid("fte", "A valid number is required."))?;
        let start_date = parse_date(&form.start_date)
            .ok_or_else(|| BackendError::invalid("start_date", DATE_FORMAT_MESSAGE))?;
        let optional = |field: &str, raw: &str| -> Result<Option<NaiveDate>, BackendError> {
            if raw.trim().is_empty() {
                return Ok(None);
            }
            parse_date(raw)
                .map(Some)
                .ok_or_else(|| BackendError::invalid(field, DATE_FORMAT_MESSAGE))
        };
        Ok(Self {
            fte,
            start_date,
            posting_start_date: optional("posting_start_date", &form.posting_start_date)?,
            posting_end_date: optional("posting_end_date", &form.posting_end_date)?,
        })
    }

    fn apply(self, form: &PositionForm, position: &mut Position) {
        position.req_id = form.req_id.trim().to_string();
        position.title = form.title.trim().to_string();
        position.department = form.department.trim().to_string();
        position.worksite = form.worksite.trim().to_string();
        position.primary_job_title = form.primary_job_title.trim().to_string();
        position.fte = self.fte;
        position.salary_range = form.salary_range.trim().to_string();
        position.start_date = Some(self.start_date);
        position.posting_start_date = self.posting_start_date;
        position.posting_end_date = self.posting_end_date;
        position.status = form.status;
        position.description = form.description.clone();
        position.requirements = form.requirements.clone();
        if !form.stage_data.is_empty() {
            position.stages = form
                .stage_data
                .iter()
                .map(|draft| InterviewStage {
                    id: format!("{}-stage-{}", position.id, draft.stage_number),
                    stage_number: draft.stage_number,
                    stage_name: draft.stage_name.clone(),
                    interviewers: draft.interviewers.clone(),
                })
                .collect();
        }
        position.interview_stages = if position.stages.is_empty() {
            form.interview_stages
        } else {
            position.stages.len() as u32
        };
    }
}

fn validate_template(request: &CreateOfferTemplate) -> Result<(), BackendError> {
    if request.name.trim().is_empty() {
        return Err(BackendError::invalid("name", "This field may not be blank."));
    }
    if request.template_text.trim().is_empty() {
        return Err(BackendError::invalid(
            "template_text",
            "This field may not be blank.",
        ));
    }
    Ok(())
}

fn onboarding_error(error: OnboardingError) -> BackendError {
    match error {
        OnboardingError::Incomplete { .. } => BackendError::Rejected(error.to_string()),
        OnboardingError::UnknownSection(_) => {
            BackendError::invalid("section_index", error.to_string())
        }
    }
}

fn invalid_pk(field: &str, value: &str) -> BackendError {
    BackendError::invalid(
        field,
        format!("Invalid pk \"{value}\" - object does not exist."),
    )
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Mock meeting link: `https://zoom.us/j/` plus ten hex digits.
fn zoom_link(seed: &str, now: DateTime<Utc>) -> String {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    now.timestamp_nanos_opt().unwrap_or_default().hash(&mut hasher);
    format!("https://zoom.us/j/{:010x}", hasher.finish() & 0xff_ffff_ffff)
}

fn paginated<T>(results: Vec<T>) -> ListResponse<T> {
    ListResponse::Paginated(single_page(results))
}

impl HiringBackend for MemoryBackend {
    async fn list_applications(
        &self,
        position: Option<&str>,
    ) -> Result<ListResponse<Application>, ApiError> {
        Ok(paginated(self.applications(position)))
    }

    async fn get_application(&self, id: &str) -> Result<Application, ApiError> {
        Ok(self.application(id)?)
    }

    async fn advance_stage(&self, id: &str) -> Result<Application, ApiError> {
        Ok(MemoryBackend::advance_stage(self, id)?)
    }

    async fn reject_application(&self, id: &str) -> Result<Application, ApiError> {
        Ok(MemoryBackend::reject_application(self, id)?)
    }

    async fn demo_set_stage(
        &self,
        id: &str,
        stage: ApplicationStage,
    ) -> Result<Application, ApiError> {
        Ok(MemoryBackend::demo_set_stage(self, id, Some(stage.label()))?)
    }

    async fn list_positions(&self) -> Result<ListResponse<Position>, ApiError> {
        Ok(paginated(self.positions()))
    }

    async fn get_position(&self, id: &str) -> Result<Position, ApiError> {
        Ok(self.position(id)?)
    }

    async fn create_position(&self, form: &PositionForm) -> Result<Position, ApiError> {
        Ok(MemoryBackend::create_position(self, form)?)
    }

    async fn update_position(&self, id: &str, form: &PositionForm) -> Result<Position, ApiError> {
        Ok(MemoryBackend::update_position(self, id, form)?)
    }

    async fn delete_position(&self, id: &str) -> Result<(), ApiError> {
        Ok(MemoryBackend::delete_position(self, id)?)
    }

    async fn position_applicants(
        &self,
        id: &str,
        query: ApplicantQuery,
    ) -> Result<Vec<Application>, ApiError> {
        let certified = query.certified.map(|flag| flag.to_string());
        Ok(MemoryBackend::position_applicants(
            self,
            id,
            query.stage.map(ApplicationStage::label),
            certified.as_deref(),
        )?)
    }

    async fn position_stats(&self) -> Result<PositionStats, ApiError> {
        Ok(MemoryBackend::position_stats(self))
    }

    async fn list_interviews(&self) -> Result<ListResponse<Interview>, ApiError> {
        Ok(paginated(self.interviews()))
    }

    async fn upcoming_interviews(&self, days: i64) -> Result<Vec<Interview>, ApiError> {
        Ok(MemoryBackend::upcoming_interviews(self, days)?)
    }

    async fn interviews_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Interview>, ApiError> {
        Ok(self.interviews_between(start, end))
    }

    async fn schedule_interview(&self, request: &ScheduleInterview) -> Result<Interview, ApiError> {
        Ok(MemoryBackend::schedule_interview(self, request)?)
    }

    async fn complete_interview(
        &self,
        id: &str,
        request: &CompleteInterview,
    ) -> Result<Interview, ApiError> {
        Ok(MemoryBackend::complete_interview(self, id, request)?)
    }

    async fn update_interview(
        &self,
        id: &str,
        update: &InterviewUpdate,
    ) -> Result<Interview, ApiError> {
        Ok(MemoryBackend::update_interview(self, id, update)?)
    }

    async fn delete_interview(&self, id: &str) -> Result<(), ApiError> {
        Ok(MemoryBackend::delete_interview(self, id)?)
    }

    async fn interview_stats(&self) -> Result<InterviewStats, ApiError> {
        Ok(MemoryBackend::interview_stats(self))
    }

    async fn list_offers(&self) -> Result<ListResponse<Offer>, ApiError> {
        Ok(paginated(self.offers()))
    }

    async fn get_offer(&self, id: &str) -> Result<Offer, ApiError> {
        Ok(self.offer(id)?)
    }

    async fn create_offer(&self, request: &CreateOffer) -> Result<Offer, ApiError> {
        Ok(MemoryBackend::create_offer(self, request)?)
    }

    async fn update_offer(&self, id: &str, update: &OfferUpdate) -> Result<Offer, ApiError> {
        Ok(MemoryBackend::update_offer(self, id, update)?)
    }

    async fn delete_offer(&self, id: &str) -> Result<(), ApiError> {
        Ok(MemoryBackend::delete_offer(self, id)?)
    }

    async fn accept_offer(&self, id: &str) -> Result<Offer, ApiError> {
        Ok(MemoryBackend::accept_offer(self, id)?)
    }

    async fn decline_offer(&self, id: &str, request: &DeclineOffer) -> Result<Offer, ApiError> {
        Ok(MemoryBackend::decline_offer(self, id, request)?)
    }

    async fn expiring_offers(&self, days: i64) -> Result<Vec<Offer>, ApiError> {
        Ok(MemoryBackend::expiring_offers(self, days)?)
    }

    async fn offer_stats(&self) -> Result<OfferStats, ApiError> {
        Ok(MemoryBackend::offer_stats(self))
    }

    async fn list_offer_templates(&self) -> Result<ListResponse<OfferTemplate>, ApiError> {
        Ok(paginated(self.offer_templates()))
    }

    async fn get_offer_template(&self, id: &str) -> Result<OfferTemplate, ApiError> {
        Ok(self.offer_template(id)?)
    }

    async fn active_offer_template(&self) -> Result<OfferTemplate, ApiError> {
        Ok(MemoryBackend::active_offer_template(self)?)
    }

    async fn create_offer_template(
        &self,
        request: &CreateOfferTemplate,
    ) -> Result<OfferTemplate, ApiError> {
        Ok(MemoryBackend::create_offer_template(self, request)?)
    }

    async fn update_offer_template(
        &self,
        id: &str,
        request: &CreateOfferTemplate,
    ) -> Result<OfferTemplate, ApiError> {
        Ok(MemoryBackend::update_offer_template(self, id, request)?)
    }

    async fn delete_offer_template(&self, id: &str) -> Result<(), ApiError> {
        Ok(MemoryBackend::delete_offer_template(self, id)?)
    }

    async fn preview_offer_template(
        &self,
        id: &str,
        data: &BTreeMap<String, String>,
    ) -> Result<PreviewResponse, ApiError> {
        Ok(MemoryBackend::preview_offer_template(self, id, data)?)
    }

    async fn list_onboarding_candidates(
        &self,
    ) -> Result<ListResponse<OnboardingCandidate>, ApiError> {
        Ok(paginated(self.onboarding_candidates()))
    }

    async fn get_onboarding_candidate(&self, id: &str) -> Result<OnboardingCandidate, ApiError> {
        Ok(self.onboarding_candidate(id)?)
    }

    async fn create_onboarding_candidate(
        &self,
        request: &CreateOnboardingCandidate,
    ) -> Result<OnboardingCandidate, ApiError> {
        Ok(MemoryBackend::create_onboarding_candidate(self, request)?)
    }

    async fn update_onboarding_section(
        &self,
        id: &str,
        update: &SectionUpdate,
    ) -> Result<SectionSaved, ApiError> {
        Ok(MemoryBackend::update_onboarding_section(self, id, update)?)
    }

    async fn submit_onboarding(&self, id: &str) -> Result<OnboardingSubmitted, ApiError> {
        Ok(MemoryBackend::submit_onboarding(self, id)?)
    }

    async fn delete_onboarding_candidate(&self, id: &str) -> Result<(), ApiError> {
        Ok(MemoryBackend::delete_onboarding_candidate(self, id)?)
    }

    async fn onboarding_stats(&self) -> Result<OnboardingStats, ApiError> {
        Ok(MemoryBackend::onboarding_stats(self))
    }

    async fn list_users(&self) -> Result<UserDirectory, ApiError> {
        Ok(self.users())
    }
}
