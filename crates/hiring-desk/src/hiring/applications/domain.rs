use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::hiring::positions::Position;

/// Discrete step in an applicant's pipeline. Serialized as the display label the backend uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ApplicationStage {
    #[serde(rename = "Application Review")]
    ApplicationReview,
    #[serde(rename = "Screening")]
    Screening,
    #[serde(rename = "Interview")]
    Interview,
    #[serde(rename = "Reference Check")]
    ReferenceCheck,
    #[serde(rename = "Offer")]
    Offer,
    #[serde(rename = "Offer Accepted")]
    OfferAccepted,
    #[serde(rename = "Onboarding")]
    Onboarding,
    #[serde(rename = "Rejected")]
    Rejected,
}

impl ApplicationStage {
    /// Pipeline order. `Rejected` sits outside the pipeline.
    pub const fn ordered() -> [Self; 7] {
        [
            Self::ApplicationReview,
            Self::Screening,
            Self::Interview,
            Self::ReferenceCheck,
            Self::Offer,
            Self::OfferAccepted,
            Self::Onboarding,
        ]
    }

    pub const fn all() -> [Self; 8] {
        [
            Self::ApplicationReview,
            Self::Screening,
            Self::Interview,
            Self::ReferenceCheck,
            Self::Offer,
            Self::OfferAccepted,
            Self::Onboarding,
            Self::Rejected,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ApplicationReview => "Application Review",
            Self::Screening => "Screening",
            Self::Interview => "Interview",
            Self::ReferenceCheck => "Reference Check",
            Self::Offer => "Offer",
            Self::OfferAccepted => "Offer Accepted",
            Self::Onboarding => "Onboarding",
            Self::Rejected => "Rejected",
        }
    }

    /// Accepts the display label, case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        let needle = raw.trim();
        Self::all()
            .into_iter()
            .find(|stage| stage.label().eq_ignore_ascii_case(needle))
    }
}

impl Default for ApplicationStage {
    fn default() -> Self {
        Self::ApplicationReview
    }
}

impl fmt::Display for ApplicationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub relationship: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewAvailability {
    #[serde(default)]
    pub id: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub time_slots: Vec<String>,
}

/// Job application as returned by `/hiring/applications/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    /// Identifier of the position applied for.
    pub position: String,
    pub applicant_name: String,
    pub applicant_email: String,
    #[serde(default)]
    pub applicant_phone: Option<String>,
    #[serde(default)]
    pub start_date_availability: Option<NaiveDate>,
    #[serde(default)]
    pub screening_answers: BTreeMap<String, String>,
    #[serde(default)]
    pub resume: Option<String>,
    #[serde(default)]
    pub cover_letter: Option<String>,
    #[serde(default)]
    pub stage: ApplicationStage,
    #[serde(default)]
    pub current_role: Option<String>,
    #[serde(default)]
    pub years_experience: u32,
    #[serde(default)]
    pub certified: bool,
    #[serde(default)]
    pub internal: bool,
    #[serde(default)]
    pub current_interview_stage: u32,
    #[serde(default)]
    pub completed_interview_stages: u32,
    #[serde(default)]
    pub total_interview_stages: u32,
    #[serde(default)]
    pub position_title: Option<String>,
    #[serde(default)]
    pub position_req_id: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub references: Vec<Reference>,
    #[serde(default)]
    pub interview_availability: Vec<InterviewAvailability>,
}

/// Flattened applicant row used by list views and offer modals.
///
/// Every optional application field collapses to an empty default so views never branch on
/// presence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Applicant {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub current_role: String,
    pub experience: u32,
    pub certified: bool,
    pub internal: bool,
    pub stage: ApplicationStage,
    pub applied_date: Option<DateTime<Utc>>,
    pub position_id: String,
    pub position_title: String,
    pub position_req_id: String,
    pub current_interview_stage: u32,
    pub completed_interview_stages: u32,
    pub total_interview_stages: u32,
    pub department: String,
    pub worksite: String,
    pub salary: String,
    pub fte: String,
    pub start_date: String,
}

impl Applicant {
    pub fn from_application(application: &Application) -> Self {
        Self {
            id: application.id.clone(),
            name: application.applicant_name.clone(),
            email: application.applicant_email.clone(),
            phone: application.applicant_phone.clone().unwrap_or_default(),
            current_role: application.current_role.clone().unwrap_or_default(),
            experience: application.years_experience,
            certified: application.certified,
            internal: application.internal,
            stage: application.stage,
            applied_date: application.submitted_at,
            position_id: application.position.clone(),
            position_title: application.position_title.clone().unwrap_or_default(),
            position_req_id: application.position_req_id.clone().unwrap_or_default(),
            current_interview_stage: application.current_interview_stage,
            completed_interview_stages: application.completed_interview_stages,
            total_interview_stages: application.total_interview_stages,
            department: String::new(),
            worksite: String::new(),
            salary: String::new(),
            fte: String::new(),
            start_date: String::new(),
        }
    }

    /// Fills the position-derived columns that the application payload does not carry.
    pub fn with_position(mut self, position: &Position) -> Self {
        self.department = position.department.clone();
        self.worksite = position.worksite.clone();
        self.salary = position.salary_range.clone();
        self.fte = format!("{}", position.fte);
        self.start_date = position
            .start_date
            .map(|date| date.to_string())
            .unwrap_or_default();
        if self.position_title.is_empty() {
            self.position_title = position.title.clone();
        }
        if self.position_req_id.is_empty() {
            self.position_req_id = position.req_id.clone();
        }
        if self.total_interview_stages == 0 {
            self.total_interview_stages = position.interview_stage_count();
        }
        self
    }
}

impl From<&Application> for Applicant {
    fn from(application: &Application) -> Self {
        Self::from_application(application)
    }
}

/// Pagination envelope returned by list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
}
