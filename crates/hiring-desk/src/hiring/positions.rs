use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{position_schema, validate_form, ValidationErrors};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionStatus {
    #[default]
    Draft,
    Open,
    Closed,
}

impl PositionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Open => "Open",
            Self::Closed => "Closed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for PositionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interviewer {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: String,
}

/// One configured round of interviews for a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewStage {
    pub id: String,
    pub stage_number: u32,
    pub stage_name: String,
    #[serde(default)]
    pub interviewers: Vec<Interviewer>,
}

/// Job requisition as returned by `/hiring/positions/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub id: String,
    pub req_id: String,
    pub title: String,
    pub department: String,
    pub worksite: String,
    #[serde(default)]
    pub primary_job_title: String,
    #[serde(deserialize_with = "crate::hiring::decimal::deserialize")]
    pub fte: f64,
    pub salary_range: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub posting_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub posting_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: PositionStatus,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub applicant_count: u32,
    #[serde(default)]
    pub interview_count: u32,
    #[serde(default)]
    pub stages: Vec<InterviewStage>,
    /// Declared stage count; the configured `stages` win when present.
    #[serde(default)]
    pub interview_stages: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Position {
    pub fn interview_stage_count(&self) -> u32 {
        if self.stages.is_empty() {
            self.interview_stages
        } else {
            self.stages.len() as u32
        }
    }

    pub fn stage(&self, stage_number: u32) -> Option<&InterviewStage> {
        self.stages
            .iter()
            .find(|stage| stage.stage_number == stage_number)
    }

    /// Open and, when posting dates are set, inside the posting window.
    pub fn is_accepting_applications(&self, today: NaiveDate) -> bool {
        self.status == PositionStatus::Open
            && self.posting_start_date.map_or(true, |start| start <= today)
            && self.posting_end_date.map_or(true, |end| end >= today)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewStageDraft {
    pub stage_number: u32,
    pub stage_name: String,
    #[serde(default)]
    pub interviewers: Vec<Interviewer>,
}

/// Create/update payload for a position. Values stay as entered until validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionForm {
    pub title: String,
    pub department: String,
    pub worksite: String,
    pub primary_job_title: String,
    pub req_id: String,
    pub fte: String,
    pub salary_range: String,
    pub start_date: String,
    #[serde(default)]
    pub probation_date: String,
    #[serde(default)]
    pub status: PositionStatus,
    pub employee_category: String,
    pub eeoc_classification: String,
    pub workers_comp_classification: String,
    pub leave_plan: String,
    pub deduction_template: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub posting_start_date: String,
    #[serde(default)]
    pub posting_end_date: String,
    #[serde(default)]
    pub interview_stages: u32,
    #[serde(default)]
    pub stage_data: Vec<InterviewStageDraft>,
}

impl PositionForm {
    fn field_map(&self) -> BTreeMap<String, String> {
        [
            ("title", &self.title),
            ("department", &self.department),
            ("worksite", &self.worksite),
            ("primary_job_title", &self.primary_job_title),
            ("req_id", &self.req_id),
            ("fte", &self.fte),
            ("salary_range", &self.salary_range),
            ("start_date", &self.start_date),
            ("employee_category", &self.employee_category),
            ("eeoc_classification", &self.eeoc_classification),
            ("workers_comp_classification", &self.workers_comp_classification),
            ("leave_plan", &self.leave_plan),
            ("deduction_template", &self.deduction_template),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.trim().to_string()))
        .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let schema = position_schema().map_err(|err| {
            ValidationErrors::from([("req_id".to_string(), format!("invalid rule: {err}"))])
        })?;
        validate_form(&self.field_map(), &schema)
    }
}

/// Pipeline counters served by `/hiring/positions/stats/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionStats {
    pub total_positions: usize,
    pub open_positions: usize,
    pub draft_positions: usize,
    pub closed_positions: usize,
    pub total_applications: usize,
    pub applications_this_month: usize,
    pub pending_offers: usize,
    pub accepted_offers: usize,
}

/// Headline numbers for the positions overview, over the rows left after the worksite filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PositionMetrics {
    pub open_positions: usize,
    pub total_applicants: u32,
    pub interviews_scheduled: u32,
}

pub fn position_metrics<'a, I>(positions: I) -> PositionMetrics
where
    I: IntoIterator<Item = &'a Position>,
{
    positions
        .into_iter()
        .fold(PositionMetrics::default(), |mut metrics, position| {
            if position.status == PositionStatus::Open {
                metrics.open_positions += 1;
            }
            metrics.total_applicants += position.applicant_count;
            metrics.interviews_scheduled += position.interview_count;
            metrics
        })
}

/// `None` keeps every worksite.
pub fn filter_by_worksite<'a>(
    positions: &'a [Position],
    worksite: Option<&str>,
) -> Vec<&'a Position> {
    positions
        .iter()
        .filter(|position| worksite.map_or(true, |site| position.worksite == site))
        .collect()
}

pub fn unique_worksites(positions: &[Position]) -> Vec<String> {
    positions
        .iter()
        .map(|position| position.worksite.clone())
        .filter(|site| !site.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn find_by_req_id<'a>(positions: &'a [Position], req_id: &str) -> Option<&'a Position> {
    positions.iter().find(|position| position.req_id == req_id)
}
