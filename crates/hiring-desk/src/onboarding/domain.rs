use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SECTION_COUNT: u32 = 8;

/// Fixed onboarding form sections, in the order candidates complete them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingSection {
    PersonalInfo,
    EmploymentDetails,
    I9Form,
    TaxWithholdings,
    PaymentMethod,
    TimeOff,
    Deductions,
    EmergencyContact,
}

impl OnboardingSection {
    pub const fn all() -> [Self; 8] {
        [
            Self::PersonalInfo,
            Self::EmploymentDetails,
            Self::I9Form,
            Self::TaxWithholdings,
            Self::PaymentMethod,
            Self::TimeOff,
            Self::Deductions,
            Self::EmergencyContact,
        ]
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::all().get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::PersonalInfo => "personal_info",
            Self::EmploymentDetails => "employment_details",
            Self::I9Form => "i9_form",
            Self::TaxWithholdings => "tax_withholdings",
            Self::PaymentMethod => "payment_method",
            Self::TimeOff => "time_off",
            Self::Deductions => "deductions",
            Self::EmergencyContact => "emergency_contact",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::PersonalInfo => "Personal Information",
            Self::EmploymentDetails => "Employment Details",
            Self::I9Form => "I-9 Form",
            Self::TaxWithholdings => "Tax Withholdings",
            Self::PaymentMethod => "Payment Method",
            Self::TimeOff => "Time Off",
            Self::Deductions => "Deductions",
            Self::EmergencyContact => "Emergency Contact",
        }
    }

    /// Accepts the wire key or the zero-based index.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(index) = raw.parse::<usize>() {
            return Self::from_index(index);
        }
        Self::all()
            .into_iter()
            .find(|section| section.key().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for OnboardingSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Submitted,
}

impl OnboardingStatus {
    /// Status implied by the completion counter and submission timestamp.
    pub fn derive(completed_sections: u32, submitted: bool) -> Self {
        if completed_sections >= SECTION_COUNT && submitted {
            Self::Submitted
        } else if completed_sections >= SECTION_COUNT {
            Self::Completed
        } else if completed_sections > 0 {
            Self::InProgress
        } else {
            Self::NotStarted
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Submitted => "Submitted",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace(' ', "_").as_str() {
            "not_started" => Some(Self::NotStarted),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "submitted" => Some(Self::Submitted),
            _ => None,
        }
    }
}

impl fmt::Display for OnboardingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionProgress {
    pub section: OnboardingSection,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reviewed_by_admin: bool,
    #[serde(default)]
    pub form_data: Value,
}

/// New hire working through the onboarding forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingCandidate {
    pub id: String,
    pub name: String,
    pub email: String,
    pub position: String,
    pub offer_date: NaiveDate,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: OnboardingStatus,
    #[serde(default)]
    pub completed_sections: u32,
    #[serde(default)]
    pub sections: Vec<SectionProgress>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub job_application: Option<String>,
    #[serde(default)]
    pub admin_notes: String,
}

impl OnboardingCandidate {
    pub fn new(id: impl Into<String>, request: CreateOnboardingCandidate) -> Self {
        Self {
            id: id.into(),
            name: request.name,
            email: request.email,
            position: request.position,
            offer_date: request.offer_date,
            start_date: request.start_date,
            status: OnboardingStatus::NotStarted,
            completed_sections: 0,
            sections: Vec::new(),
            last_updated: None,
            submitted_at: None,
            job_application: request.job_application,
            admin_notes: String::new(),
        }
    }

    pub fn progress_percentage(&self) -> u32 {
        self.completed_sections.min(SECTION_COUNT) * 100 / SECTION_COUNT
    }

    pub fn is_section_completed(&self, section: OnboardingSection) -> bool {
        self.sections
            .iter()
            .any(|progress| progress.section == section && progress.is_completed)
    }

    /// Stores the section payload, recounts completed sections and re-derives the status.
    pub fn record_section(
        &mut self,
        update: SectionUpdate,
        now: DateTime<Utc>,
    ) -> Result<&SectionProgress, OnboardingError> {
        let section = OnboardingSection::from_index(update.section_index)
            .ok_or(OnboardingError::UnknownSection(update.section_index))?;

        let position = match self.sections.iter().position(|p| p.section == section) {
            Some(position) => position,
            None => {
                self.sections.push(SectionProgress {
                    section,
                    is_completed: false,
                    completed_at: None,
                    reviewed_by_admin: false,
                    form_data: Value::Null,
                });
                self.sections.len() - 1
            }
        };

        let progress = &mut self.sections[position];
        progress.form_data = update.form_data;
        progress.is_completed = update.is_completed;
        if update.is_completed && progress.completed_at.is_none() {
            progress.completed_at = Some(now);
        }
        self.sections.sort_by_key(|progress| progress.section);

        self.completed_sections = self
            .sections
            .iter()
            .filter(|progress| progress.is_completed)
            .count() as u32;
        self.last_updated = Some(now);
        self.refresh_status();

        self.sections
            .iter()
            .find(|progress| progress.section == section)
            .ok_or(OnboardingError::UnknownSection(update.section_index))
    }

    /// Rejected until every section is complete.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<(), OnboardingError> {
        if self.completed_sections < SECTION_COUNT {
            return Err(OnboardingError::Incomplete {
                completed: self.completed_sections,
            });
        }
        self.submitted_at = Some(now);
        self.last_updated = Some(now);
        self.refresh_status();
        Ok(())
    }

    fn refresh_status(&mut self) {
        self.status =
            OnboardingStatus::derive(self.completed_sections, self.submitted_at.is_some());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOnboardingCandidate {
    pub name: String,
    pub email: String,
    pub position: String,
    pub offer_date: NaiveDate,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub job_application: Option<String>,
}

/// Body of `candidates/{id}/update_section/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionUpdate {
    pub section_index: usize,
    #[serde(default)]
    pub form_data: Value,
    #[serde(default)]
    pub is_completed: bool,
}

/// Response of `update_section/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSaved {
    pub section: SectionProgress,
    pub candidate: OnboardingCandidate,
}

/// Response of `submit/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingSubmitted {
    pub message: String,
    pub candidate: OnboardingCandidate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OnboardingStats {
    pub total_candidates: usize,
    pub not_started: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub submitted: usize,
    /// Submitted share of all candidates, in percent.
    pub completion_rate: f64,
}

impl OnboardingStats {
    pub fn from_candidates(candidates: &[OnboardingCandidate]) -> Self {
        let count = |status: OnboardingStatus| {
            candidates
                .iter()
                .filter(|candidate| candidate.status == status)
                .count()
        };
        let total = candidates.len();
        let submitted = count(OnboardingStatus::Submitted);
        Self {
            total_candidates: total,
            not_started: count(OnboardingStatus::NotStarted),
            in_progress: count(OnboardingStatus::InProgress),
            completed: count(OnboardingStatus::Completed),
            submitted,
            completion_rate: if total > 0 {
                submitted as f64 / total as f64 * 100.0
            } else {
                0.0
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OnboardingError {
    #[error("All sections must be completed before submission.")]
    Incomplete { completed: u32 },
    #[error("section index {0} is out of range")]
    UnknownSection(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn candidate() -> OnboardingCandidate {
        OnboardingCandidate::new(
            "c-1",
            CreateOnboardingCandidate {
                name: "Maria Lopez".to_string(),
                email: "maria.lopez@example.org".to_string(),
                position: "High School Chemistry Teacher".to_string(),
                offer_date: NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid"),
                start_date: None,
                job_application: Some("app-1".to_string()),
            },
        )
    }

    fn complete(candidate: &mut OnboardingCandidate, index: usize) {
        candidate
            .record_section(
                SectionUpdate {
                    section_index: index,
                    form_data: json!({"ok": true}),
                    is_completed: true,
                },
                now(),
            )
            .expect("section recorded");
    }

    #[test]
    fn status_derivation_follows_counter_and_submission() {
        assert_eq!(OnboardingStatus::derive(0, false), OnboardingStatus::NotStarted);
        assert_eq!(OnboardingStatus::derive(3, false), OnboardingStatus::InProgress);
        assert_eq!(OnboardingStatus::derive(8, false), OnboardingStatus::Completed);
        assert_eq!(OnboardingStatus::derive(8, true), OnboardingStatus::Submitted);
        assert_eq!(OnboardingStatus::derive(7, true), OnboardingStatus::InProgress);
    }

    #[test]
    fn sections_round_trip_keys_and_indices() {
        for (index, section) in OnboardingSection::all().into_iter().enumerate() {
            assert_eq!(section.index(), index);
            assert_eq!(OnboardingSection::parse(section.key()), Some(section));
        }
        assert_eq!(OnboardingSection::parse("2"), Some(OnboardingSection::I9Form));
        assert_eq!(OnboardingSection::from_index(8), None);
    }

    #[test]
    fn recording_sections_updates_progress() {
        let mut candidate = candidate();
        complete(&mut candidate, 0);
        complete(&mut candidate, 0);
        complete(&mut candidate, 4);
        assert_eq!(candidate.completed_sections, 2);
        assert_eq!(candidate.status, OnboardingStatus::InProgress);
        assert_eq!(candidate.progress_percentage(), 25);
        assert!(candidate.is_section_completed(OnboardingSection::PaymentMethod));

        candidate
            .record_section(
                SectionUpdate {
                    section_index: 4,
                    form_data: Value::Null,
                    is_completed: false,
                },
                now(),
            )
            .expect("section recorded");
        assert_eq!(candidate.completed_sections, 1);
    }

    #[test]
    fn submission_requires_all_sections() {
        let mut candidate = candidate();
        for index in 0..7 {
            complete(&mut candidate, index);
        }
        let err = candidate.submit(now()).expect_err("incomplete");
        assert_eq!(
            err.to_string(),
            "All sections must be completed before submission."
        );

        complete(&mut candidate, 7);
        assert_eq!(candidate.status, OnboardingStatus::Completed);
        candidate.submit(now()).expect("submits");
        assert_eq!(candidate.status, OnboardingStatus::Submitted);
        assert_eq!(candidate.progress_percentage(), 100);
    }

    #[test]
    fn unknown_section_index_is_rejected() {
        let mut candidate = candidate();
        let err = candidate
            .record_section(
                SectionUpdate {
                    section_index: 9,
                    form_data: Value::Null,
                    is_completed: true,
                },
                now(),
            )
            .expect_err("out of range");
        assert_eq!(err, OnboardingError::UnknownSection(9));
    }

    #[test]
    fn stats_report_completion_rate() {
        let mut done = candidate();
        for index in 0..8 {
            complete(&mut done, index);
        }
        done.submit(now()).expect("submits");
        let stats = OnboardingStats::from_candidates(&[done, candidate()]);
        assert_eq!(stats.total_candidates, 2);
        assert_eq!(stats.submitted, 1);
        assert_eq!(stats.not_started, 1);
        assert_eq!(stats.completion_rate, 50.0);
    }
}
