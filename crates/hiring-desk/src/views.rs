//! Read-only view models assembled from store contents, ready for the CLI renderers.

use serde::Serialize;

use crate::hiring::applications::{
    can_advance_stage, can_schedule_interview, can_send_offer, stage_action,
    unique_position_req_ids, Applicant, ApplicantFilter, ApplicationStage, StageAction,
};
use crate::hiring::positions::{
    filter_by_worksite, position_metrics, unique_worksites, Position, PositionMetrics,
};
use crate::onboarding::{CandidateFilter, OnboardingCandidate, OnboardingStats, OnboardingStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeVariant {
    Gray,
    Yellow,
    Blue,
    Green,
}

pub const fn stage_badge(stage: ApplicationStage) -> BadgeVariant {
    match stage {
        ApplicationStage::Screening => BadgeVariant::Yellow,
        ApplicationStage::Interview | ApplicationStage::ReferenceCheck => BadgeVariant::Blue,
        ApplicationStage::Offer => BadgeVariant::Green,
        _ => BadgeVariant::Gray,
    }
}

/// One applicant line with the actions its stage allows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicantRowView {
    pub applicant: Applicant,
    pub stage_badge: BadgeVariant,
    pub certification_label: &'static str,
    /// `"Interviews: {completed}/{total}"`.
    pub interview_progress: String,
    pub can_send_offer: bool,
    pub can_schedule_interview: bool,
    pub can_advance: bool,
    pub action: StageAction,
}

impl ApplicantRowView {
    pub fn new(applicant: &Applicant) -> Self {
        Self {
            stage_badge: stage_badge(applicant.stage),
            certification_label: if applicant.certified {
                "Certified"
            } else {
                "Pending License"
            },
            interview_progress: format!(
                "Interviews: {}/{}",
                applicant.completed_interview_stages, applicant.total_interview_stages
            ),
            can_send_offer: can_send_offer(applicant),
            can_schedule_interview: can_schedule_interview(applicant),
            can_advance: can_advance_stage(applicant),
            action: stage_action(applicant.stage),
            applicant: applicant.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicantsPage {
    pub rows: Vec<ApplicantRowView>,
    pub shown: usize,
    pub total: usize,
    pub req_ids: Vec<String>,
    pub summary: String,
}

impl ApplicantsPage {
    /// `position_req_id` prefixes the summary when the list was opened from a position.
    pub fn build(
        applicants: &[Applicant],
        filter: &ApplicantFilter,
        position_req_id: Option<&str>,
    ) -> Self {
        let rows: Vec<ApplicantRowView> = filter
            .apply(applicants)
            .into_iter()
            .map(ApplicantRowView::new)
            .collect();
        let shown = rows.len();
        let total = applicants.len();
        let prefix = position_req_id
            .map(|req_id| format!("{req_id} • "))
            .unwrap_or_default();
        Self {
            summary: format!("{prefix}{shown} of {total} applications"),
            rows,
            shown,
            total,
            req_ids: unique_position_req_ids(applicants),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionsOverview {
    pub positions: Vec<Position>,
    pub metrics: PositionMetrics,
    pub worksites: Vec<String>,
    pub worksite: Option<String>,
}

impl PositionsOverview {
    pub fn build(positions: &[Position], worksite: Option<&str>) -> Self {
        let visible = filter_by_worksite(positions, worksite);
        Self {
            metrics: position_metrics(visible.iter().copied()),
            positions: visible.into_iter().cloned().collect(),
            worksites: unique_worksites(positions),
            worksite: worksite.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateRowView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub position: String,
    pub status: OnboardingStatus,
    pub completed_sections: u32,
    pub progress_percentage: u32,
}

impl From<&OnboardingCandidate> for CandidateRowView {
    fn from(candidate: &OnboardingCandidate) -> Self {
        Self {
            id: candidate.id.clone(),
            name: candidate.name.clone(),
            email: candidate.email.clone(),
            position: candidate.position.clone(),
            status: candidate.status,
            completed_sections: candidate.completed_sections,
            progress_percentage: candidate.progress_percentage(),
        }
    }
}

/// Admin view: totals over every candidate, rows over the filtered ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OnboardingDashboard {
    pub totals: OnboardingStats,
    pub rows: Vec<CandidateRowView>,
}

impl OnboardingDashboard {
    pub fn build(candidates: &[OnboardingCandidate], filter: &CandidateFilter) -> Self {
        Self {
            totals: OnboardingStats::from_candidates(candidates),
            rows: filter
                .apply(candidates)
                .into_iter()
                .map(CandidateRowView::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::hiring::applications::{CertificationFilter, StageFilter};
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 10).expect("valid date")
    }

    fn applicants() -> Vec<Applicant> {
        let seed = fixtures::seed(today());
        seed.applications
            .iter()
            .map(|application| {
                let applicant = Applicant::from_application(application);
                match seed.positions.iter().find(|p| p.id == application.position) {
                    Some(position) => applicant.with_position(position),
                    None => applicant,
                }
            })
            .collect()
    }

    #[test]
    fn rows_gate_offers_on_completed_interviews() {
        let rows: Vec<ApplicantRowView> = applicants().iter().map(ApplicantRowView::new).collect();
        let sarah = rows
            .iter()
            .find(|row| row.applicant.name == "Sarah Johnson")
            .expect("seeded");
        assert!(sarah.can_schedule_interview);
        assert!(!sarah.can_send_offer);
        assert_eq!(sarah.interview_progress, "Interviews: 2/3");
        assert_eq!(sarah.stage_badge, BadgeVariant::Blue);

        let robert = rows
            .iter()
            .find(|row| row.applicant.name == "Robert Thompson")
            .expect("seeded");
        assert!(robert.can_send_offer);
        assert!(robert.can_advance);
    }

    #[test]
    fn page_summary_counts_filtered_rows() {
        let applicants = applicants();
        let filter = ApplicantFilter {
            stage: StageFilter::Only(ApplicationStage::Interview),
            certification: CertificationFilter::Certified,
            ..ApplicantFilter::default()
        };
        let page = ApplicantsPage::build(&applicants, &filter, None);
        assert_eq!(page.summary, "3 of 8 applications");
        assert_eq!(page.req_ids.len(), 3);

        let scoped = ApplicantsPage::build(
            &applicants,
            &ApplicantFilter::default(),
            Some("REQ-2025-0193"),
        );
        assert_eq!(scoped.summary, "REQ-2025-0193 • 8 of 8 applications");
    }

    #[test]
    fn overview_metrics_follow_the_worksite() {
        let positions = fixtures::seed(today()).positions;
        let all = PositionsOverview::build(&positions, None);
        assert_eq!(all.metrics.open_positions, 3);
        assert_eq!(all.worksites.len(), 3);

        let middle = PositionsOverview::build(&positions, Some("Washington Middle School"));
        assert_eq!(middle.positions.len(), 2);
        assert_eq!(middle.metrics.open_positions, 1);
    }

    #[test]
    fn dashboard_totals_ignore_the_filter() {
        let candidates = fixtures::seed(today()).onboarding_candidates;
        let filter = CandidateFilter {
            search: "counselor".to_string(),
            status: None,
        };
        let dashboard = OnboardingDashboard::build(&candidates, &filter);
        assert_eq!(dashboard.totals.total_candidates, 3);
        assert_eq!(dashboard.rows.len(), 1);
        assert_eq!(dashboard.rows[0].name, "Marcus Bell");
        assert_eq!(dashboard.rows[0].progress_percentage, 37);
    }
}
