use serde::Serialize;

use super::domain::{Applicant, Application, ApplicationStage};

/// Read access to the interview counters the gating rules depend on.
pub trait InterviewProgress {
    fn stage(&self) -> ApplicationStage;
    fn completed_interview_stages(&self) -> u32;
    fn total_interview_stages(&self) -> u32;
}

impl InterviewProgress for Application {
    fn stage(&self) -> ApplicationStage {
        self.stage
    }

    fn completed_interview_stages(&self) -> u32 {
        self.completed_interview_stages
    }

    fn total_interview_stages(&self) -> u32 {
        self.total_interview_stages
    }
}

impl InterviewProgress for Applicant {
    fn stage(&self) -> ApplicationStage {
        self.stage
    }

    fn completed_interview_stages(&self) -> u32 {
        self.completed_interview_stages
    }

    fn total_interview_stages(&self) -> u32 {
        self.total_interview_stages
    }
}

/// Offer-eligible once every configured interview stage is complete.
pub fn can_send_offer<P: InterviewProgress + ?Sized>(applicant: &P) -> bool {
    let total = applicant.total_interview_stages();
    total > 0 && applicant.completed_interview_stages() >= total
}

/// Interview-eligible while configured stages remain.
pub fn can_schedule_interview<P: InterviewProgress + ?Sized>(applicant: &P) -> bool {
    let total = applicant.total_interview_stages();
    total > 0 && applicant.completed_interview_stages() < total
}

/// Client-side gate only: `Onboarding` still reports true even though `next_stage` is `None`;
/// the server refuses that advance with "Application is already at final stage".
pub fn can_advance_stage<P: InterviewProgress + ?Sized>(applicant: &P) -> bool {
    match applicant.stage() {
        ApplicationStage::OfferAccepted | ApplicationStage::Rejected => false,
        ApplicationStage::Interview => can_send_offer(applicant),
        _ => true,
    }
}

pub fn next_stage(current: ApplicationStage) -> Option<ApplicationStage> {
    let order = ApplicationStage::ordered();
    let index = order.iter().position(|stage| *stage == current)?;
    order.get(index + 1).copied()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageActionKind {
    Accept,
    Screen,
    ScheduleInterview,
    ReferenceCheck,
    SendOffer,
    SendOnboarding,
    None,
}

/// Button shown next to an applicant for their current stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageAction {
    pub stage: ApplicationStage,
    pub label: &'static str,
    pub action: StageActionKind,
    pub next_stage: Option<ApplicationStage>,
}

pub const fn stage_action(stage: ApplicationStage) -> StageAction {
    use ApplicationStage as S;
    let (label, action, next_stage) = match stage {
        S::ApplicationReview => ("Accept Application", StageActionKind::Accept, Some(S::Screening)),
        S::Screening => ("Screen Applicant", StageActionKind::Screen, Some(S::Interview)),
        S::Interview => (
            "Schedule Interview",
            StageActionKind::ScheduleInterview,
            Some(S::Offer),
        ),
        S::ReferenceCheck => (
            "Reference Check",
            StageActionKind::ReferenceCheck,
            Some(S::Offer),
        ),
        S::Offer => ("Send Offer", StageActionKind::SendOffer, Some(S::OfferAccepted)),
        S::OfferAccepted => ("Send Onboarding", StageActionKind::SendOnboarding, None),
        S::Onboarding => ("Onboarding", StageActionKind::None, None),
        S::Rejected => ("Rejected", StageActionKind::None, None),
    };
    StageAction {
        stage,
        label,
        action,
        next_stage,
    }
}
