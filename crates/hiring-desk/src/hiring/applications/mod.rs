//! Job applications: wire records, the flattened applicant row, stage gating and list filters.

pub mod domain;
pub mod filters;
pub mod stage;

pub use domain::{
    Applicant, Application, ApplicationStage, InterviewAvailability, Pagination, Reference,
};
pub use filters::{
    filter_by_certification, filter_by_position, filter_by_stage, search_applications,
    stage_count, total_count, unique_position_req_ids, ApplicantFilter, CertificationFilter,
    StageFilter,
};
pub use stage::{
    can_advance_stage, can_schedule_interview, can_send_offer, next_stage, stage_action,
    InterviewProgress, StageAction, StageActionKind,
};
