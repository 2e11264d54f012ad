//! Post-offer onboarding: the eight form sections, candidate progress and the admin dashboard
//! filter.

pub mod dashboard;
pub mod domain;
pub mod sections;

pub use dashboard::CandidateFilter;
pub use domain::{
    CreateOnboardingCandidate, OnboardingCandidate, OnboardingError, OnboardingSection,
    OnboardingStats, OnboardingStatus, OnboardingSubmitted, SectionProgress, SectionSaved,
    SectionUpdate, SECTION_COUNT,
};
pub use sections::{SectionForm, SectionFormError};
