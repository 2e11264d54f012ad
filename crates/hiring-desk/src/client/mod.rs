//! Typed access to the hiring REST API.
//!
//! [`HiringBackend`] names every call the stores make. [`HttpBackend`] speaks to a remote
//! server; `crate::backend::MemoryBackend` answers in-process with the same rules.

mod error;
mod http;

use std::collections::BTreeMap;
use std::future::Future;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::hiring::applications::{Application, ApplicationStage, Pagination};
use crate::hiring::interviews::{
    CompleteInterview, Interview, InterviewStats, InterviewUpdate, ScheduleInterview,
};
use crate::hiring::offers::{
    CreateOffer, CreateOfferTemplate, DeclineOffer, Offer, OfferStats, OfferTemplate, OfferUpdate,
    PreviewResponse,
};
use crate::hiring::positions::{Position, PositionForm, PositionStats};
use crate::hiring::users::UserDirectory;
use crate::onboarding::{
    CreateOnboardingCandidate, OnboardingCandidate, OnboardingStats, OnboardingSubmitted,
    SectionSaved, SectionUpdate,
};

pub use error::{response_message, ApiError};
pub use http::HttpBackend;

/// Default look-ahead of `offers/expiring_soon/`.
pub const DEFAULT_EXPIRING_DAYS: i64 = 7;
/// Default look-ahead of `interviews/upcoming/`.
pub const DEFAULT_UPCOMING_DAYS: i64 = 30;

/// List endpoints answer either with a bare array or with a paginated envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Paginated(Page<T>),
    Items(Vec<T>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: usize,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn into_parts(self) -> (Vec<T>, Option<Pagination>) {
        match self {
            Self::Items(items) => (items, None),
            Self::Paginated(page) => (
                page.results,
                Some(Pagination {
                    count: page.count,
                    next: page.next,
                    previous: page.previous,
                }),
            ),
        }
    }

    pub fn into_items(self) -> Vec<T> {
        self.into_parts().0
    }
}

/// Query of `positions/{id}/applicants/`. `None` leaves a dimension unfiltered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<ApplicationStage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certified: Option<bool>,
}

/// Every backend call used by the stores and the CLI.
pub trait HiringBackend: Send + Sync {
    fn list_applications(
        &self,
        position: Option<&str>,
    ) -> impl Future<Output = Result<ListResponse<Application>, ApiError>> + Send;
    fn get_application(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Application, ApiError>> + Send;
    fn advance_stage(&self, id: &str)
        -> impl Future<Output = Result<Application, ApiError>> + Send;
    fn reject_application(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Application, ApiError>> + Send;
    /// Development shortcut that jumps an application to an arbitrary stage.
    fn demo_set_stage(
        &self,
        id: &str,
        stage: ApplicationStage,
    ) -> impl Future<Output = Result<Application, ApiError>> + Send;

    fn list_positions(
        &self,
    ) -> impl Future<Output = Result<ListResponse<Position>, ApiError>> + Send;
    fn get_position(&self, id: &str) -> impl Future<Output = Result<Position, ApiError>> + Send;
    fn create_position(
        &self,
        form: &PositionForm,
    ) -> impl Future<Output = Result<Position, ApiError>> + Send;
    fn update_position(
        &self,
        id: &str,
        form: &PositionForm,
    ) -> impl Future<Output = Result<Position, ApiError>> + Send;
    fn delete_position(&self, id: &str) -> impl Future<Output = Result<(), ApiError>> + Send;
    fn position_applicants(
        &self,
        id: &str,
        query: ApplicantQuery,
    ) -> impl Future<Output = Result<Vec<Application>, ApiError>> + Send;
    fn position_stats(&self) -> impl Future<Output = Result<PositionStats, ApiError>> + Send;

    fn list_interviews(
        &self,
    ) -> impl Future<Output = Result<ListResponse<Interview>, ApiError>> + Send;
    fn upcoming_interviews(
        &self,
        days: i64,
    ) -> impl Future<Output = Result<Vec<Interview>, ApiError>> + Send;
    fn interviews_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Future<Output = Result<Vec<Interview>, ApiError>> + Send;
    fn schedule_interview(
        &self,
        request: &ScheduleInterview,
    ) -> impl Future<Output = Result<Interview, ApiError>> + Send;
    fn complete_interview(
        &self,
        id: &str,
        request: &CompleteInterview,
    ) -> impl Future<Output = Result<Interview, ApiError>> + Send;
    fn update_interview(
        &self,
        id: &str,
        update: &InterviewUpdate,
    ) -> impl Future<Output = Result<Interview, ApiError>> + Send;
    fn delete_interview(&self, id: &str) -> impl Future<Output = Result<(), ApiError>> + Send;
    fn interview_stats(&self) -> impl Future<Output = Result<InterviewStats, ApiError>> + Send;

    fn list_offers(&self) -> impl Future<Output = Result<ListResponse<Offer>, ApiError>> + Send;
    fn get_offer(&self, id: &str) -> impl Future<Output = Result<Offer, ApiError>> + Send;
    fn create_offer(
        &self,
        request: &CreateOffer,
    ) -> impl Future<Output = Result<Offer, ApiError>> + Send;
    fn update_offer(
        &self,
        id: &str,
        update: &OfferUpdate,
    ) -> impl Future<Output = Result<Offer, ApiError>> + Send;
    fn delete_offer(&self, id: &str) -> impl Future<Output = Result<(), ApiError>> + Send;
    fn accept_offer(&self, id: &str) -> impl Future<Output = Result<Offer, ApiError>> + Send;
    fn decline_offer(
        &self,
        id: &str,
        request: &DeclineOffer,
    ) -> impl Future<Output = Result<Offer, ApiError>> + Send;
    fn expiring_offers(
        &self,
        days: i64,
    ) -> impl Future<Output = Result<Vec<Offer>, ApiError>> + Send;
    fn offer_stats(&self) -> impl Future<Output = Result<OfferStats, ApiError>> + Send;

    fn list_offer_templates(
        &self,
    ) -> impl Future<Output = Result<ListResponse<OfferTemplate>, ApiError>> + Send;
    fn get_offer_template(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<OfferTemplate, ApiError>> + Send;
    fn active_offer_template(
        &self,
    ) -> impl Future<Output = Result<OfferTemplate, ApiError>> + Send;
    fn create_offer_template(
        &self,
        request: &CreateOfferTemplate,
    ) -> impl Future<Output = Result<OfferTemplate, ApiError>> + Send;
    fn update_offer_template(
        &self,
        id: &str,
        request: &CreateOfferTemplate,
    ) -> impl Future<Output = Result<OfferTemplate, ApiError>> + Send;
    fn delete_offer_template(&self, id: &str)
        -> impl Future<Output = Result<(), ApiError>> + Send;
    fn preview_offer_template(
        &self,
        id: &str,
        data: &BTreeMap<String, String>,
    ) -> impl Future<Output = Result<PreviewResponse, ApiError>> + Send;

    fn list_onboarding_candidates(
        &self,
    ) -> impl Future<Output = Result<ListResponse<OnboardingCandidate>, ApiError>> + Send;
    fn get_onboarding_candidate(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<OnboardingCandidate, ApiError>> + Send;
    fn create_onboarding_candidate(
        &self,
        request: &CreateOnboardingCandidate,
    ) -> impl Future<Output = Result<OnboardingCandidate, ApiError>> + Send;
    fn update_onboarding_section(
        &self,
        id: &str,
        update: &SectionUpdate,
    ) -> impl Future<Output = Result<SectionSaved, ApiError>> + Send;
    fn submit_onboarding(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<OnboardingSubmitted, ApiError>> + Send;
    fn delete_onboarding_candidate(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
    fn onboarding_stats(&self) -> impl Future<Output = Result<OnboardingStats, ApiError>> + Send;

    fn list_users(&self) -> impl Future<Output = Result<UserDirectory, ApiError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_arrays_have_no_pagination() {
        let list: ListResponse<u32> = serde_json::from_value(json!([1, 2, 3])).expect("decodes");
        assert_eq!(list.into_parts(), (vec![1, 2, 3], None));
    }

    #[test]
    fn bare_application_arrays_decode_without_pagination() {
        let list: ListResponse<Application> = serde_json::from_value(json!([{
            "id": "app-1",
            "position": "pos-1",
            "applicant_name": "Sarah Johnson",
            "applicant_email": "sarah.j.applicant@email.com",
            "stage": "Interview",
            "completed_interview_stages": 2,
            "total_interview_stages": 3
        }]))
        .expect("decodes");
        assert!(matches!(list, ListResponse::Items(_)));
        let (items, pagination) = list.into_parts();
        assert!(pagination.is_none());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].applicant_name, "Sarah Johnson");
        assert_eq!(items[0].stage, ApplicationStage::Interview);

        let empty: ListResponse<Application> = serde_json::from_value(json!([])).expect("decodes");
        assert_eq!(empty.into_parts(), (Vec::new(), None));
    }

    #[test]
    fn paginated_envelopes_keep_the_server_count() {
        let list: ListResponse<u32> = serde_json::from_value(json!({
            "count": 42,
            "next": "http://localhost/api/hiring/applications/?page=2",
            "previous": null,
            "results": [1, 2]
        }))
        .expect("decodes");
        let (items, pagination) = list.into_parts();
        assert_eq!(items, vec![1, 2]);
        let pagination = pagination.expect("paginated");
        assert_eq!(pagination.count, 42);
        assert!(pagination.next.is_some());
        assert!(pagination.previous.is_none());
    }

    #[test]
    fn applicant_query_omits_unset_filters() {
        let query = ApplicantQuery {
            stage: Some(ApplicationStage::Interview),
            certified: None,
        };
        assert_eq!(
            serde_json::to_value(query).expect("encodes"),
            json!({"stage": "Interview"})
        );
    }
}
