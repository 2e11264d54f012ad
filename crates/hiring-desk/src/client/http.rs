use std::collections::BTreeMap;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use super::{ApiError, ApplicantQuery, HiringBackend, ListResponse};
use crate::config::ApiConfig;
use crate::hiring::applications::{Application, ApplicationStage};
use crate::hiring::interviews::{
    CompleteInterview, Interview, InterviewStats, InterviewUpdate, ScheduleInterview,
};
use crate::hiring::offers::{
    CreateOffer, CreateOfferTemplate, DeclineOffer, Offer, OfferStats, OfferTemplate, OfferUpdate,
    PreviewRequest, PreviewResponse,
};
use crate::hiring::positions::{Position, PositionForm, PositionStats};
use crate::hiring::users::UserDirectory;
use crate::onboarding::{
    CreateOnboardingCandidate, OnboardingCandidate, OnboardingStats, OnboardingSubmitted,
    SectionSaved, SectionUpdate,
};

const DISTRICT_HEADER: &str = "x-district-id";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// [`HiringBackend`] over HTTP. Every request carries the bearer token and district header
/// from [`ApiConfig`] when they are set.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
}

impl HttpBackend {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ApiError::Invalid(format!("invalid auth header: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }
        if let Some(district) = &config.district_id {
            let value = HeaderValue::from_str(district)
                .map_err(|e| ApiError::Invalid(format!("invalid district header: {e}")))?;
            headers.insert(HeaderName::from_static(DISTRICT_HEADER), value);
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ApiError::from)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            headers,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .headers(self.headers.clone())
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = checked(request).await?;
        response.json::<T>().await.map_err(ApiError::from)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.request(reqwest::Method::GET, path)).await
    }

    async fn get_with<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send(self.request(reqwest::Method::GET, path).query(query))
            .await
    }

    async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.request(reqwest::Method::POST, path).json(body))
            .await
    }

    async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.request(reqwest::Method::PATCH, path).json(body))
            .await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        checked(self.request(reqwest::Method::DELETE, path)).await?;
        Ok(())
    }
}

async fn checked(request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
    let response = request.send().await.map_err(|err| {
        tracing::warn!(error = %err, "hiring api unreachable");
        ApiError::from(err)
    })?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let error = ApiError::from_response(status.as_u16(), &body);
    if status == StatusCode::NOT_FOUND {
        tracing::debug!(status = status.as_u16(), error = %error, "hiring api returned not found");
    } else {
        tracing::warn!(status = status.as_u16(), error = %error, "hiring api request failed");
    }
    Err(error)
}

impl HiringBackend for HttpBackend {
    async fn list_applications(
        &self,
        position: Option<&str>,
    ) -> Result<ListResponse<Application>, ApiError> {
        match position {
            Some(position) => {
                self.get_with("hiring/applications/", &[("position", position)])
                    .await
            }
            None => self.get("hiring/applications/").await,
        }
    }

    async fn get_application(&self, id: &str) -> Result<Application, ApiError> {
        self.get(&format!("hiring/applications/{id}/")).await
    }

    async fn advance_stage(&self, id: &str) -> Result<Application, ApiError> {
        self.post(&format!("hiring/applications/{id}/advance_stage/"), &json!({}))
            .await
    }

    async fn reject_application(&self, id: &str) -> Result<Application, ApiError> {
        self.post(&format!("hiring/applications/{id}/reject/"), &json!({}))
            .await
    }

    async fn demo_set_stage(
        &self,
        id: &str,
        stage: ApplicationStage,
    ) -> Result<Application, ApiError> {
        self.post(
            &format!("hiring/applications/{id}/demo_set_stage/"),
            &json!({ "stage": stage }),
        )
        .await
    }

    async fn list_positions(&self) -> Result<ListResponse<Position>, ApiError> {
        self.get("hiring/positions/").await
    }

    async fn get_position(&self, id: &str) -> Result<Position, ApiError> {
        self.get(&format!("hiring/positions/{id}/")).await
    }

    async fn create_position(&self, form: &PositionForm) -> Result<Position, ApiError> {
        self.post("hiring/positions/", form).await
    }

    async fn update_position(&self, id: &str, form: &PositionForm) -> Result<Position, ApiError> {
        self.patch(&format!("hiring/positions/{id}/"), form).await
    }

    async fn delete_position(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("hiring/positions/{id}/")).await
    }

    async fn position_applicants(
        &self,
        id: &str,
        query: ApplicantQuery,
    ) -> Result<Vec<Application>, ApiError> {
        self.get_with(&format!("hiring/positions/{id}/applicants/"), &query)
            .await
    }

    async fn position_stats(&self) -> Result<PositionStats, ApiError> {
        self.get("hiring/positions/stats/").await
    }

    async fn list_interviews(&self) -> Result<ListResponse<Interview>, ApiError> {
        self.get("hiring/interviews/").await
    }

    async fn upcoming_interviews(&self, days: i64) -> Result<Vec<Interview>, ApiError> {
        self.get_with("hiring/interviews/upcoming/", &[("days", days)])
            .await
    }

    async fn interviews_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Interview>, ApiError> {
        self.get_with(
            "hiring/interviews/by_date_range/",
            &[("start_date", start.to_string()), ("end_date", end.to_string())],
        )
        .await
    }

    async fn schedule_interview(&self, request: &ScheduleInterview) -> Result<Interview, ApiError> {
        self.post("hiring/interviews/schedule/", request).await
    }

    async fn complete_interview(
        &self,
        id: &str,
        request: &CompleteInterview,
    ) -> Result<Interview, ApiError> {
        self.post(&format!("hiring/interviews/{id}/mark_completed/"), request)
            .await
    }

    async fn update_interview(
        &self,
        id: &str,
        update: &InterviewUpdate,
    ) -> Result<Interview, ApiError> {
        self.patch(&format!("hiring/interviews/{id}/"), update).await
    }

    async fn delete_interview(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("hiring/interviews/{id}/")).await
    }

    async fn interview_stats(&self) -> Result<InterviewStats, ApiError> {
        self.get("hiring/interviews/stats/").await
    }

    async fn list_offers(&self) -> Result<ListResponse<Offer>, ApiError> {
        self.get("hiring/offers/").await
    }

    async fn get_offer(&self, id: &str) -> Result<Offer, ApiError> {
        self.get(&format!("hiring/offers/{id}/")).await
    }

    async fn create_offer(&self, request: &CreateOffer) -> Result<Offer, ApiError> {
        self.post("hiring/offers/", request).await
    }

    async fn update_offer(&self, id: &str, update: &OfferUpdate) -> Result<Offer, ApiError> {
        self.patch(&format!("hiring/offers/{id}/"), update).await
    }

    async fn delete_offer(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("hiring/offers/{id}/")).await
    }

    async fn accept_offer(&self, id: &str) -> Result<Offer, ApiError> {
        self.post(&format!("hiring/offers/{id}/accept/"), &json!({}))
            .await
    }

    async fn decline_offer(&self, id: &str, request: &DeclineOffer) -> Result<Offer, ApiError> {
        self.post(&format!("hiring/offers/{id}/decline/"), request)
            .await
    }

    async fn expiring_offers(&self, days: i64) -> Result<Vec<Offer>, ApiError> {
        self.get_with("hiring/offers/expiring_soon/", &[("days", days)])
            .await
    }

    async fn offer_stats(&self) -> Result<OfferStats, ApiError> {
        self.get("hiring/offers/stats/").await
    }

    async fn list_offer_templates(&self) -> Result<ListResponse<OfferTemplate>, ApiError> {
        self.get("hiring/offer-templates/").await
    }

    async fn get_offer_template(&self, id: &str) -> Result<OfferTemplate, ApiError> {
        self.get(&format!("hiring/offer-templates/{id}/")).await
    }

    async fn active_offer_template(&self) -> Result<OfferTemplate, ApiError> {
        self.get("hiring/offer-templates/active/").await
    }

    async fn create_offer_template(
        &self,
        request: &CreateOfferTemplate,
    ) -> Result<OfferTemplate, ApiError> {
        self.post("hiring/offer-templates/", request).await
    }

    async fn update_offer_template(
        &self,
        id: &str,
        request: &CreateOfferTemplate,
    ) -> Result<OfferTemplate, ApiError> {
        self.patch(&format!("hiring/offer-templates/{id}/"), request)
            .await
    }

    async fn delete_offer_template(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("hiring/offer-templates/{id}/")).await
    }

    async fn preview_offer_template(
        &self,
        id: &str,
        data: &BTreeMap<String, String>,
    ) -> Result<PreviewResponse, ApiError> {
        let body = PreviewRequest { data: data.clone() };
        self.post(&format!("hiring/offer-templates/{id}/preview/"), &body)
            .await
    }

    async fn list_onboarding_candidates(
        &self,
    ) -> Result<ListResponse<OnboardingCandidate>, ApiError> {
        self.get("onboarding/candidates/").await
    }

    async fn get_onboarding_candidate(&self, id: &str) -> Result<OnboardingCandidate, ApiError> {
        self.get(&format!("onboarding/candidates/{id}/")).await
    }

    async fn create_onboarding_candidate(
        &self,
        request: &CreateOnboardingCandidate,
    ) -> Result<OnboardingCandidate, ApiError> {
        self.post("onboarding/candidates/", request).await
    }

    async fn update_onboarding_section(
        &self,
        id: &str,
        update: &SectionUpdate,
    ) -> Result<SectionSaved, ApiError> {
        self.post(&format!("onboarding/candidates/{id}/update_section/"), update)
            .await
    }

    async fn submit_onboarding(&self, id: &str) -> Result<OnboardingSubmitted, ApiError> {
        self.post(&format!("onboarding/candidates/{id}/submit/"), &json!({}))
            .await
    }

    async fn delete_onboarding_candidate(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("onboarding/candidates/{id}/")).await
    }

    async fn onboarding_stats(&self) -> Result<OnboardingStats, ApiError> {
        self.get("onboarding/candidates/stats/").await
    }

    async fn list_users(&self) -> Result<UserDirectory, ApiError> {
        self.get("auth/users/").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token: Option<&str>, district: Option<&str>) -> ApiConfig {
        ApiConfig {
            base_url: "http://127.0.0.1:3000/api/".to_string(),
            token: token.map(str::to_string),
            district_id: district.map(str::to_string),
        }
    }

    #[test]
    fn joins_paths_without_doubling_slashes() {
        let backend = HttpBackend::new(&config(None, None)).expect("backend");
        assert_eq!(backend.base_url(), "http://127.0.0.1:3000/api");
        assert_eq!(
            backend.url("/hiring/positions/"),
            "http://127.0.0.1:3000/api/hiring/positions/"
        );
    }

    #[test]
    fn attaches_auth_and_district_headers() {
        let backend =
            HttpBackend::new(&config(Some("abc123"), Some("district-7"))).expect("backend");
        assert_eq!(
            backend.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()),
            Some("Bearer abc123")
        );
        assert_eq!(
            backend
                .headers
                .get(DISTRICT_HEADER)
                .and_then(|v| v.to_str().ok()),
            Some("district-7")
        );
    }

    #[test]
    fn rejects_tokens_that_cannot_be_headers() {
        let err = HttpBackend::new(&config(Some("bad\ntoken"), None)).expect_err("invalid header");
        assert!(matches!(err, ApiError::Invalid(_)));
    }
}
