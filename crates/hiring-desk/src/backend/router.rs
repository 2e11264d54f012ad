use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{single_page, BackendError, MemoryBackend};
use crate::client::{DEFAULT_EXPIRING_DAYS, DEFAULT_UPCOMING_DAYS};
use crate::hiring::interviews::{CompleteInterview, InterviewUpdate, ScheduleInterview};
use crate::hiring::offers::{
    CreateOffer, CreateOfferTemplate, DeclineOffer, OfferUpdate, PreviewRequest,
};
use crate::hiring::positions::PositionForm;
use crate::onboarding::{CreateOnboardingCandidate, SectionUpdate};

type Shared = Arc<MemoryBackend>;

/// REST surface of the in-memory backend, laid out like the hiring API the client talks to.
pub fn hiring_router(backend: Shared) -> Router {
    Router::new()
        .route("/api/hiring/applications/", get(list_applications))
        .route("/api/hiring/applications/:id/", get(get_application))
        .route(
            "/api/hiring/applications/:id/advance_stage/",
            post(advance_stage),
        )
        .route("/api/hiring/applications/:id/reject/", post(reject_application))
        .route(
            "/api/hiring/applications/:id/demo_set_stage/",
            post(demo_set_stage),
        )
        .route(
            "/api/hiring/positions/",
            get(list_positions).post(create_position),
        )
        .route("/api/hiring/positions/stats/", get(position_stats))
        .route(
            "/api/hiring/positions/:id/",
            get(get_position)
                .patch(update_position)
                .put(update_position)
                .delete(delete_position),
        )
        .route(
            "/api/hiring/positions/:id/applicants/",
            get(position_applicants),
        )
        .route("/api/hiring/interviews/", get(list_interviews))
        .route("/api/hiring/interviews/upcoming/", get(upcoming_interviews))
        .route(
            "/api/hiring/interviews/by_date_range/",
            get(interviews_by_date_range),
        )
        .route("/api/hiring/interviews/schedule/", post(schedule_interview))
        .route("/api/hiring/interviews/stats/", get(interview_stats))
        .route(
            "/api/hiring/interviews/:id/",
            get(get_interview)
                .patch(update_interview)
                .delete(delete_interview),
        )
        .route(
            "/api/hiring/interviews/:id/mark_completed/",
            post(complete_interview),
        )
        .route("/api/hiring/offers/", get(list_offers).post(create_offer))
        .route("/api/hiring/offers/expiring_soon/", get(expiring_offers))
        .route("/api/hiring/offers/stats/", get(offer_stats))
        .route(
            "/api/hiring/offers/:id/",
            get(get_offer).patch(update_offer).delete(delete_offer),
        )
        .route("/api/hiring/offers/:id/accept/", post(accept_offer))
        .route("/api/hiring/offers/:id/decline/", post(decline_offer))
        .route(
            "/api/hiring/offer-templates/",
            get(list_offer_templates).post(create_offer_template),
        )
        .route(
            "/api/hiring/offer-templates/active/",
            get(active_offer_template),
        )
        .route(
            "/api/hiring/offer-templates/:id/",
            get(get_offer_template)
                .patch(update_offer_template)
                .put(update_offer_template)
                .delete(delete_offer_template),
        )
        .route(
            "/api/hiring/offer-templates/:id/preview/",
            post(preview_offer_template),
        )
        .route(
            "/api/onboarding/candidates/",
            get(list_candidates).post(create_candidate),
        )
        .route("/api/onboarding/candidates/stats/", get(onboarding_stats))
        .route(
            "/api/onboarding/candidates/:id/",
            get(get_candidate).delete(delete_candidate),
        )
        .route(
            "/api/onboarding/candidates/:id/update_section/",
            post(update_section),
        )
        .route("/api/onboarding/candidates/:id/submit/", post(submit_onboarding))
        .route("/api/auth/users/", get(list_users))
        .with_state(backend)
}

fn reply<T: Serialize>(result: Result<T, BackendError>, status: StatusCode) -> Response {
    match result {
        Ok(value) => (status, Json(value)).into_response(),
        Err(error) => error.into_response(),
    }
}

fn ok<T: Serialize>(result: Result<T, BackendError>) -> Response {
    reply(result, StatusCode::OK)
}

fn created<T: Serialize>(result: Result<T, BackendError>) -> Response {
    reply(result, StatusCode::CREATED)
}

fn deleted(result: Result<(), BackendError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error.into_response(),
    }
}

fn listed<T: Serialize>(results: Vec<T>) -> Response {
    Json(single_page(results)).into_response()
}

#[derive(Debug, Default, Deserialize)]
struct PositionFilter {
    position: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ApplicantParams {
    stage: Option<String>,
    certified: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DaysParam {
    days: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct DateRangeParams {
    start_date: Option<String>,
    end_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StageBody {
    #[serde(default)]
    stage: Option<String>,
}

async fn list_applications(
    State(backend): State<Shared>,
    Query(filter): Query<PositionFilter>,
) -> Response {
    listed(backend.applications(filter.position.as_deref()))
}

async fn get_application(State(backend): State<Shared>, Path(id): Path<String>) -> Response {
    ok(backend.application(&id))
}

async fn advance_stage(State(backend): State<Shared>, Path(id): Path<String>) -> Response {
    ok(backend.advance_stage(&id))
}

async fn reject_application(State(backend): State<Shared>, Path(id): Path<String>) -> Response {
    ok(backend.reject_application(&id))
}

async fn demo_set_stage(
    State(backend): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<StageBody>,
) -> Response {
    ok(backend.demo_set_stage(&id, body.stage.as_deref()))
}

async fn list_positions(State(backend): State<Shared>) -> Response {
    listed(backend.positions())
}

async fn get_position(State(backend): State<Shared>, Path(id): Path<String>) -> Response {
    ok(backend.position(&id))
}

async fn create_position(
    State(backend): State<Shared>,
    Json(form): Json<PositionForm>,
) -> Response {
    created(backend.create_position(&form))
}

async fn update_position(
    State(backend): State<Shared>,
    Path(id): Path<String>,
    Json(form): Json<PositionForm>,
) -> Response {
    ok(backend.update_position(&id, &form))
}

async fn delete_position(State(backend): State<Shared>, Path(id): Path<String>) -> Response {
    deleted(backend.delete_position(&id))
}

async fn position_applicants(
    State(backend): State<Shared>,
    Path(id): Path<String>,
    Query(params): Query<ApplicantParams>,
) -> Response {
    ok(backend.position_applicants(
        &id,
        params.stage.as_deref(),
        params.certified.as_deref(),
    ))
}

async fn position_stats(State(backend): State<Shared>) -> Response {
    Json(backend.position_stats()).into_response()
}

async fn list_interviews(State(backend): State<Shared>) -> Response {
    listed(backend.interviews())
}

async fn get_interview(State(backend): State<Shared>, Path(id): Path<String>) -> Response {
    ok(backend.interview(&id))
}

async fn upcoming_interviews(
    State(backend): State<Shared>,
    Query(params): Query<DaysParam>,
) -> Response {
    let days = params.days.unwrap_or(DEFAULT_UPCOMING_DAYS);
    ok(backend.upcoming_interviews(days))
}

async fn interviews_by_date_range(
    State(backend): State<Shared>,
    Query(params): Query<DateRangeParams>,
) -> Response {
    ok(backend.interviews_in_range(params.start_date.as_deref(), params.end_date.as_deref()))
}

async fn schedule_interview(
    State(backend): State<Shared>,
    Json(request): Json<ScheduleInterview>,
) -> Response {
    created(backend.schedule_interview(&request))
}

async fn complete_interview(
    State(backend): State<Shared>,
    Path(id): Path<String>,
    Json(request): Json<CompleteInterview>,
) -> Response {
    ok(backend.complete_interview(&id, &request))
}

async fn update_interview(
    State(backend): State<Shared>,
    Path(id): Path<String>,
    Json(update): Json<InterviewUpdate>,
) -> Response {
    ok(backend.update_interview(&id, &update))
}

async fn delete_interview(State(backend): State<Shared>, Path(id): Path<String>) -> Response {
    deleted(backend.delete_interview(&id))
}

async fn interview_stats(State(backend): State<Shared>) -> Response {
    Json(backend.interview_stats()).into_response()
}

async fn list_offers(State(backend): State<Shared>) -> Response {
    listed(backend.offers())
}

async fn get_offer(State(backend): State<Shared>, Path(id): Path<String>) -> Response {
    ok(backend.offer(&id))
}

async fn create_offer(
    State(backend): State<Shared>,
    Json(request): Json<CreateOffer>,
) -> Response {
    created(backend.create_offer(&request))
}

async fn update_offer(
    State(backend): State<Shared>,
    Path(id): Path<String>,
    Json(update): Json<OfferUpdate>,
) -> Response {
    ok(backend.update_offer(&id, &update))
}

async fn delete_offer(State(backend): State<Shared>, Path(id): Path<String>) -> Response {
    deleted(backend.delete_offer(&id))
}

async fn accept_offer(State(backend): State<Shared>, Path(id): Path<String>) -> Response {
    ok(backend.accept_offer(&id))
}

async fn decline_offer(
    State(backend): State<Shared>,
    Path(id): Path<String>,
    Json(request): Json<DeclineOffer>,
) -> Response {
    ok(backend.decline_offer(&id, &request))
}

async fn expiring_offers(
    State(backend): State<Shared>,
    Query(params): Query<DaysParam>,
) -> Response {
    let days = params.days.unwrap_or(DEFAULT_EXPIRING_DAYS);
    ok(backend.expiring_offers(days))
}

async fn offer_stats(State(backend): State<Shared>) -> Response {
    Json(backend.offer_stats()).into_response()
}

async fn list_offer_templates(State(backend): State<Shared>) -> Response {
    listed(backend.offer_templates())
}

async fn get_offer_template(State(backend): State<Shared>, Path(id): Path<String>) -> Response {
    ok(backend.offer_template(&id))
}

async fn active_offer_template(State(backend): State<Shared>) -> Response {
    ok(backend.active_offer_template())
}

async fn create_offer_template(
    State(backend): State<Shared>,
    Json(request): Json<CreateOfferTemplate>,
) -> Response {
    created(backend.create_offer_template(&request))
}

async fn update_offer_template(
    State(backend): State<Shared>,
    Path(id): Path<String>,
    Json(request): Json<CreateOfferTemplate>,
) -> Response {
    ok(backend.update_offer_template(&id, &request))
}

async fn delete_offer_template(State(backend): State<Shared>, Path(id): Path<String>) -> Response {
    deleted(backend.delete_offer_template(&id))
}

async fn preview_offer_template(
    State(backend): State<Shared>,
    Path(id): Path<String>,
    Json(request): Json<PreviewRequest>,
) -> Response {
    let data: BTreeMap<String, String> = request.data;
    ok(backend.preview_offer_template(&id, &data))
}

async fn list_candidates(State(backend): State<Shared>) -> Response {
    listed(backend.onboarding_candidates())
}

async fn get_candidate(State(backend): State<Shared>, Path(id): Path<String>) -> Response {
    ok(backend.onboarding_candidate(&id))
}

async fn create_candidate(
    State(backend): State<Shared>,
    Json(request): Json<CreateOnboardingCandidate>,
) -> Response {
    created(backend.create_onboarding_candidate(&request))
}

async fn update_section(
    State(backend): State<Shared>,
    Path(id): Path<String>,
    Json(update): Json<SectionUpdate>,
) -> Response {
    ok(backend.update_onboarding_section(&id, &update))
}

async fn submit_onboarding(State(backend): State<Shared>, Path(id): Path<String>) -> Response {
    ok(backend.submit_onboarding(&id))
}

async fn delete_candidate(State(backend): State<Shared>, Path(id): Path<String>) -> Response {
    deleted(backend.delete_onboarding_candidate(&id))
}

async fn onboarding_stats(State(backend): State<Shared>) -> Response {
    Json(backend.onboarding_stats()).into_response()
}

async fn list_users(State(backend): State<Shared>) -> Response {
    Json(backend.users()).into_response()
}
