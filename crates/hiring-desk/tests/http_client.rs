//! The reqwest client against the in-memory backend served on a loopback port.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use hiring_desk::backend::{hiring_router, MemoryBackend};
use hiring_desk::client::{ApiError, ApplicantQuery, HiringBackend, HttpBackend};
use hiring_desk::config::ApiConfig;
use hiring_desk::hiring::applications::ApplicationStage;
use hiring_desk::hiring::offers::DeclineOffer;
use hiring_desk::hiring::interviews::InterviewUpdate;
use tokio::net::TcpListener;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 10).expect("valid date")
}

async fn serve() -> HttpBackend {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let router = hiring_router(Arc::new(MemoryBackend::seeded(today())));
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    HttpBackend::new(&ApiConfig {
        base_url: format!("http://{addr}/api"),
        token: Some("test-token".to_string()),
        district_id: Some("district-1".to_string()),
    })
    .expect("client")
}

#[tokio::test]
async fn lists_unwrap_the_paginated_envelope() {
    let client = serve().await;
    let (applications, pagination) = client
        .list_applications(Some("pos-1"))
        .await
        .expect("list")
        .into_parts();
    assert_eq!(applications.len(), 5);
    assert_eq!(pagination.map(|page| page.count), Some(5));

    let positions = client.list_positions().await.expect("positions").into_items();
    assert_eq!(positions.len(), 4);
}

#[tokio::test]
async fn workflow_errors_surface_the_server_message() {
    let client = serve().await;
    client
        .demo_set_stage("app-2", ApplicationStage::Onboarding)
        .await
        .expect("force stage");
    let err = client.advance_stage("app-2").await.expect_err("final");
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "Application is already at final stage");

    let err = client.get_offer("offer-404").await.expect_err("missing");
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Not found.");
}

#[tokio::test]
async fn query_parameters_reach_the_server() {
    let client = serve().await;
    let interviewing = client
        .position_applicants(
            "pos-1",
            ApplicantQuery {
                stage: Some(ApplicationStage::ReferenceCheck),
                certified: Some(true),
            },
        )
        .await
        .expect("applicants");
    assert_eq!(interviewing.len(), 1);

    let range = client
        .interviews_by_date_range(
            NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"),
            NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid date"),
        )
        .await
        .expect("range");
    assert_eq!(range.len(), 5);

    assert_eq!(client.expiring_offers(14).await.expect("expiring").len(), 2);
    assert_eq!(client.upcoming_interviews(2).await.expect("upcoming").len(), 1);
}

#[tokio::test]
async fn patch_and_delete_round_trip() {
    let client = serve().await;
    let updated = client
        .update_interview(
            "int-5",
            &InterviewUpdate {
                location: Some("Virtual".to_string()),
                ..InterviewUpdate::default()
            },
        )
        .await
        .expect("update");
    assert_eq!(updated.location, "Virtual");

    client.delete_interview("int-5").await.expect("delete");
    let err = client.delete_interview("int-5").await.expect_err("gone");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn offer_actions_and_preview() {
    let client = serve().await;
    let declined = client
        .decline_offer(
            "offer-2",
            &DeclineOffer {
                reason: "Counter offer accepted".to_string(),
            },
        )
        .await
        .expect("decline");
    assert_eq!(declined.declined_reason.as_deref(), Some("Counter offer accepted"));

    let err: ApiError = client
        .decline_offer("offer-2", &DeclineOffer::default())
        .await
        .expect_err("already declined");
    assert_eq!(err.to_string(), "Only pending offers can be declined");

    let preview = client
        .preview_offer_template(
            "tpl-1",
            &BTreeMap::from([("salary".to_string(), "$61,000".to_string())]),
        )
        .await
        .expect("preview");
    assert!(preview.preview.contains("$61,000"));
}
