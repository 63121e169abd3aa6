use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::clock::FixedClock;
use crate::session::SessionContext;
use crate::simulator::RequestSimulator;
use crate::store::MemoryStore;
use crate::workflows::applications::{application_router, ApplicationService};
use crate::workflows::assessments::AssessmentService;
use crate::workflows::jobs::{Job, JobService, NewJob};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) struct Fixture {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<FixedClock>,
    pub jobs: JobService<MemoryStore>,
    pub assessments: AssessmentService<MemoryStore>,
    pub service: Arc<ApplicationService<MemoryStore>>,
}

pub(super) fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(FixedClock::new(now()));
    Fixture {
        jobs: JobService::new(store.clone(), clock.clone()),
        assessments: AssessmentService::new(store.clone(), clock.clone()),
        service: Arc::new(ApplicationService::new(store.clone(), clock.clone())),
        store,
        clock,
    }
}

/// Applications open now; the assessment runs for an hour, two days from now.
pub(super) fn assessed_job(fixture: &Fixture, title: &str) -> Job {
    fixture
        .jobs
        .create(NewJob {
            start_date: Some(now() - Duration::days(1)),
            end_date: Some(now() + Duration::days(1)),
            assessment_date: Some(assessment_start()),
            assessment_duration: Some(60),
            ..NewJob::titled(title)
        })
        .expect("create job")
}

pub(super) fn assessment_start() -> DateTime<Utc> {
    now() + Duration::days(2)
}

pub(super) fn after_assessment() -> DateTime<Utc> {
    assessment_start() + Duration::minutes(61)
}

pub(super) fn candidate(id: &str) -> SessionContext {
    SessionContext::candidate(id, "Jo Doe", "jo@example.com")
}

pub(super) fn router(fixture: &Fixture) -> axum::Router {
    application_router(fixture.service.clone(), Arc::new(RequestSimulator::disabled()))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
