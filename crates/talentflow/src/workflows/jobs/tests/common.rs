use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::clock::FixedClock;
use crate::simulator::RequestSimulator;
use crate::store::MemoryStore;
use crate::workflows::jobs::{job_router, Job, JobService, NewJob};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 14, 10, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) struct Fixture {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<FixedClock>,
    pub service: Arc<JobService<MemoryStore>>,
}

pub(super) fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(FixedClock::new(now()));
    let service = Arc::new(JobService::new(store.clone(), clock.clone()));
    Fixture {
        store,
        clock,
        service,
    }
}

/// Creates `titles` in order so they hold orders 1..=n.
pub(super) fn board(fixture: &Fixture, titles: &[&str]) -> Vec<Job> {
    titles
        .iter()
        .map(|title| fixture.service.create(NewJob::titled(title)).expect("create job"))
        .collect()
}

pub(super) fn starting_in(days: i64) -> NewJob {
    NewJob {
        start_date: Some(now() + Duration::days(days)),
        end_date: Some(now() + Duration::days(days + 14)),
        ..NewJob::titled("Platform Engineer")
    }
}

pub(super) fn router(fixture: &Fixture, simulator: RequestSimulator) -> axum::Router {
    job_router(fixture.service.clone(), Arc::new(simulator))
}

pub(super) fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
