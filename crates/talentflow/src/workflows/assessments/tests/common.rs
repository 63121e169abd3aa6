use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};

use crate::clock::FixedClock;
use crate::simulator::RequestSimulator;
use crate::store::MemoryStore;
use crate::workflows::applications::ApplicationService;
use crate::workflows::assessments::{assessment_router, Assessment, AssessmentService};
use crate::workflows::jobs::{Job, JobId, JobService, NewJob};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 3, 15, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) struct Fixture {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<FixedClock>,
    pub jobs: JobService<MemoryStore>,
    pub applications: ApplicationService<MemoryStore>,
    pub service: Arc<AssessmentService<MemoryStore>>,
}

pub(super) fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(FixedClock::new(now()));
    Fixture {
        jobs: JobService::new(store.clone(), clock.clone()),
        applications: ApplicationService::new(store.clone(), clock.clone()),
        service: Arc::new(AssessmentService::new(store.clone(), clock.clone())),
        store,
        clock,
    }
}

pub(super) fn open_job(fixture: &Fixture) -> Job {
    fixture
        .jobs
        .create(NewJob::titled("Site Reliability Engineer"))
        .expect("create job")
}

/// Assessment window opens in one hour and lasts thirty minutes.
pub(super) fn windowed_job(fixture: &Fixture) -> Job {
    fixture
        .jobs
        .create(NewJob {
            assessment_date: Some(now() + Duration::hours(1)),
            assessment_duration: Some(30),
            ..NewJob::titled("Security Engineer")
        })
        .expect("create job")
}

/// q1: single choice keyed `B` (+2/-0.5); q2: multi select keyed `{x, z}` (+4/0);
/// q3: yes/no without key; q4: free text.
pub(super) fn screening(job_id: &JobId) -> Assessment {
    serde_json::from_value(json!({
        "jobId": job_id.as_str(),
        "sections": [{
            "id": "s1",
            "title": "Screening",
            "questions": [
                {
                    "id": "q1", "type": "singleChoice", "label": "Pick B",
                    "options": ["A", "B", "C"], "required": true,
                    "hasMarks": true, "marksCorrect": 2, "marksIncorrect": -0.5,
                    "correctOption": "B"
                },
                {
                    "id": "q2", "type": "multiChoice", "label": "Pick x and z",
                    "options": ["x", "y", "z"],
                    "hasMarks": true, "marksCorrect": 4, "marksIncorrect": 0,
                    "correctOptions": ["x", "z"]
                },
                {
                    "id": "q3", "type": "singleChoice", "label": "Can you relocate?",
                    "options": ["Yes", "No"]
                },
                { "id": "q4", "type": "longText", "label": "Anything else?" }
            ]
        }]
    }))
    .expect("assessment fixture decodes")
}

pub(super) fn router(fixture: &Fixture) -> axum::Router {
    assessment_router(fixture.service.clone(), Arc::new(RequestSimulator::disabled()))
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
