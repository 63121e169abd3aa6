use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};
use talentflow::clock::FixedClock;
use talentflow::config::SimulatorConfig;
use talentflow::simulator::RequestSimulator;
use talentflow::store::MemoryStore;
use talentflow::workflows::jobs::{JobQuery, NewJob};
use talentflow::workflows::{talent_router, TalentServices};
use tower::ServiceExt;

fn opening_day() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn services(simulator: RequestSimulator) -> (TalentServices<MemoryStore>, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(opening_day()));
    let services = TalentServices::new(
        Arc::new(MemoryStore::new()),
        clock.clone(),
        Arc::new(simulator),
    );
    (services, clock)
}

fn reorder_always_fails() -> RequestSimulator {
    RequestSimulator::seeded(
        SimulatorConfig {
            enabled: true,
            latency_min_ms: 0,
            latency_max_ms: 0,
            write_failure_rate: 0.0,
            reorder_failure_rate: 1.0,
        },
        11,
    )
}

fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    match body {
        Some(body) => builder.body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request builds")
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json payload")
}

fn board_titles(services: &TalentServices<MemoryStore>) -> Vec<(String, u32)> {
    services
        .jobs
        .list(&JobQuery::default())
        .expect("list")
        .items
        .into_iter()
        .map(|job| (job.title, job.order))
        .collect()
}

#[tokio::test]
async fn reorder_keeps_board_dense_and_unique() {
    let (services, _clock) = services(RequestSimulator::disabled());
    let mut ids = Vec::new();
    for title in ["A", "B", "C", "D"] {
        ids.push(services.jobs.create(NewJob::titled(title)).expect("create").id);
    }
    let app = talent_router(services.clone());

    let response = app
        .oneshot(request(
            "PATCH",
            &format!("/jobs/{}/reorder", ids[3]),
            Some(json!({ "fromOrder": 4, "toOrder": 2 })),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "success": true }));
    assert_eq!(
        board_titles(&services),
        vec![
            ("A".to_string(), 1),
            ("D".to_string(), 2),
            ("B".to_string(), 3),
            ("C".to_string(), 4),
        ]
    );
}

#[tokio::test]
async fn failed_reorder_leaves_every_order_untouched() {
    let (services, _clock) = services(reorder_always_fails());
    let mut ids = Vec::new();
    for title in ["A", "B", "C"] {
        ids.push(services.jobs.create(NewJob::titled(title)).expect("create").id);
    }
    let before = board_titles(&services);

    let response = talent_router(services.clone())
        .oneshot(request(
            "PATCH",
            &format!("/jobs/{}/reorder", ids[2]),
            Some(json!({ "fromOrder": 3, "toOrder": 1 })),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["kind"], "transient");
    assert_eq!(board_titles(&services), before);
}

#[tokio::test]
async fn reorder_of_unknown_job_is_not_found() {
    let (services, _clock) = services(RequestSimulator::disabled());
    services.jobs.create(NewJob::titled("A")).expect("create");

    let response = talent_router(services)
        .oneshot(request(
            "PATCH",
            "/jobs/ghost/reorder",
            Some(json!({ "fromOrder": 1, "toOrder": 1 })),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn created_job_gets_slug_and_next_order() {
    let (services, _clock) = services(RequestSimulator::disabled());
    services.jobs.create(NewJob::titled("Designer")).expect("create");
    let app = talent_router(services);

    let created = app
        .clone()
        .oneshot(request(
            "POST",
            "/jobs",
            Some(json!({ "title": "Backend Engineer", "tags": ["rust"] })),
        ))
        .await
        .expect("route executes");
    assert_eq!(created.status(), StatusCode::CREATED);
    let job = json_body(created).await;
    assert_eq!(job["slug"], "backend-engineer");
    assert_eq!(job["status"], "active");
    assert_eq!(job["order"], 2);

    let duplicate = app
        .oneshot(request(
            "POST",
            "/jobs",
            Some(json!({ "title": "Backend  Engineer!" })),
        ))
        .await
        .expect("route executes");
    assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(duplicate).await["kind"], "conflict");
}

#[tokio::test]
async fn window_fields_lock_once_applications_open() {
    let (services, clock) = services(RequestSimulator::disabled());
    let job = services
        .jobs
        .create(NewJob {
            start_date: Some(opening_day() + Duration::days(1)),
            end_date: Some(opening_day() + Duration::days(8)),
            ..NewJob::titled("Data Engineer")
        })
        .expect("create");
    let app = talent_router(services);
    let uri = format!("/jobs/{}", job.id);

    let early = app
        .clone()
        .oneshot(request("PATCH", &uri, Some(json!({ "title": "Senior Data Engineer" }))))
        .await
        .expect("route executes");
    assert_eq!(early.status(), StatusCode::OK);

    clock.advance(Duration::days(2));
    let locked = app
        .clone()
        .oneshot(request("PATCH", &uri, Some(json!({ "title": "Staff Data Engineer" }))))
        .await
        .expect("route executes");
    assert_eq!(locked.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(locked).await["kind"], "locked");

    let archived = app
        .oneshot(request("PATCH", &uri, Some(json!({ "status": "archived" }))))
        .await
        .expect("route executes");
    assert_eq!(archived.status(), StatusCode::OK);
    assert_eq!(json_body(archived).await["status"], "archived");
}

#[tokio::test]
async fn listing_filters_and_pages() {
    let (services, _clock) = services(RequestSimulator::disabled());
    for index in 1..=12 {
        services
            .jobs
            .create(NewJob::titled(&format!("Engineer {index}")))
            .expect("create");
    }
    services.jobs.create(NewJob::titled("Recruiter")).expect("create");

    let response = talent_router(services)
        .oneshot(request(
            "GET",
            "/jobs?search=engineer&page=2&pageSize=5&sort=order:desc",
            None,
        ))
        .await
        .expect("route executes");

    let page = json_body(response).await;
    assert_eq!(page["total"], 12);
    assert_eq!(page["page"], 2);
    let orders: Vec<u64> = page["items"]
        .as_array()
        .expect("items")
        .iter()
        .filter_map(|job| job["order"].as_u64())
        .collect();
    assert_eq!(orders, vec![7, 6, 5, 4, 3]);
}
