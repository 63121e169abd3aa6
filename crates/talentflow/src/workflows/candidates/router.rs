use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;

use super::domain::{
    Candidate, CandidateId, CandidateListParams, CandidatePatch, CandidateQuery, NewCandidate,
    TimelineEvent,
};
use super::service::CandidateService;
use crate::error::TalentError;
use crate::simulator::{RequestSimulator, WriteProfile};
use crate::store::CandidateRepository;
use crate::workflows::{decode_body, Page, WorkflowState};

type CandidateState<R> = WorkflowState<CandidateService<R>>;

#[derive(Debug, Serialize)]
struct TimelineResponse {
    items: Vec<TimelineEvent>,
}

pub fn candidate_router<R>(
    service: Arc<CandidateService<R>>,
    simulator: Arc<RequestSimulator>,
) -> Router
where
    R: CandidateRepository + 'static,
{
    Router::new()
        .route(
            "/candidates",
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route(
            "/candidates/:id",
            get(get_handler::<R>).patch(update_handler::<R>),
        )
        .route("/candidates/:id/timeline", get(timeline_handler::<R>))
        .with_state(WorkflowState::new(service, simulator))
}

async fn list_handler<R>(
    State(state): State<CandidateState<R>>,
    Query(params): Query<CandidateListParams>,
) -> Result<Json<Page<Candidate>>, TalentError>
where
    R: CandidateRepository + 'static,
{
    let query = CandidateQuery::try_from(params)?;
    let page = state.simulator.read(|| state.service.list(&query)).await?;
    Ok(Json(page))
}

async fn get_handler<R>(
    State(state): State<CandidateState<R>>,
    Path(id): Path<String>,
) -> Result<Json<Candidate>, TalentError>
where
    R: CandidateRepository + 'static,
{
    let id = CandidateId(id);
    let candidate = state.simulator.read(|| state.service.get(&id)).await?;
    Ok(Json(candidate))
}

async fn create_handler<R>(
    State(state): State<CandidateState<R>>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Candidate>), TalentError>
where
    R: CandidateRepository + 'static,
{
    let request: NewCandidate = decode_body(body)?;
    let candidate = state
        .simulator
        .write(WriteProfile::Standard, || state.service.create(request))
        .await?;
    Ok((StatusCode::CREATED, Json(candidate)))
}

async fn update_handler<R>(
    State(state): State<CandidateState<R>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Candidate>, TalentError>
where
    R: CandidateRepository + 'static,
{
    let id = CandidateId(id);
    let patch: CandidatePatch = decode_body(body)?;
    let candidate = state
        .simulator
        .write(WriteProfile::Standard, || state.service.update(&id, patch))
        .await?;
    Ok(Json(candidate))
}

async fn timeline_handler<R>(
    State(state): State<CandidateState<R>>,
    Path(id): Path<String>,
) -> Result<Json<TimelineResponse>, TalentError>
where
    R: CandidateRepository + 'static,
{
    let id = CandidateId(id);
    let items = state.simulator.read(|| state.service.timeline(&id)).await?;
    Ok(Json(TimelineResponse { items }))
}
