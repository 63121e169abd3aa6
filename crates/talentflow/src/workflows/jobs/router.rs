use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde_json::{json, Value};

use super::domain::{Job, JobId, JobPatch, NewJob};
use super::listing::{Audience, JobListParams, JobQuery};
use super::ordering::ReorderRequest;
use super::service::JobService;
use crate::error::TalentError;
use crate::session::{Role, SessionContext};
use crate::simulator::{RequestSimulator, WriteProfile};
use crate::store::JobRepository;
use crate::workflows::{decode_body, Page, WorkflowState};

type JobState<R> = WorkflowState<JobService<R>>;

/// Router builder exposing the job board endpoints.
pub fn job_router<R>(service: Arc<JobService<R>>, simulator: Arc<RequestSimulator>) -> Router
where
    R: JobRepository + 'static,
{
    Router::new()
        .route("/jobs", get(list_handler::<R>).post(create_handler::<R>))
        .route("/jobs/:id", get(get_handler::<R>).patch(update_handler::<R>))
        .route("/jobs/:id/reorder", patch(reorder_handler::<R>))
        .with_state(WorkflowState::new(service, simulator))
}

pub(crate) async fn list_handler<R>(
    State(state): State<JobState<R>>,
    session: Option<SessionContext>,
    Query(params): Query<JobListParams>,
) -> Result<Json<Page<Job>>, TalentError>
where
    R: JobRepository + 'static,
{
    let mut query = JobQuery::try_from(params)?;
    if session.map_or(false, |session| session.role == Role::Candidate) {
        query.audience = Audience::Candidate;
    }
    let page = state.simulator.read(|| state.service.list(&query)).await?;
    Ok(Json(page))
}

pub(crate) async fn get_handler<R>(
    State(state): State<JobState<R>>,
    Path(id): Path<String>,
) -> Result<Json<Job>, TalentError>
where
    R: JobRepository + 'static,
{
    let id = JobId(id);
    let job = state.simulator.read(|| state.service.get(&id)).await?;
    Ok(Json(job))
}

pub(crate) async fn create_handler<R>(
    State(state): State<JobState<R>>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Job>), TalentError>
where
    R: JobRepository + 'static,
{
    let request: NewJob = decode_body(body)?;
    let job = state
        .simulator
        .write(WriteProfile::Standard, || state.service.create(request))
        .await?;
    Ok((StatusCode::CREATED, Json(job)))
}

pub(crate) async fn update_handler<R>(
    State(state): State<JobState<R>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Job>, TalentError>
where
    R: JobRepository + 'static,
{
    let id = JobId(id);
    let patch: JobPatch = decode_body(body)?;
    let job = state
        .simulator
        .write(WriteProfile::Standard, || state.service.update(&id, patch))
        .await?;
    Ok(Json(job))
}

pub(crate) async fn reorder_handler<R>(
    State(state): State<JobState<R>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, TalentError>
where
    R: JobRepository + 'static,
{
    let id = JobId(id);
    let request = ReorderRequest::from_json(&body)?;
    state
        .simulator
        .write(WriteProfile::Reorder, || state.service.reorder(&id, request))
        .await?;
    Ok(Json(json!({ "success": true })))
}
