use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;

use super::domain::{
    Application, ApplicationFilter, ApplicationId, ApplicationListParams, NewApplication,
    StageChange,
};
use super::service::ApplicationService;
use crate::error::TalentError;
use crate::session::SessionContext;
use crate::simulator::{RequestSimulator, WriteProfile};
use crate::store::{ApplicationRepository, JobRepository, SubmissionRepository};
use crate::workflows::{decode_body, WorkflowState};

type ApplicationState<R> = WorkflowState<ApplicationService<R>>;

pub fn application_router<R>(
    service: Arc<ApplicationService<R>>,
    simulator: Arc<RequestSimulator>,
) -> Router
where
    R: ApplicationRepository + JobRepository + SubmissionRepository + 'static,
{
    Router::new()
        .route(
            "/applications",
            get(list_handler::<R>).post(apply_handler::<R>),
        )
        .route(
            "/applications/:id",
            get(get_handler::<R>).patch(transition_handler::<R>),
        )
        .with_state(WorkflowState::new(service, simulator))
}

pub(crate) async fn apply_handler<R>(
    State(state): State<ApplicationState<R>>,
    session: SessionContext,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Application>), TalentError>
where
    R: ApplicationRepository + JobRepository + SubmissionRepository + 'static,
{
    let request: NewApplication = decode_body(body)?;
    let application = state
        .simulator
        .write(WriteProfile::Standard, || {
            state.service.apply(&session, &request.job_id)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(application)))
}

pub(crate) async fn list_handler<R>(
    State(state): State<ApplicationState<R>>,
    Query(params): Query<ApplicationListParams>,
) -> Result<Json<Vec<Application>>, TalentError>
where
    R: ApplicationRepository + JobRepository + SubmissionRepository + 'static,
{
    let filter = ApplicationFilter::from(params);
    let applications = state.simulator.read(|| state.service.list(&filter)).await?;
    Ok(Json(applications))
}

pub(crate) async fn get_handler<R>(
    State(state): State<ApplicationState<R>>,
    Path(id): Path<String>,
) -> Result<Json<Application>, TalentError>
where
    R: ApplicationRepository + JobRepository + SubmissionRepository + 'static,
{
    let id = ApplicationId(id);
    let application = state.simulator.read(|| state.service.get(&id)).await?;
    Ok(Json(application))
}

pub(crate) async fn transition_handler<R>(
    State(state): State<ApplicationState<R>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Application>, TalentError>
where
    R: ApplicationRepository + JobRepository + SubmissionRepository + 'static,
{
    let id = ApplicationId(id);
    let change: StageChange = decode_body(body)?;
    let application = state
        .simulator
        .write(WriteProfile::Standard, || {
            state.service.transition(&id, change.stage)
        })
        .await?;
    Ok(Json(application))
}
