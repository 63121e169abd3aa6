use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};

use super::domain::{Assessment, ScoreSummary, Submission, SubmissionId, SubmitRequest};
use super::service::AssessmentService;
use crate::error::TalentError;
use crate::simulator::{RequestSimulator, WriteProfile};
use crate::store::{AssessmentRepository, JobRepository, SubmissionRepository};
use crate::workflows::candidates::CandidateId;
use crate::workflows::jobs::JobId;
use crate::workflows::{decode_body, WorkflowState};

type AssessmentState<R> = WorkflowState<AssessmentService<R>>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse {
    ok: bool,
    id: SubmissionId,
    #[serde(flatten)]
    summary: ScoreSummary,
}

pub fn assessment_router<R>(
    service: Arc<AssessmentService<R>>,
    simulator: Arc<RequestSimulator>,
) -> Router
where
    R: AssessmentRepository + SubmissionRepository + JobRepository + 'static,
{
    Router::new()
        .route(
            "/assessments/:job_id",
            get(get_handler::<R>).put(replace_handler::<R>),
        )
        .route("/assessments/:job_id/submit", post(submit_handler::<R>))
        .route("/submissions/:id", get(submission_handler::<R>))
        .route(
            "/submissions/by-job-candidate/:job_id/:candidate_id",
            get(submission_lookup_handler::<R>),
        )
        .with_state(WorkflowState::new(service, simulator))
}

async fn get_handler<R>(
    State(state): State<AssessmentState<R>>,
    Path(job_id): Path<String>,
) -> Result<Json<Assessment>, TalentError>
where
    R: AssessmentRepository + SubmissionRepository + JobRepository + 'static,
{
    let job_id = JobId(job_id);
    let assessment = state.simulator.read(|| state.service.get(&job_id)).await?;
    Ok(Json(assessment))
}

async fn replace_handler<R>(
    State(state): State<AssessmentState<R>>,
    Path(job_id): Path<String>,
    Json(mut body): Json<Value>,
) -> Result<Json<Value>, TalentError>
where
    R: AssessmentRepository + SubmissionRepository + JobRepository + 'static,
{
    let job_id = JobId(job_id);
    if let Value::Object(fields) = &mut body {
        fields.insert("jobId".to_string(), Value::String(job_id.to_string()));
    }
    let assessment: Assessment = decode_body(body)?;
    state
        .simulator
        .write(WriteProfile::Standard, || {
            state.service.replace(&job_id, assessment)
        })
        .await?;
    Ok(Json(json!({ "ok": true })))
}

async fn submit_handler<R>(
    State(state): State<AssessmentState<R>>,
    Path(job_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<SubmitResponse>), TalentError>
where
    R: AssessmentRepository + SubmissionRepository + JobRepository + 'static,
{
    let job_id = JobId(job_id);
    let request: SubmitRequest = decode_body(body)?;
    let submission = state
        .simulator
        .write(WriteProfile::Standard, || {
            state
                .service
                .submit(&job_id, &request.candidate_id, request.answers)
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            ok: true,
            id: submission.id,
            summary: submission.score,
        }),
    ))
}

async fn submission_handler<R>(
    State(state): State<AssessmentState<R>>,
    Path(id): Path<String>,
) -> Result<Json<Submission>, TalentError>
where
    R: AssessmentRepository + SubmissionRepository + JobRepository + 'static,
{
    let id = SubmissionId(id);
    let submission = state.simulator.read(|| state.service.submission(&id)).await?;
    Ok(Json(submission))
}

async fn submission_lookup_handler<R>(
    State(state): State<AssessmentState<R>>,
    Path((job_id, candidate_id)): Path<(String, String)>,
) -> Result<Json<Submission>, TalentError>
where
    R: AssessmentRepository + SubmissionRepository + JobRepository + 'static,
{
    let job_id = JobId(job_id);
    let candidate_id = CandidateId(candidate_id);
    let submission = state
        .simulator
        .read(|| state.service.submission_for(&job_id, &candidate_id))
        .await?;
    Ok(Json(submission))
}
