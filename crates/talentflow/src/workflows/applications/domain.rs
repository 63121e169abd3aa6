use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::stage::Stage;
use crate::workflows::assessments::ScoreSummary;
use crate::workflows::candidates::CandidateId;
use crate::workflows::jobs::JobId;

string_id!(
    /// Identifier of a candidate's application to one job.
    ApplicationId
);

/// A candidate's application to one job. `(job_id, candidate_id)` is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub candidate_id: CandidateId,
    #[serde(default)]
    pub candidate_name: Option<String>,
    #[serde(default)]
    pub candidate_email: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub stage: Stage,
    /// Denormalized assessment result; absent until a submission is scored or the
    /// application is auto-rejected.
    #[serde(flatten)]
    pub score: Option<ScoreSummary>,
}

/// Body of `POST /applications`; the candidate comes from the session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    pub job_id: JobId,
}

/// Body of `PATCH /applications/:id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StageChange {
    pub stage: Stage,
}

/// `GET /applications` query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationListParams {
    pub job_id: Option<String>,
    pub candidate_id: Option<String>,
}

/// Optional job and candidate constraints on an application listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationFilter {
    pub job_id: Option<JobId>,
    pub candidate_id: Option<CandidateId>,
}

impl From<ApplicationListParams> for ApplicationFilter {
    fn from(params: ApplicationListParams) -> Self {
        let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        Self {
            job_id: present(params.job_id).map(JobId),
            candidate_id: present(params.candidate_id).map(CandidateId),
        }
    }
}

impl ApplicationFilter {
    pub fn for_job(job_id: JobId) -> Self {
        Self {
            job_id: Some(job_id),
            candidate_id: None,
        }
    }

    pub fn for_candidate(candidate_id: CandidateId) -> Self {
        Self {
            job_id: None,
            candidate_id: Some(candidate_id),
        }
    }

    pub fn matches(&self, application: &Application) -> bool {
        self.job_id
            .as_ref()
            .map_or(true, |job_id| &application.job_id == job_id)
            && self
                .candidate_id
                .as_ref()
                .map_or(true, |candidate_id| &application.candidate_id == candidate_id)
    }
}
