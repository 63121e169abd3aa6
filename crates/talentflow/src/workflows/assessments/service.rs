use std::sync::Arc;

use tracing::{debug, info};

use super::domain::{Assessment, Answers, Submission, SubmissionId};
use super::scoring;
use crate::clock::Clock;
use crate::error::TalentError;
use crate::store::{AssessmentRepository, JobRepository, RepositoryError, SubmissionRepository};
use crate::workflows::candidates::CandidateId;
use crate::workflows::jobs::{Job, JobId};

/// Assessment definitions per job plus scored, one-shot submissions.
pub struct AssessmentService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> AssessmentService<R>
where
    R: AssessmentRepository + SubmissionRepository + JobRepository + 'static,
{
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// The stored definition, or an empty one when the job has none yet.
    pub fn get(&self, job_id: &JobId) -> Result<Assessment, TalentError> {
        let assessment = self.repository.fetch_assessment(job_id)?;
        Ok(assessment.unwrap_or_else(|| Assessment::empty(job_id.clone())))
    }

    pub fn replace(
        &self,
        job_id: &JobId,
        mut assessment: Assessment,
    ) -> Result<Assessment, TalentError> {
        self.job(job_id)?;
        assessment.job_id = job_id.clone();
        assessment.validate()?;
        self.repository.put_assessment(assessment.clone())?;
        info!(
            job_id = %job_id,
            questions = assessment.questions().count(),
            "assessment replaced"
        );
        Ok(assessment)
    }

    /// Scores and stores a candidate's only submission for `job_id`, copying the summary
    /// onto their application in the same write.
    pub fn submit(
        &self,
        job_id: &JobId,
        candidate_id: &CandidateId,
        answers: Answers,
    ) -> Result<Submission, TalentError> {
        let job = self.job(job_id)?;
        let now = self.clock.now();

        if self
            .repository
            .find_submission(job_id, candidate_id)?
            .is_some()
        {
            return Err(duplicate_submission());
        }
        if let Some(window) = job.assessment_window() {
            if !window.contains(now) {
                return Err(TalentError::Locked(format!(
                    "assessment for {} is not open",
                    job.slug
                )));
            }
        }

        let assessment = self.get(job_id)?;
        let outcome = scoring::score(&assessment, &answers);
        let summary = outcome.summary;
        debug!(graded = outcome.graded.len(), "scored submission");

        let submission = Submission {
            id: SubmissionId::generate(),
            job_id: job_id.clone(),
            candidate_id: candidate_id.clone(),
            at: now,
            answers,
            score: summary,
        };

        let stored = self
            .repository
            .insert_submission(submission)
            .map_err(|err| match err {
                RepositoryError::Conflict => duplicate_submission(),
                other => TalentError::Store(other),
            })?;
        info!(
            submission_id = %stored.id,
            job_id = %job_id,
            candidate_id = %candidate_id,
            marks = summary.marks,
            "assessment submitted"
        );
        Ok(stored)
    }

    pub fn submission(&self, id: &SubmissionId) -> Result<Submission, TalentError> {
        self.repository
            .fetch_submission(id)?
            .ok_or_else(|| TalentError::not_found("submission", id))
    }

    pub fn submission_for(
        &self,
        job_id: &JobId,
        candidate_id: &CandidateId,
    ) -> Result<Submission, TalentError> {
        self.repository
            .find_submission(job_id, candidate_id)?
            .ok_or_else(|| TalentError::not_found("submission", format!("{job_id}/{candidate_id}")))
    }

    fn job(&self, job_id: &JobId) -> Result<Job, TalentError> {
        self.repository
            .fetch_job(job_id)?
            .ok_or_else(|| TalentError::not_found("job", job_id))
    }
}

fn duplicate_submission() -> TalentError {
    TalentError::Conflict("assessment already submitted".to_string())
}
