//! Record store collaborator.
//!
//! Each aggregate gets its own repository trait so services can be exercised against
//! purpose-built doubles. Multi-record writes (`renumber_jobs`, `insert_submission`) are
//! atomic: either every row lands or none does.

mod memory;

pub use memory::MemoryStore;

use crate::workflows::applications::{Application, ApplicationFilter, ApplicationId};
use crate::workflows::assessments::{Assessment, Submission, SubmissionId};
use crate::workflows::candidates::{Candidate, CandidateId, TimelineEvent};
use crate::workflows::jobs::{Job, JobId, OrderAssignment};

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("write failed: {0}")]
    WriteFailed(String),
}

pub trait JobRepository: Send + Sync {
    /// Appends the job at the end of the board: the stored `order` is the job count after
    /// the insert, assigned in the same transaction. Fails with `Conflict` when the slug is
    /// taken.
    fn insert_job(&self, job: Job) -> Result<Job, RepositoryError>;
    fn update_job(&self, job: Job) -> Result<(), RepositoryError>;
    fn fetch_job(&self, id: &JobId) -> Result<Option<Job>, RepositoryError>;
    fn find_job_by_slug(&self, slug: &str) -> Result<Option<Job>, RepositoryError>;
    /// Every job, ascending by `order`.
    fn jobs(&self) -> Result<Vec<Job>, RepositoryError>;
    fn count_jobs(&self) -> Result<usize, RepositoryError>;
    /// Applies every assignment in one transaction.
    fn renumber_jobs(&self, assignments: &[OrderAssignment]) -> Result<(), RepositoryError>;
}

pub trait CandidateRepository: Send + Sync {
    fn insert_candidate(
        &self,
        candidate: Candidate,
        event: TimelineEvent,
    ) -> Result<Candidate, RepositoryError>;
    fn update_candidate(
        &self,
        candidate: Candidate,
        event: Option<TimelineEvent>,
    ) -> Result<(), RepositoryError>;
    fn fetch_candidate(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError>;
    fn candidates(&self) -> Result<Vec<Candidate>, RepositoryError>;
    /// Ascending by timestamp.
    fn timeline(&self, candidate_id: &CandidateId) -> Result<Vec<TimelineEvent>, RepositoryError>;
}

pub trait ApplicationRepository: Send + Sync {
    /// Fails with `Conflict` when the candidate already applied to the job.
    fn insert_application(
        &self,
        application: Application,
        event: TimelineEvent,
    ) -> Result<Application, RepositoryError>;
    fn update_application(
        &self,
        application: Application,
        event: Option<TimelineEvent>,
    ) -> Result<(), RepositoryError>;
    fn fetch_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, RepositoryError>;
    fn applications(&self, filter: &ApplicationFilter) -> Result<Vec<Application>, RepositoryError>;
}

pub trait AssessmentRepository: Send + Sync {
    fn fetch_assessment(&self, job_id: &JobId) -> Result<Option<Assessment>, RepositoryError>;
    fn put_assessment(&self, assessment: Assessment) -> Result<(), RepositoryError>;
}

pub trait SubmissionRepository: Send + Sync {
    /// Stores the submission and copies its score onto the pair's current application row, if
    /// one exists, in one transaction. Fails with `Conflict` when the pair already submitted.
    fn insert_submission(&self, submission: Submission) -> Result<Submission, RepositoryError>;
    fn fetch_submission(&self, id: &SubmissionId) -> Result<Option<Submission>, RepositoryError>;
    fn find_submission(
        &self,
        job_id: &JobId,
        candidate_id: &CandidateId,
    ) -> Result<Option<Submission>, RepositoryError>;
}

/// Everything the services need from one backing store.
pub trait TalentStore:
    JobRepository
    + CandidateRepository
    + ApplicationRepository
    + AssessmentRepository
    + SubmissionRepository
{
    /// Replaces every table with what `build` writes into an empty staging store. The live
    /// tables are swapped only when `build` succeeds; on failure they are left as they were.
    fn rebuild<T, E, F>(&self, build: F) -> Result<T, E>
    where
        Self: Sized,
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<RepositoryError>;
}
