use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use super::domain::{Application, ApplicationFilter, ApplicationId};
use super::stage::{check_transition, Stage, Transition};
use super::sweep;
use crate::clock::Clock;
use crate::error::TalentError;
use crate::session::SessionContext;
use crate::store::{ApplicationRepository, JobRepository, RepositoryError, SubmissionRepository};
use crate::workflows::candidates::{CandidateId, TimelineEvent, APPLIED_EVENT};
use crate::workflows::jobs::{Job, JobId, JobStatus};

/// Application intake, the stage machine and the auto-rejection sweep.
pub struct ApplicationService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> ApplicationService<R>
where
    R: ApplicationRepository + JobRepository + SubmissionRepository + 'static,
{
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Files an application for the session's user against an active job whose
    /// application window is open.
    pub fn apply(
        &self,
        session: &SessionContext,
        job_id: &JobId,
    ) -> Result<Application, TalentError> {
        let job = self
            .repository
            .fetch_job(job_id)?
            .ok_or_else(|| TalentError::not_found("job", job_id))?;
        let now = self.clock.now();

        if job.status != JobStatus::Active {
            return Err(TalentError::validation(format!(
                "job {} is not accepting applications",
                job.slug
            )));
        }
        if !job.application_window().contains(now) {
            return Err(TalentError::validation(format!(
                "applications for {} are closed",
                job.slug
            )));
        }

        let candidate_id = CandidateId(session.user_id.clone());
        let application = Application {
            id: ApplicationId::generate(),
            job_id: job.id.clone(),
            candidate_id: candidate_id.clone(),
            candidate_name: session.name.clone(),
            candidate_email: session.email.clone(),
            applied_at: now,
            stage: Stage::Applied,
            score: None,
        };
        let event = TimelineEvent::new(candidate_id, now, APPLIED_EVENT);

        let stored = self
            .repository
            .insert_application(application, event)
            .map_err(|err| match err {
                RepositoryError::Conflict => {
                    TalentError::Conflict("already applied to this job".to_string())
                }
                other => TalentError::Store(other),
            })?;
        info!(
            application_id = %stored.id,
            job_id = %stored.job_id,
            candidate_id = %stored.candidate_id,
            "application filed"
        );
        Ok(stored)
    }

    /// Lists applications matching `filter`, sweeping each one first.
    pub fn list(&self, filter: &ApplicationFilter) -> Result<Vec<Application>, TalentError> {
        let applications = self.repository.applications(filter)?;
        let mut jobs: HashMap<JobId, Option<Job>> = HashMap::new();
        let mut swept = Vec::with_capacity(applications.len());
        for application in applications {
            let job = match jobs.get(&application.job_id) {
                Some(job) => job.clone(),
                None => {
                    let job = self.repository.fetch_job(&application.job_id)?;
                    jobs.insert(application.job_id.clone(), job.clone());
                    job
                }
            };
            swept.push(self.sweep(application, job.as_ref())?);
        }
        debug!(count = swept.len(), "listed applications");
        Ok(swept)
    }

    pub fn get(&self, id: &ApplicationId) -> Result<Application, TalentError> {
        let application = self.fetch(id)?;
        let job = self.repository.fetch_job(&application.job_id)?;
        self.sweep(application, job.as_ref())
    }

    /// Moves an application to `stage` under the rank rule. The sweep runs first so an
    /// overdue application cannot be advanced.
    pub fn transition(
        &self,
        id: &ApplicationId,
        stage: Stage,
    ) -> Result<Application, TalentError> {
        let mut application = self.get(id)?;
        let from = application.stage;
        if check_transition(from, stage)? == Transition::Unchanged {
            return Ok(application);
        }

        application.stage = stage;
        let event = TimelineEvent::new(
            application.candidate_id.clone(),
            self.clock.now(),
            stage.timeline_event(),
        );
        self.repository
            .update_application(application.clone(), Some(event))?;
        info!(application_id = %id, %from, to = %stage, "application stage changed");
        Ok(application)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Application, TalentError> {
        self.repository
            .fetch_application(id)?
            .ok_or_else(|| TalentError::not_found("application", id))
    }

    fn sweep(
        &self,
        application: Application,
        job: Option<&Job>,
    ) -> Result<Application, TalentError> {
        if application.stage != Stage::Applied {
            return Ok(application);
        }
        let has_submission = self
            .repository
            .find_submission(&application.job_id, &application.candidate_id)?
            .is_some();
        if !sweep::is_overdue(&application, job, has_submission, self.clock.now()) {
            return Ok(application);
        }

        let rejected = sweep::reject(application);
        let event = TimelineEvent::new(
            rejected.candidate_id.clone(),
            self.clock.now(),
            Stage::Rejected.timeline_event(),
        );
        self.repository
            .update_application(rejected.clone(), Some(event))?;
        info!(
            application_id = %rejected.id,
            job_id = %rejected.job_id,
            "application auto-rejected after assessment window closed"
        );
        Ok(rejected)
    }
}
