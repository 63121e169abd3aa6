use std::sync::Arc;

use tracing::{debug, info};

use super::domain::{slugify, validate_schedule, Job, JobId, JobPatch, JobStatus, NewJob};
use super::listing::JobQuery;
use super::ordering::{reposition, ReorderRequest};
use crate::clock::Clock;
use crate::error::TalentError;
use crate::store::{JobRepository, RepositoryError};
use crate::workflows::Page;

/// Job lifecycle manager: creation, edits subject to the start-date lock, listing and
/// board reordering.
pub struct JobService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> JobService<R>
where
    R: JobRepository + 'static,
{
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub fn list(&self, query: &JobQuery) -> Result<Page<Job>, TalentError> {
        let jobs = self.repository.jobs()?;
        let page = query.apply(jobs, self.clock.now());
        debug!(total = page.total, page = page.page, "listed jobs");
        Ok(page)
    }

    pub fn get(&self, id: &JobId) -> Result<Job, TalentError> {
        self.repository
            .fetch_job(id)?
            .ok_or_else(|| TalentError::not_found("job", id))
    }

    /// Derives the slug, appends the job at the end of the board and persists it.
    pub fn create(&self, request: NewJob) -> Result<Job, TalentError> {
        let title = request
            .title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .ok_or_else(|| TalentError::validation("title is required"))?
            .to_string();
        let slug = self.resolve_slug(request.slug.as_deref(), &title, None)?;

        let job = Job {
            id: JobId::generate(),
            title,
            slug,
            status: request.status.unwrap_or(JobStatus::Active),
            order: 0,
            tags: request.tags,
            description: request.description.unwrap_or_default(),
            salary: request.salary,
            attachments: request.attachments,
            start_date: request.start_date,
            end_date: request.end_date,
            assessment_date: request.assessment_date,
            assessment_duration: request.assessment_duration,
        };
        validate_schedule(&job)?;

        let stored = self.repository.insert_job(job).map_err(|err| match err {
            RepositoryError::Conflict => slug_conflict(),
            other => TalentError::Store(other),
        })?;
        info!(job_id = %stored.id, slug = %stored.slug, order = stored.order, "job created");
        Ok(stored)
    }

    /// Applies a partial update. Once the start date has passed the content and schedule
    /// fields are locked; status, tags and slug stay editable.
    pub fn update(&self, id: &JobId, patch: JobPatch) -> Result<Job, TalentError> {
        let mut job = self.get(id)?;

        if job.is_locked_at(self.clock.now()) {
            let touched = patch.locked_fields();
            if !touched.is_empty() {
                return Err(TalentError::Locked(format!(
                    "job {} has started; cannot change {}",
                    job.slug,
                    touched.join(", ")
                )));
            }
        }
        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(TalentError::validation("title must not be blank"));
            }
        }

        let requested_slug = patch.slug.clone();
        patch.apply_to(&mut job);
        if let Some(raw) = requested_slug.as_deref() {
            job.slug = self.resolve_slug(Some(raw), &job.title, Some(&job.id))?;
        }
        validate_schedule(&job)?;

        self.repository.update_job(job.clone()).map_err(|err| match err {
            RepositoryError::Conflict => slug_conflict(),
            RepositoryError::NotFound => TalentError::not_found("job", id),
            other => TalentError::Store(other),
        })?;
        info!(job_id = %job.id, status = %job.status, "job updated");
        Ok(job)
    }

    /// Moves the job to `to_order` and renumbers the whole board in one atomic write.
    pub fn reorder(&self, id: &JobId, request: ReorderRequest) -> Result<(), TalentError> {
        let jobs = self.repository.jobs()?;
        let plan = reposition(&jobs, id, request.to_order)
            .ok_or_else(|| TalentError::not_found("job", id))?;
        self.repository.renumber_jobs(&plan)?;
        info!(
            job_id = %id,
            from_order = request.from_order,
            to_order = request.to_order,
            "jobs reordered"
        );
        Ok(())
    }

    /// Normalizes the requested slug (or the title) and checks it is free.
    fn resolve_slug(
        &self,
        requested: Option<&str>,
        title: &str,
        current: Option<&JobId>,
    ) -> Result<String, TalentError> {
        let source = requested
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .unwrap_or(title);
        let slug = slugify(source);
        if slug.is_empty() {
            return Err(TalentError::validation(
                "slug must contain at least one letter or digit",
            ));
        }
        match self.repository.find_job_by_slug(&slug)? {
            Some(existing) if Some(&existing.id) != current => Err(slug_conflict()),
            _ => Ok(slug),
        }
    }
}

fn slug_conflict() -> TalentError {
    TalentError::Conflict("slug already in use".to_string())
}
