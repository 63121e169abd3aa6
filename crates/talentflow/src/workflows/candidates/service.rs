use std::sync::Arc;

use tracing::{debug, info};

use super::domain::{
    Candidate, CandidateId, CandidatePatch, CandidateQuery, NewCandidate, TimelineEvent,
};
use crate::clock::Clock;
use crate::error::TalentError;
use crate::store::{CandidateRepository, RepositoryError};
use crate::workflows::applications::{check_transition, Stage, Transition};
use crate::workflows::Page;

/// The event recorded when a candidate record is created.
pub const APPLIED_EVENT: &str = "applied";

pub struct CandidateService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> CandidateService<R>
where
    R: CandidateRepository + 'static,
{
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub fn create(&self, request: NewCandidate) -> Result<Candidate, TalentError> {
        let name = required(request.name, "name")?;
        let email = required(request.email, "email")?;
        let candidate = Candidate {
            id: CandidateId::generate(),
            name,
            email,
            stage: request.stage.unwrap_or_default(),
            job_id: request.job_id,
        };
        let event = TimelineEvent::new(candidate.id.clone(), self.clock.now(), APPLIED_EVENT);
        let stored = self.repository.insert_candidate(candidate, event)?;
        info!(candidate_id = %stored.id, stage = %stored.stage, "candidate created");
        Ok(stored)
    }

    pub fn list(&self, query: &CandidateQuery) -> Result<Page<Candidate>, TalentError> {
        let matching: Vec<Candidate> = self
            .repository
            .candidates()?
            .into_iter()
            .filter(|candidate| query.matches(candidate))
            .collect();
        debug!(total = matching.len(), "listed candidates");
        Ok(query.page.slice(matching))
    }

    pub fn get(&self, id: &CandidateId) -> Result<Candidate, TalentError> {
        self.repository
            .fetch_candidate(id)?
            .ok_or_else(|| TalentError::not_found("candidate", id))
    }

    /// Applies a partial update; a stage change goes through the rank rule and lands with
    /// its timeline entry in one write.
    pub fn update(&self, id: &CandidateId, patch: CandidatePatch) -> Result<Candidate, TalentError> {
        let mut candidate = self.get(id)?;
        let mut event = None;

        if let Some(stage) = patch.stage {
            if check_transition(candidate.stage, stage)? != Transition::Unchanged {
                event = Some(self.stage_event(id, stage));
                candidate.stage = stage;
            }
        }
        if let Some(name) = patch.name {
            candidate.name = non_blank(name, "name")?;
        }
        if let Some(email) = patch.email {
            candidate.email = non_blank(email, "email")?;
        }
        if let Some(job_id) = patch.job_id {
            candidate.job_id = Some(job_id);
        }

        let moved = event.is_some();
        self.repository
            .update_candidate(candidate.clone(), event)
            .map_err(|err| match err {
                RepositoryError::NotFound => TalentError::not_found("candidate", id),
                other => TalentError::Store(other),
            })?;
        if moved {
            info!(candidate_id = %id, stage = %candidate.stage, "candidate stage changed");
        }
        Ok(candidate)
    }

    pub fn timeline(&self, id: &CandidateId) -> Result<Vec<TimelineEvent>, TalentError> {
        self.get(id)?;
        Ok(self.repository.timeline(id)?)
    }

    fn stage_event(&self, id: &CandidateId, stage: Stage) -> TimelineEvent {
        TimelineEvent::new(id.clone(), self.clock.now(), stage.timeline_event())
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, TalentError> {
    non_blank(value.unwrap_or_default(), field)
}

fn non_blank(value: String, field: &str) -> Result<String, TalentError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TalentError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}
