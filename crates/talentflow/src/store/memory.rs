use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use super::{
    ApplicationRepository, AssessmentRepository, CandidateRepository, JobRepository,
    RepositoryError, SubmissionRepository, TalentStore,
};
use crate::workflows::applications::{Application, ApplicationFilter, ApplicationId};
use crate::workflows::assessments::{Assessment, Submission, SubmissionId};
use crate::workflows::candidates::{Candidate, CandidateId, TimelineEvent};
use crate::workflows::jobs::{Job, JobId, OrderAssignment};

/// Rows keyed by a string identifier, scanned in insertion order.
#[derive(Debug, Clone)]
struct Table<T> {
    rows: BTreeMap<u64, T>,
    index: HashMap<String, u64>,
    next: u64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            index: HashMap::new(),
            next: 0,
        }
    }
}

impl<T: Clone> Table<T> {
    fn get(&self, key: &str) -> Option<&T> {
        self.index.get(key).and_then(|seq| self.rows.get(seq))
    }

    fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Inserts or replaces; a replaced row keeps its scan position.
    fn put(&mut self, key: &str, row: T) {
        match self.index.get(key) {
            Some(seq) => {
                self.rows.insert(*seq, row);
            }
            None => {
                let seq = self.next;
                self.next += 1;
                self.index.insert(key.to_string(), seq);
                self.rows.insert(seq, row);
            }
        }
    }

    fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Debug, Clone, Default)]
struct Tables {
    jobs: Table<Job>,
    candidates: Table<Candidate>,
    timeline: Table<TimelineEvent>,
    applications: Table<Application>,
    assessments: Table<Assessment>,
    submissions: Table<Submission>,
}

#[derive(Debug, Default)]
struct Inner {
    tables: Tables,
    /// Row writes allowed before every further write fails; `None` means unlimited.
    write_budget: Option<usize>,
}

/// Working copy handed to a transaction body. Each row write is charged against the
/// fault budget.
struct Tx<'a> {
    tables: &'a mut Tables,
    budget: &'a mut Option<usize>,
}

impl Tx<'_> {
    fn charge(&mut self, table: &str) -> Result<(), RepositoryError> {
        match &mut *self.budget {
            Some(0) => Err(RepositoryError::WriteFailed(format!(
                "injected fault writing {table}"
            ))),
            Some(remaining) => {
                *remaining -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn put_job(&mut self, job: Job) -> Result<(), RepositoryError> {
        self.charge("jobs")?;
        let key = job.id.as_str().to_string();
        self.tables.jobs.put(&key, job);
        Ok(())
    }

    fn put_candidate(&mut self, candidate: Candidate) -> Result<(), RepositoryError> {
        self.charge("candidates")?;
        let key = candidate.id.as_str().to_string();
        self.tables.candidates.put(&key, candidate);
        Ok(())
    }

    fn push_event(&mut self, event: TimelineEvent) -> Result<(), RepositoryError> {
        self.charge("timeline")?;
        let key = event.id.as_str().to_string();
        self.tables.timeline.put(&key, event);
        Ok(())
    }

    fn put_application(&mut self, application: Application) -> Result<(), RepositoryError> {
        self.charge("applications")?;
        let key = application.id.as_str().to_string();
        self.tables.applications.put(&key, application);
        Ok(())
    }
}

/// In-process record store. Writes run against a copy of the tables that replaces the
/// live state only when the whole transaction succeeds.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lets `writes` more row writes succeed, then fails every write until cleared.
    pub fn fail_writes_after(&self, writes: usize) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.write_budget = Some(writes);
        }
    }

    pub fn clear_write_faults(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.write_budget = None;
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, RepositoryError> {
        self.inner
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
    }

    fn read<R>(&self, op: impl FnOnce(&Tables) -> R) -> Result<R, RepositoryError> {
        let inner = self.lock()?;
        Ok(op(&inner.tables))
    }

    fn transaction<R>(
        &self,
        op: impl FnOnce(&mut Tx<'_>) -> Result<R, RepositoryError>,
    ) -> Result<R, RepositoryError> {
        let mut inner = self.lock()?;
        let mut working = inner.tables.clone();
        let mut budget = inner.write_budget;
        let outcome = op(&mut Tx {
            tables: &mut working,
            budget: &mut budget,
        });
        inner.write_budget = budget;
        let value = outcome?;
        inner.tables = working;
        Ok(value)
    }
}

impl JobRepository for MemoryStore {
    fn insert_job(&self, mut job: Job) -> Result<Job, RepositoryError> {
        self.transaction(|tx| {
            let taken = tx.tables.jobs.contains(job.id.as_str())
                || tx.tables.jobs.values().any(|existing| existing.slug == job.slug);
            if taken {
                return Err(RepositoryError::Conflict);
            }
            job.order = u32::try_from(tx.tables.jobs.len() + 1)
                .map_err(|_| RepositoryError::WriteFailed("job order overflow".to_string()))?;
            tx.put_job(job.clone())?;
            Ok(job)
        })
    }

    fn update_job(&self, job: Job) -> Result<(), RepositoryError> {
        self.transaction(|tx| {
            if !tx.tables.jobs.contains(job.id.as_str()) {
                return Err(RepositoryError::NotFound);
            }
            let slug_taken = tx
                .tables
                .jobs
                .values()
                .any(|existing| existing.slug == job.slug && existing.id != job.id);
            if slug_taken {
                return Err(RepositoryError::Conflict);
            }
            tx.put_job(job)
        })
    }

    fn fetch_job(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        self.read(|tables| tables.jobs.get(id.as_str()).cloned())
    }

    fn find_job_by_slug(&self, slug: &str) -> Result<Option<Job>, RepositoryError> {
        self.read(|tables| tables.jobs.values().find(|job| job.slug == slug).cloned())
    }

    fn jobs(&self) -> Result<Vec<Job>, RepositoryError> {
        self.read(|tables| {
            let mut jobs: Vec<Job> = tables.jobs.values().cloned().collect();
            jobs.sort_by_key(|job| job.order);
            jobs
        })
    }

    fn count_jobs(&self) -> Result<usize, RepositoryError> {
        self.read(|tables| tables.jobs.len())
    }

    fn renumber_jobs(&self, assignments: &[OrderAssignment]) -> Result<(), RepositoryError> {
        self.transaction(|tx| {
            for assignment in assignments {
                let mut job = tx
                    .tables
                    .jobs
                    .get(assignment.job_id.as_str())
                    .cloned()
                    .ok_or(RepositoryError::NotFound)?;
                if job.order == assignment.order {
                    continue;
                }
                job.order = assignment.order;
                tx.put_job(job)?;
            }
            Ok(())
        })
    }
}

impl CandidateRepository for MemoryStore {
    fn insert_candidate(
        &self,
        candidate: Candidate,
        event: TimelineEvent,
    ) -> Result<Candidate, RepositoryError> {
        self.transaction(|tx| {
            if tx.tables.candidates.contains(candidate.id.as_str()) {
                return Err(RepositoryError::Conflict);
            }
            tx.put_candidate(candidate.clone())?;
            tx.push_event(event)?;
            Ok(candidate)
        })
    }

    fn update_candidate(
        &self,
        candidate: Candidate,
        event: Option<TimelineEvent>,
    ) -> Result<(), RepositoryError> {
        self.transaction(|tx| {
            if !tx.tables.candidates.contains(candidate.id.as_str()) {
                return Err(RepositoryError::NotFound);
            }
            tx.put_candidate(candidate)?;
            if let Some(event) = event {
                tx.push_event(event)?;
            }
            Ok(())
        })
    }

    fn fetch_candidate(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        self.read(|tables| tables.candidates.get(id.as_str()).cloned())
    }

    fn candidates(&self) -> Result<Vec<Candidate>, RepositoryError> {
        self.read(|tables| tables.candidates.values().cloned().collect())
    }

    fn timeline(&self, candidate_id: &CandidateId) -> Result<Vec<TimelineEvent>, RepositoryError> {
        self.read(|tables| {
            let mut events: Vec<TimelineEvent> = tables
                .timeline
                .values()
                .filter(|event| &event.candidate_id == candidate_id)
                .cloned()
                .collect();
            events.sort_by_key(|event| event.at);
            events
        })
    }
}

impl ApplicationRepository for MemoryStore {
    fn insert_application(
        &self,
        application: Application,
        event: TimelineEvent,
    ) -> Result<Application, RepositoryError> {
        self.transaction(|tx| {
            let duplicate = tx.tables.applications.values().any(|existing| {
                existing.job_id == application.job_id
                    && existing.candidate_id == application.candidate_id
            });
            if duplicate || tx.tables.applications.contains(application.id.as_str()) {
                return Err(RepositoryError::Conflict);
            }
            tx.put_application(application.clone())?;
            tx.push_event(event)?;
            Ok(application)
        })
    }

    fn update_application(
        &self,
        application: Application,
        event: Option<TimelineEvent>,
    ) -> Result<(), RepositoryError> {
        self.transaction(|tx| {
            if !tx.tables.applications.contains(application.id.as_str()) {
                return Err(RepositoryError::NotFound);
            }
            tx.put_application(application)?;
            if let Some(event) = event {
                tx.push_event(event)?;
            }
            Ok(())
        })
    }

    fn fetch_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, RepositoryError> {
        self.read(|tables| tables.applications.get(id.as_str()).cloned())
    }

    fn applications(&self, filter: &ApplicationFilter) -> Result<Vec<Application>, RepositoryError> {
        self.read(|tables| {
            tables
                .applications
                .values()
                .filter(|app| filter.matches(app))
                .cloned()
                .collect()
        })
    }
}

impl AssessmentRepository for MemoryStore {
    fn fetch_assessment(&self, job_id: &JobId) -> Result<Option<Assessment>, RepositoryError> {
        self.read(|tables| tables.assessments.get(job_id.as_str()).cloned())
    }

    fn put_assessment(&self, assessment: Assessment) -> Result<(), RepositoryError> {
        self.transaction(|tx| {
            tx.charge("assessments")?;
            let key = assessment.job_id.as_str().to_string();
            tx.tables.assessments.put(&key, assessment);
            Ok(())
        })
    }
}

impl SubmissionRepository for MemoryStore {
    fn insert_submission(&self, submission: Submission) -> Result<Submission, RepositoryError> {
        self.transaction(|tx| {
            let duplicate = tx.tables.submissions.values().any(|existing| {
                existing.job_id == submission.job_id
                    && existing.candidate_id == submission.candidate_id
            });
            if duplicate {
                return Err(RepositoryError::Conflict);
            }
            tx.charge("submissions")?;
            let key = submission.id.as_str().to_string();
            tx.tables.submissions.put(&key, submission.clone());
            let scored = tx
                .tables
                .applications
                .values()
                .find(|app| {
                    app.job_id == submission.job_id && app.candidate_id == submission.candidate_id
                })
                .cloned();
            if let Some(mut application) = scored {
                application.score = Some(submission.score);
                tx.put_application(application)?;
            }
            Ok(submission)
        })
    }

    fn fetch_submission(&self, id: &SubmissionId) -> Result<Option<Submission>, RepositoryError> {
        self.read(|tables| tables.submissions.get(id.as_str()).cloned())
    }

    fn find_submission(
        &self,
        job_id: &JobId,
        candidate_id: &CandidateId,
    ) -> Result<Option<Submission>, RepositoryError> {
        self.read(|tables| {
            tables
                .submissions
                .values()
                .find(|sub| &sub.job_id == job_id && &sub.candidate_id == candidate_id)
                .cloned()
        })
    }
}

impl TalentStore for MemoryStore {
    fn rebuild<T, E, F>(&self, build: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        let mut inner = self.lock()?;
        let staging = MemoryStore {
            inner: Mutex::new(Inner {
                tables: Tables::default(),
                write_budget: inner.write_budget,
            }),
        };
        let outcome = build(&staging);
        let staged = staging
            .inner
            .into_inner()
            .map_err(|_| RepositoryError::Unavailable("staging mutex poisoned".to_string()))?;
        inner.write_budget = staged.write_budget;
        let value = outcome?;
        inner.tables = staged.tables;
        Ok(value)
    }
}
