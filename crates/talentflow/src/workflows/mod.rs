/// Declares a string-backed identifier with a random v4 constructor.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        pub struct $name(pub String);

        impl $name {
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

pub mod admin;
pub mod applications;
pub mod assessments;
pub mod candidates;
pub mod jobs;
mod paging;

pub use paging::{Page, PageRequest};

use std::sync::Arc;

use axum::Router;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::clock::Clock;
use crate::error::TalentError;
use crate::seed::SeedOptions;
use crate::simulator::RequestSimulator;
use crate::store::TalentStore;

use admin::{admin_router, AdminService};
use applications::{application_router, ApplicationService};
use assessments::{assessment_router, AssessmentService};
use candidates::{candidate_router, CandidateService};
use jobs::{job_router, JobService};

/// Router state shared by one workflow's handlers.
pub struct WorkflowState<T> {
    pub service: Arc<T>,
    pub simulator: Arc<RequestSimulator>,
}

impl<T> WorkflowState<T> {
    pub fn new(service: Arc<T>, simulator: Arc<RequestSimulator>) -> Self {
        Self { service, simulator }
    }
}

impl<T> Clone for WorkflowState<T> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            simulator: self.simulator.clone(),
        }
    }
}

/// Decodes a JSON body so that shape errors surface as validation failures (400).
pub(crate) fn decode_body<T: DeserializeOwned>(body: Value) -> Result<T, TalentError> {
    serde_json::from_value(body)
        .map_err(|err| TalentError::validation(format!("invalid request body: {err}")))
}

/// Every service wired against one store, clock and simulator.
pub struct TalentServices<S> {
    pub jobs: Arc<JobService<S>>,
    pub candidates: Arc<CandidateService<S>>,
    pub applications: Arc<ApplicationService<S>>,
    pub assessments: Arc<AssessmentService<S>>,
    pub admin: Arc<AdminService<S>>,
    pub simulator: Arc<RequestSimulator>,
}

impl<S> Clone for TalentServices<S> {
    fn clone(&self) -> Self {
        Self {
            jobs: self.jobs.clone(),
            candidates: self.candidates.clone(),
            applications: self.applications.clone(),
            assessments: self.assessments.clone(),
            admin: self.admin.clone(),
            simulator: self.simulator.clone(),
        }
    }
}

impl<S> TalentServices<S>
where
    S: TalentStore + 'static,
{
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, simulator: Arc<RequestSimulator>) -> Self {
        Self::with_seed(store, clock, simulator, SeedOptions::default())
    }

    /// Like [`TalentServices::new`], with the dataset the admin reset reseeds.
    pub fn with_seed(
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        simulator: Arc<RequestSimulator>,
        seed: SeedOptions,
    ) -> Self {
        Self {
            jobs: Arc::new(JobService::new(store.clone(), clock.clone())),
            candidates: Arc::new(CandidateService::new(store.clone(), clock.clone())),
            applications: Arc::new(ApplicationService::new(store.clone(), clock.clone())),
            assessments: Arc::new(AssessmentService::new(store.clone(), clock.clone())),
            admin: Arc::new(AdminService::with_seed(store, clock, seed)),
            simulator,
        }
    }
}

/// Full request surface: jobs, candidates, applications, assessments and admin.
pub fn talent_router<S>(services: TalentServices<S>) -> Router
where
    S: TalentStore + 'static,
{
    let simulator = services.simulator;
    Router::new()
        .merge(job_router(services.jobs, simulator.clone()))
        .merge(candidate_router(services.candidates, simulator.clone()))
        .merge(application_router(services.applications, simulator.clone()))
        .merge(assessment_router(services.assessments, simulator.clone()))
        .merge(admin_router(services.admin, simulator))
}
