//! Bulk reset of the demo dataset.

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use tracing::warn;

use crate::clock::Clock;
use crate::error::TalentError;
use crate::seed::{seed_demo_data, SeedOptions, SeedReport};
use crate::session::{Role, SessionContext};
use crate::simulator::{RequestSimulator, WriteProfile};
use crate::store::TalentStore;
use crate::workflows::WorkflowState;

pub struct AdminService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    seed: SeedOptions,
}

impl<S> AdminService<S>
where
    S: TalentStore + 'static,
{
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self::with_seed(store, clock, SeedOptions::default())
    }

    pub fn with_seed(store: Arc<S>, clock: Arc<dyn Clock>, seed: SeedOptions) -> Self {
        Self { store, clock, seed }
    }

    /// Replaces every collection with a fresh seed. Admin sessions only. A seed that fails
    /// partway leaves the previous data in place.
    pub fn reset(&self, session: &SessionContext) -> Result<SeedReport, TalentError> {
        session.require_role(Role::Admin)?;
        let report = self
            .store
            .rebuild(|staging| seed_demo_data(staging, self.clock.as_ref(), &self.seed))?;
        warn!(user_id = %session.user_id, jobs = report.jobs, "all data replaced by admin reset");
        Ok(report)
    }
}

pub fn admin_router<S>(service: Arc<AdminService<S>>, simulator: Arc<RequestSimulator>) -> Router
where
    S: TalentStore + 'static,
{
    Router::new()
        .route("/admin/reset-data", post(reset_handler::<S>))
        .with_state(WorkflowState::new(service, simulator))
}

async fn reset_handler<S>(
    State(state): State<WorkflowState<AdminService<S>>>,
    session: SessionContext,
) -> Result<Json<SeedReport>, TalentError>
where
    S: TalentStore + 'static,
{
    let report = state
        .simulator
        .write(WriteProfile::Standard, || state.service.reset(&session))
        .await?;
    Ok(Json(report))
}
