use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use talentflow::clock::Clock;
use talentflow::config::{AppConfig, SeedConfig};
use talentflow::error::AppError;
use talentflow::seed::{seed_demo_data, SeedOptions};
use talentflow::simulator::RequestSimulator;
use talentflow::store::MemoryStore;
use talentflow::workflows::TalentServices;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn seed_options(config: &SeedConfig) -> SeedOptions {
    SeedOptions {
        candidates: config.candidates,
        ..SeedOptions::default()
    }
}

/// Wires the in-memory store and every workflow service, seeding first when asked to.
pub(crate) fn build_services(
    config: &AppConfig,
    clock: Arc<dyn Clock>,
    seed_on_start: bool,
) -> Result<TalentServices<MemoryStore>, AppError> {
    let store = Arc::new(MemoryStore::new());
    let options = seed_options(&config.seed);

    if seed_on_start {
        let report = seed_demo_data(store.as_ref(), clock.as_ref(), &options)?;
        info!(jobs = report.jobs, candidates = report.candidates, "store seeded on start");
    }

    let simulator = Arc::new(RequestSimulator::new(config.simulator.clone()));
    if simulator.config().enabled {
        info!(
            latency_min_ms = simulator.config().latency_min_ms,
            latency_max_ms = simulator.config().latency_max_ms,
            "request simulator enabled"
        );
    }

    Ok(TalentServices::with_seed(store, clock, simulator, options))
}
