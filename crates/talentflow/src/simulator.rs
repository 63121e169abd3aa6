//! Artificial latency and failure injection placed in front of every request.
//!
//! Reads are only delayed. Writes are delayed and then fail with
//! [`TalentError::TransientServer`] at the configured rate; a failed write never reaches
//! the record store.

use std::ops::RangeInclusive;
use std::sync::Mutex;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::config::SimulatorConfig;
use crate::error::TalentError;

/// Failure profile of a mutating request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteProfile {
    Standard,
    /// Job reordering, which fails more often so the optimistic rollback path gets exercised.
    Reorder,
}

#[derive(Debug)]
pub struct RequestSimulator {
    config: SimulatorConfig,
    rng: Mutex<StdRng>,
}

impl RequestSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self {
            config,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic draws, for tests that need a reproducible failure sequence.
    pub fn seeded(config: SimulatorConfig, seed: u64) -> Self {
        Self {
            config,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn disabled() -> Self {
        Self::new(SimulatorConfig::disabled())
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub async fn read<T>(&self, op: impl FnOnce() -> T) -> T {
        self.delay().await;
        op()
    }

    pub async fn write<T>(
        &self,
        profile: WriteProfile,
        op: impl FnOnce() -> Result<T, TalentError>,
    ) -> Result<T, TalentError> {
        self.delay().await;
        if self.roll_failure(profile) {
            warn!(?profile, "simulated write failure");
            return Err(TalentError::TransientServer);
        }
        op()
    }

    async fn delay(&self) {
        if let Some(latency) = self.draw_latency() {
            debug!(latency_ms = latency.as_millis() as u64, "simulated latency");
            tokio::time::sleep(latency).await;
        }
    }

    fn draw_latency(&self) -> Option<Duration> {
        if !self.config.enabled || self.config.latency_max_ms == 0 {
            return None;
        }
        let range: RangeInclusive<u64> = self.config.latency_min_ms..=self.config.latency_max_ms;
        let millis = match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(range),
            Err(_) => self.config.latency_min_ms,
        };
        Some(Duration::from_millis(millis))
    }

    fn roll_failure(&self, profile: WriteProfile) -> bool {
        if !self.config.enabled {
            return false;
        }
        let rate = match profile {
            WriteProfile::Standard => self.config.write_failure_rate,
            WriteProfile::Reorder => self.config.reorder_failure_rate,
        };
        if rate <= 0.0 {
            return false;
        }
        match self.rng.lock() {
            Ok(mut rng) => rng.gen_bool(rate.min(1.0)),
            Err(_) => false,
        }
    }
}
