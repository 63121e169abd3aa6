//! Business-rule engine behind the TalentFlow applicant-tracking service.
//!
//! Jobs, candidates, applications and assessments are managed by the services in
//! [`workflows`]; every service talks to the record store through the traits in [`store`]
//! and reads time from an injected [`clock::Clock`].

pub mod clock;
pub mod config;
pub mod error;
pub mod optimistic;
pub mod seed;
pub mod session;
pub mod simulator;
pub mod store;
pub mod telemetry;
pub mod workflows;
