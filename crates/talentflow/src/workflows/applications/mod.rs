//! Applications of candidates to jobs, the hiring stage machine and the auto-rejection
//! sweep applied on every read.

pub mod domain;
pub mod router;
pub mod service;
pub mod stage;
pub mod sweep;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationFilter, ApplicationId, ApplicationListParams, NewApplication,
    StageChange,
};
pub use router::application_router;
pub use service::ApplicationService;
pub use stage::{check_transition, Stage, Transition};
