//! Candidate records and their chronological timeline.

pub mod domain;
pub mod router;
pub mod service;

pub use domain::{
    Candidate, CandidateId, CandidateListParams, CandidatePatch, CandidateQuery, EventId,
    NewCandidate, TimelineEvent,
};
pub use router::candidate_router;
pub use service::{CandidateService, APPLIED_EVENT};
