//! Job postings: creation with slug derivation, the start-date edit lock, filtered listing and
//! drag-to-reorder on the job board.

pub mod domain;
pub mod listing;
pub mod ordering;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{slugify, Attachment, Job, JobId, JobPatch, JobStatus, NewJob};
pub use listing::{Audience, JobListParams, JobQuery, JobSort, JobSortField, SortDirection};
pub use ordering::{reposition, OrderAssignment, ReorderRequest};
pub use router::job_router;
pub use service::JobService;
