//! Per-job assessments, their scoring engine and candidate submissions.

pub mod domain;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Answer, Answers, Assessment, Marking, Question, QuestionId, QuestionKind, ScoreSummary,
    Section, SectionId, Submission, SubmissionId, SubmitRequest,
};
pub use router::assessment_router;
pub use scoring::{score, Correctness, GradedQuestion, ScoringOutcome};
pub use service::AssessmentService;
