//! Lazy auto-rejection of applicants who let their assessment window close without
//! submitting. Evaluated on every application read; applying it twice changes nothing.

use chrono::{DateTime, Utc};

use super::domain::Application;
use super::stage::Stage;
use crate::workflows::assessments::ScoreSummary;
use crate::workflows::jobs::Job;

/// True when `application` must be force-rejected at `now`.
///
/// Only applications still in `applied` qualify; anyone the hiring team already moved
/// forward keeps their stage.
pub fn is_overdue(
    application: &Application,
    job: Option<&Job>,
    has_submission: bool,
    now: DateTime<Utc>,
) -> bool {
    if application.stage != Stage::Applied || has_submission {
        return false;
    }
    job.and_then(Job::assessment_window)
        .map_or(false, |window| window.has_closed(now))
}

/// The rejected form of an overdue application, carrying a zero score summary.
pub fn reject(mut application: Application) -> Application {
    application.stage = Stage::Rejected;
    application.score = Some(ScoreSummary::zero());
    application
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::applications::ApplicationId;
    use crate::workflows::candidates::CandidateId;
    use crate::workflows::jobs::{JobId, JobStatus};
    use chrono::{Duration, TimeZone};
    use std::collections::BTreeSet;

    fn assessment_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 1, 14, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn job(window: bool) -> Job {
        Job {
            id: JobId::from("job-1"),
            title: "QA Engineer".to_string(),
            slug: "qa-engineer".to_string(),
            status: JobStatus::Active,
            order: 1,
            tags: BTreeSet::new(),
            description: String::new(),
            salary: None,
            attachments: Vec::new(),
            start_date: None,
            end_date: None,
            assessment_date: window.then(assessment_start),
            assessment_duration: window.then_some(60),
        }
    }

    fn application(stage: Stage) -> Application {
        Application {
            id: ApplicationId::from("app-1"),
            job_id: JobId::from("job-1"),
            candidate_id: CandidateId::from("cand-1"),
            candidate_name: None,
            candidate_email: None,
            applied_at: assessment_start() - Duration::days(3),
            stage,
            score: None,
        }
    }

    #[test]
    fn rejects_only_after_window_closes() {
        let job = job(true);
        let app = application(Stage::Applied);
        let end = assessment_start() + Duration::minutes(60);

        assert!(!is_overdue(&app, Some(&job), false, assessment_start()));
        assert!(!is_overdue(&app, Some(&job), false, end));
        assert!(is_overdue(&app, Some(&job), false, end + Duration::seconds(1)));
    }

    #[test]
    fn submission_or_progress_exempts_the_application() {
        let job = job(true);
        let late = assessment_start() + Duration::days(1);

        assert!(!is_overdue(&application(Stage::Applied), Some(&job), true, late));
        assert!(!is_overdue(&application(Stage::Screen), Some(&job), false, late));
        assert!(!is_overdue(&application(Stage::Rejected), Some(&job), false, late));
    }

    #[test]
    fn jobs_without_assessment_window_never_reject() {
        let late = assessment_start() + Duration::days(30);
        assert!(!is_overdue(&application(Stage::Applied), Some(&job(false)), false, late));
        assert!(!is_overdue(&application(Stage::Applied), None, false, late));
    }

    #[test]
    fn rejection_is_a_fixed_point() {
        let job = job(true);
        let late = assessment_start() + Duration::days(1);
        let rejected = reject(application(Stage::Applied));

        assert_eq!(rejected.stage, Stage::Rejected);
        assert_eq!(rejected.score, Some(ScoreSummary::zero()));
        assert!(!is_overdue(&rejected, Some(&job), false, late));
    }
}
