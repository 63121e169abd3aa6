use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::domain::{Job, JobStatus};
use crate::error::TalentError;
use crate::workflows::{Page, PageRequest};

const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobSortField {
    Order,
    Title,
    Slug,
    Status,
    Salary,
    StartDate,
    EndDate,
    AssessmentDate,
}

impl FromStr for JobSortField {
    type Err = TalentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "order" => Ok(Self::Order),
            "title" => Ok(Self::Title),
            "slug" => Ok(Self::Slug),
            "status" => Ok(Self::Status),
            "salary" => Ok(Self::Salary),
            "startDate" => Ok(Self::StartDate),
            "endDate" => Ok(Self::EndDate),
            "assessmentDate" => Ok(Self::AssessmentDate),
            other => Err(TalentError::validation(format!(
                "cannot sort jobs by '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// `field:dir`, e.g. `order:asc`. Direction defaults to ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobSort {
    pub field: JobSortField,
    pub direction: SortDirection,
}

impl Default for JobSort {
    fn default() -> Self {
        Self {
            field: JobSortField::Order,
            direction: SortDirection::Asc,
        }
    }
}

impl FromStr for JobSort {
    type Err = TalentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match value.split_once(':') {
            Some((field, direction)) => (field, Some(direction)),
            None => (value, None),
        };
        let direction = match direction.map(|dir| dir.trim().to_ascii_lowercase()) {
            None => SortDirection::Asc,
            Some(dir) if dir.is_empty() || dir == "asc" => SortDirection::Asc,
            Some(dir) if dir == "desc" => SortDirection::Desc,
            Some(dir) => {
                return Err(TalentError::validation(format!(
                    "sort direction must be asc or desc, got '{dir}'"
                )))
            }
        };
        Ok(Self {
            field: field.parse()?,
            direction,
        })
    }
}

/// Who is browsing. Candidates never see postings whose application window has closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Audience {
    #[default]
    HiringTeam,
    Candidate,
}

impl FromStr for Audience {
    type Err = TalentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "hiring" | "hr" | "hr-team" | "admin" => Ok(Self::HiringTeam),
            "candidate" => Ok(Self::Candidate),
            other => Err(TalentError::validation(format!("unknown audience '{other}'"))),
        }
    }
}

/// Raw `GET /jobs` query string; every value is validated in [`JobQuery::try_from`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub sort: Option<String>,
    pub audience: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobQuery {
    pub search: Option<String>,
    pub status: Option<JobStatus>,
    pub page: PageRequest,
    pub sort: JobSort,
    pub audience: Audience,
}

impl Default for JobQuery {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            page: PageRequest {
                page: 1,
                page_size: DEFAULT_PAGE_SIZE,
            },
            sort: JobSort::default(),
            audience: Audience::HiringTeam,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl TryFrom<JobListParams> for JobQuery {
    type Error = TalentError;

    fn try_from(params: JobListParams) -> Result<Self, Self::Error> {
        let page = PageRequest::parse(
            params.page.as_deref(),
            params.page_size.as_deref(),
            DEFAULT_PAGE_SIZE,
        )?;
        Ok(Self {
            search: non_empty(params.search).map(|q| q.to_lowercase()),
            status: non_empty(params.status).map(|s| s.parse()).transpose()?,
            page,
            sort: non_empty(params.sort)
                .map(|s| s.parse())
                .transpose()?
                .unwrap_or_default(),
            audience: non_empty(params.audience)
                .map(|a| a.parse())
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

impl JobQuery {
    fn matches(&self, job: &Job, now: DateTime<Utc>) -> bool {
        if let Some(q) = &self.search {
            let hit = job.title.to_lowercase().contains(q)
                || job.slug.contains(q)
                || job.tags.iter().any(|tag| tag.to_lowercase().contains(q));
            if !hit {
                return false;
            }
        }
        if self.status.map_or(false, |status| job.status != status) {
            return false;
        }
        if self.audience == Audience::Candidate && job.application_window().has_closed(now) {
            return false;
        }
        true
    }

    /// Filters, stably sorts and pages `jobs` (expected in store order).
    pub fn apply(&self, jobs: Vec<Job>, now: DateTime<Utc>) -> Page<Job> {
        let mut jobs: Vec<Job> = jobs.into_iter().filter(|job| self.matches(job, now)).collect();
        jobs.sort_by(|a, b| {
            let ordering = compare(a, b, self.sort.field);
            match self.sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
        self.page.slice(jobs)
    }
}

fn compare(a: &Job, b: &Job, field: JobSortField) -> Ordering {
    match field {
        JobSortField::Order => a.order.cmp(&b.order),
        JobSortField::Title => a.title.cmp(&b.title),
        JobSortField::Slug => a.slug.cmp(&b.slug),
        JobSortField::Status => a.status.label().cmp(b.status.label()),
        JobSortField::Salary => match (a.salary, b.salary) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (x, y) => x.is_some().cmp(&y.is_some()),
        },
        JobSortField::StartDate => a.start_date.cmp(&b.start_date),
        JobSortField::EndDate => a.end_date.cmp(&b.end_date),
        JobSortField::AssessmentDate => a.assessment_date.cmp(&b.assessment_date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::jobs::domain::JobId;
    use chrono::{Duration, TimeZone};
    use std::collections::BTreeSet;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 10, 9, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn job(order: u32, title: &str, status: JobStatus, salary: Option<f64>) -> Job {
        Job {
            id: JobId(format!("job-{order}")),
            title: title.to_string(),
            slug: crate::workflows::jobs::domain::slugify(title),
            status,
            order,
            tags: BTreeSet::from(["Remote".to_string()]),
            description: String::new(),
            salary,
            attachments: Vec::new(),
            start_date: None,
            end_date: None,
            assessment_date: None,
            assessment_duration: None,
        }
    }

    fn board() -> Vec<Job> {
        vec![
            job(1, "Backend Engineer", JobStatus::Active, Some(120_000.0)),
            job(2, "Data Engineer", JobStatus::Archived, Some(90_000.0)),
            job(3, "Backend Lead", JobStatus::Active, Some(90_000.0)),
            job(4, "Designer", JobStatus::Active, None),
        ]
    }

    fn orders(page: &Page<Job>) -> Vec<u32> {
        page.items.iter().map(|job| job.order).collect()
    }

    #[test]
    fn parses_sort_field_and_direction() {
        let sort: JobSort = "title:desc".parse().expect("valid sort");
        assert_eq!(sort.field, JobSortField::Title);
        assert_eq!(sort.direction, SortDirection::Desc);
        assert_eq!("order".parse::<JobSort>().expect("bare field"), JobSort::default());
        assert!("order:sideways".parse::<JobSort>().is_err());
        assert!("color:asc".parse::<JobSort>().is_err());
    }

    #[test]
    fn search_covers_title_slug_and_tags() {
        let query = JobQuery {
            search: Some("backend".to_string()),
            ..JobQuery::default()
        };
        assert_eq!(orders(&query.apply(board(), now())), vec![1, 3]);

        let query = JobQuery {
            search: Some("remote".to_string()),
            ..JobQuery::default()
        };
        assert_eq!(query.apply(board(), now()).total, 4);
    }

    #[test]
    fn status_filter_and_pagination() {
        let query = JobQuery {
            status: Some(JobStatus::Active),
            page: PageRequest::new(2, 2).expect("valid page"),
            ..JobQuery::default()
        };
        let page = query.apply(board(), now());
        assert_eq!(page.total, 3);
        assert_eq!(orders(&page), vec![4]);
    }

    #[test]
    fn equal_keys_keep_store_order_in_both_directions() {
        let query = JobQuery {
            sort: "salary:asc".parse().expect("valid sort"),
            ..JobQuery::default()
        };
        assert_eq!(orders(&query.apply(board(), now())), vec![4, 2, 3, 1]);

        let query = JobQuery {
            sort: "salary:desc".parse().expect("valid sort"),
            ..JobQuery::default()
        };
        assert_eq!(orders(&query.apply(board(), now())), vec![1, 2, 3, 4]);
    }

    #[test]
    fn candidate_audience_hides_closed_windows() {
        let mut jobs = board();
        jobs[0].end_date = Some(now() - Duration::hours(1));
        jobs[2].end_date = Some(now() + Duration::hours(1));

        let hiring = JobQuery::default().apply(jobs.clone(), now());
        assert_eq!(hiring.total, 4);

        let candidate = JobQuery {
            audience: Audience::Candidate,
            ..JobQuery::default()
        };
        assert_eq!(orders(&candidate.apply(jobs, now())), vec![2, 3, 4]);
    }

    #[test]
    fn query_params_are_validated() {
        let params = JobListParams {
            status: Some("".to_string()),
            page_size: Some("5".to_string()),
            sort: Some("title:desc".to_string()),
            ..JobListParams::default()
        };
        let query = JobQuery::try_from(params).expect("valid params");
        assert_eq!(query.status, None);
        assert_eq!(query.page.page_size, 5);

        let params = JobListParams {
            status: Some("closed".to_string()),
            ..JobListParams::default()
        };
        assert!(matches!(
            JobQuery::try_from(params),
            Err(TalentError::Validation(_))
        ));
    }
}
