use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::clock::TimeWindow;
use crate::error::TalentError;

string_id!(
    /// Identifier of a job posting.
    JobId
);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Active,
    Archived,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for JobStatus {
    type Err = TalentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(JobStatus::Active),
            "archived" => Ok(JobStatus::Archived),
            other => Err(TalentError::validation(format!(
                "status must be active or archived, got '{other}'"
            ))),
        }
    }
}

/// Upload metadata only; file contents live outside the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub name: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
}

/// A job posting as persisted in the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub slug: String,
    pub status: JobStatus,
    pub order: u32,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub salary: Option<f64>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assessment_date: Option<DateTime<Utc>>,
    /// Minutes.
    #[serde(default)]
    pub assessment_duration: Option<u32>,
}

impl Job {
    /// Content fields freeze once the application window has opened.
    pub fn is_locked_at(&self, now: DateTime<Utc>) -> bool {
        self.start_date.map_or(false, |start| start <= now)
    }

    pub fn application_window(&self) -> TimeWindow {
        TimeWindow::new(self.start_date, self.end_date)
    }

    /// `[assessmentDate, assessmentDate + assessmentDuration]`, when both are set.
    pub fn assessment_window(&self) -> Option<TimeWindow> {
        let start = self.assessment_date?;
        let minutes = self.assessment_duration?;
        Some(TimeWindow::new(
            Some(start),
            Some(start + Duration::minutes(i64::from(minutes))),
        ))
    }
}

/// Body of `POST /jobs`. Title is optional here so a missing one surfaces as a
/// validation error instead of a decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewJob {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub status: Option<JobStatus>,
    pub tags: BTreeSet<String>,
    pub description: Option<String>,
    pub salary: Option<f64>,
    pub attachments: Vec<Attachment>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub assessment_date: Option<DateTime<Utc>>,
    pub assessment_duration: Option<u32>,
}

impl NewJob {
    pub fn titled(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            ..Self::default()
        }
    }
}

/// Body of `PATCH /jobs/:id`. Nullable fields use `Option<Option<_>>` so that an explicit
/// `null` clears the value while an absent key leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub tags: Option<BTreeSet<String>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub salary: Option<Option<f64>>,
    #[serde(default)]
    pub attachments: Option<Vec<Attachment>>,
    #[serde(default, deserialize_with = "present")]
    pub start_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "present")]
    pub end_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "present")]
    pub assessment_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "present")]
    pub assessment_duration: Option<Option<u32>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl JobPatch {
    pub fn archive() -> Self {
        Self {
            status: Some(JobStatus::Archived),
            ..Self::default()
        }
    }

    /// Names of the content fields this patch touches; these are frozen after start.
    pub fn locked_fields(&self) -> Vec<&'static str> {
        let touched = [
            ("title", self.title.is_some()),
            ("description", self.description.is_some()),
            ("salary", self.salary.is_some()),
            ("attachments", self.attachments.is_some()),
            ("startDate", self.start_date.is_some()),
            ("endDate", self.end_date.is_some()),
            ("assessmentDate", self.assessment_date.is_some()),
            ("assessmentDuration", self.assessment_duration.is_some()),
        ];
        touched
            .into_iter()
            .filter_map(|(name, is_set)| is_set.then_some(name))
            .collect()
    }

    /// Applies every present field onto `job`. Slug resolution happens in the service.
    pub(crate) fn apply_to(self, job: &mut Job) {
        if let Some(title) = self.title {
            job.title = title.trim().to_string();
        }
        if let Some(status) = self.status {
            job.status = status;
        }
        if let Some(tags) = self.tags {
            job.tags = tags;
        }
        if let Some(description) = self.description {
            job.description = description;
        }
        if let Some(salary) = self.salary {
            job.salary = salary;
        }
        if let Some(attachments) = self.attachments {
            job.attachments = attachments;
        }
        if let Some(start_date) = self.start_date {
            job.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            job.end_date = end_date;
        }
        if let Some(assessment_date) = self.assessment_date {
            job.assessment_date = assessment_date;
        }
        if let Some(assessment_duration) = self.assessment_duration {
            job.assessment_duration = assessment_duration;
        }
    }
}

/// Lowercase, non-alphanumeric runs collapsed to `-`, no leading or trailing dash.
pub fn slugify(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut pending_dash = false;
    for ch in raw.chars() {
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }
    slug
}

pub(crate) fn validate_schedule(job: &Job) -> Result<(), TalentError> {
    if let (Some(start), Some(end)) = (job.start_date, job.end_date) {
        if end < start {
            return Err(TalentError::validation("endDate must not precede startDate"));
        }
    }
    if job.assessment_duration == Some(0) {
        return Err(TalentError::validation(
            "assessmentDuration must be a positive number of minutes",
        ));
    }
    if let Some(salary) = job.salary {
        if !salary.is_finite() || salary < 0.0 {
            return Err(TalentError::validation("salary must be a non-negative number"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Backend Engineer"), "backend-engineer");
        assert_eq!(slugify("  Job 3 - Data / ML Engineer!  "), "job-3-data-ml-engineer");
        assert_eq!(slugify("C++ & Rust"), "c-rust");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn patch_distinguishes_null_from_absent() {
        let patch: JobPatch =
            serde_json::from_str(r#"{"salary": null, "status": "archived"}"#).expect("decodes");
        assert_eq!(patch.salary, Some(None));
        assert_eq!(patch.start_date, None);
        assert_eq!(patch.locked_fields(), vec!["salary"]);
    }

    #[test]
    fn status_and_tags_are_not_locked_fields() {
        let patch: JobPatch =
            serde_json::from_str(r#"{"status": "archived", "tags": ["Remote"], "slug": "x"}"#)
                .expect("decodes");
        assert!(patch.locked_fields().is_empty());
    }

    #[test]
    fn assessment_window_requires_date_and_duration() {
        let mut job = Job {
            id: JobId::from("job-1"),
            title: "Backend Engineer".to_string(),
            slug: "backend-engineer".to_string(),
            status: JobStatus::Active,
            order: 1,
            tags: BTreeSet::new(),
            description: String::new(),
            salary: None,
            attachments: Vec::new(),
            start_date: Some(at(1)),
            end_date: Some(at(7)),
            assessment_date: Some(at(9)),
            assessment_duration: None,
        };
        assert!(job.assessment_window().is_none());

        job.assessment_duration = Some(45);
        let window = job.assessment_window().expect("window defined");
        assert_eq!(window.end, Some(at(9) + Duration::minutes(45)));
        assert!(job.is_locked_at(at(1)));
        assert!(!job.is_locked_at(at(1) - Duration::seconds(1)));
    }
}
