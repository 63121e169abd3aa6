//! Deterministic demo data for an empty store.

use chrono::Duration;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::info;

use crate::clock::Clock;
use crate::error::TalentError;
use crate::store::TalentStore;
use crate::workflows::applications::Stage;
use crate::workflows::assessments::{
    Assessment, Marking, Question, QuestionId, QuestionKind, Section, SectionId,
};
use crate::workflows::candidates::{Candidate, CandidateId, TimelineEvent};
use crate::workflows::jobs::{slugify, Job, JobId, JobStatus};

const JOB_COUNT: usize = 25;
const ASSESSED_JOBS: usize = 3;
const ARCHIVED_SHARE: f64 = 0.2;

const SPECIALTIES: &[&str] = &[
    "Frontend", "Backend", "Fullstack", "Data", "DevOps", "Cloud", "SRE", "Platform",
    "Machine Learning", "Analytics", "Mobile", "Embedded", "Security", "QA", "UX", "Systems",
];
const TAGS: &[&str] = &["Remote", "Hybrid", "Onsite", "Full-time", "Contract"];
const FIRST_NAMES: &[&str] = &[
    "Alex", "Sam", "Jordan", "Taylor", "Casey", "Morgan", "Riley", "Noah", "Emma", "Priya",
    "Mateo", "Aisha", "Kenji", "Olga", "Tariq", "Ines", "Quinn", "Rowan",
];
const LAST_NAMES: &[&str] = &[
    "Smith", "Patel", "Garcia", "Nguyen", "Kim", "Silva", "Rossi", "Dubois", "Sato", "Khan",
    "Okafor", "Larsen", "Haddad", "Novak",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedOptions {
    pub candidates: usize,
    pub rng_seed: u64,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            candidates: 200,
            rng_seed: 0x7a1e_f10e,
        }
    }
}

/// What a seeding run wrote; all zero when the store already held jobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub jobs: usize,
    pub archived_jobs: usize,
    pub candidates: usize,
    pub assessments: usize,
}

/// Fills an empty store with jobs, candidates and a few assessments.
pub fn seed_demo_data<S>(
    store: &S,
    clock: &dyn Clock,
    options: &SeedOptions,
) -> Result<SeedReport, TalentError>
where
    S: TalentStore + ?Sized,
{
    if store.count_jobs()? > 0 {
        return Ok(SeedReport::default());
    }

    let mut rng = StdRng::seed_from_u64(options.rng_seed);
    let now = clock.now();
    let mut report = SeedReport::default();
    let mut jobs = Vec::with_capacity(JOB_COUNT);

    for index in 1..=JOB_COUNT {
        let specialty = SPECIALTIES.choose(&mut rng).copied().unwrap_or("Software");
        let title = format!("Job {index} - {specialty} Engineer");
        let status = if rng.gen_bool(ARCHIVED_SHARE) {
            JobStatus::Archived
        } else {
            JobStatus::Active
        };
        let job = Job {
            id: JobId::generate(),
            slug: format!("{}-{index}", slugify(&title)),
            title,
            status,
            order: u32::try_from(index).unwrap_or(u32::MAX),
            tags: TAGS
                .choose(&mut rng)
                .map(|tag| tag.to_string())
                .into_iter()
                .collect(),
            description: "Join a team that ships dependable software every week.".to_string(),
            salary: Some(f64::from(80_000 + rng.gen_range(0..70_000))),
            attachments: Vec::new(),
            start_date: Some(now + Duration::days(1)),
            end_date: Some(now + Duration::days(7)),
            assessment_date: Some(now + Duration::days(9)),
            assessment_duration: Some(45),
        };
        if status == JobStatus::Archived {
            report.archived_jobs += 1;
        }
        jobs.push(store.insert_job(job)?);
        report.jobs += 1;
    }

    for index in 0..options.candidates {
        let first = FIRST_NAMES.choose(&mut rng).copied().unwrap_or("Casey");
        let last = LAST_NAMES.choose(&mut rng).copied().unwrap_or("Doe");
        let stage = Stage::ALL.choose(&mut rng).copied().unwrap_or_default();
        let candidate = Candidate {
            id: CandidateId::generate(),
            name: format!("{first} {last}"),
            email: format!(
                "{}.{}{index}@example.com",
                first.to_lowercase(),
                last.to_lowercase()
            ),
            stage,
            job_id: jobs.choose(&mut rng).map(|job| job.id.clone()),
        };
        let event = TimelineEvent::new(candidate.id.clone(), now, stage.timeline_event());
        store.insert_candidate(candidate, event)?;
        report.candidates += 1;
    }

    for job in jobs.iter().take(ASSESSED_JOBS) {
        store.put_assessment(fundamentals_assessment(job.id.clone()))?;
        report.assessments += 1;
    }

    info!(
        jobs = report.jobs,
        archived = report.archived_jobs,
        candidates = report.candidates,
        assessments = report.assessments,
        "seeded demo data"
    );
    Ok(report)
}

fn question(label: &str, kind: QuestionKind, marks_correct: f64, marks_incorrect: f64) -> Question {
    Question {
        id: QuestionId::generate(),
        label: label.to_string(),
        required: true,
        kind,
        marking: Marking {
            has_marks: true,
            marks_correct,
            marks_incorrect,
        },
    }
}

fn options(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// Data-structures screening test: single choice, multi select and numeric sections.
pub fn fundamentals_assessment(job_id: JobId) -> Assessment {
    let single = |label: &str, choices: &[&str], key: &str| {
        question(
            label,
            QuestionKind::SingleChoice {
                options: options(choices),
                correct_option: Some(key.to_string()),
            },
            2.0,
            -0.5,
        )
    };
    let multi = |label: &str, choices: &[&str], keys: &[&str]| {
        question(
            label,
            QuestionKind::MultiChoice {
                options: options(choices),
                correct_options: Some(options(keys)),
            },
            4.0,
            0.0,
        )
    };
    let numeric = |label: &str, value: f64| {
        question(
            label,
            QuestionKind::Numeric {
                min: Some(0.0),
                max: None,
                correct_value: Some(value),
            },
            3.0,
            0.0,
        )
    };

    Assessment {
        job_id,
        sections: vec![
            Section {
                id: SectionId::generate(),
                title: "Single choice".to_string(),
                questions: vec![
                    single(
                        "Lookup cost in a balanced binary search tree of n keys?",
                        &["O(1)", "O(log n)", "O(n)", "O(n log n)"],
                        "O(log n)",
                    ),
                    single(
                        "Which structure serves items first-in, first-out?",
                        &["Stack", "Queue", "Heap", "Trie"],
                        "Queue",
                    ),
                    single(
                        "Which traversal visits the root before both subtrees?",
                        &["In-order", "Pre-order", "Post-order", "Level-order"],
                        "Pre-order",
                    ),
                ],
            },
            Section {
                id: SectionId::generate(),
                title: "Multiple select".to_string(),
                questions: vec![
                    multi(
                        "Which structures can back a priority queue?",
                        &["Linked list", "Stack", "Binary heap", "Balanced BST"],
                        &["Binary heap", "Balanced BST"],
                    ),
                    multi(
                        "Which sorts are stable?",
                        &["Merge sort", "Heap sort", "Insertion sort", "Quick sort"],
                        &["Merge sort", "Insertion sort"],
                    ),
                ],
            },
            Section {
                id: SectionId::generate(),
                title: "Numeric".to_string(),
                questions: vec![
                    numeric("Edges in a complete undirected graph on 6 vertices?", 15.0),
                    numeric("Maximum nodes in a binary tree of height 3 (root at 0)?", 15.0),
                ],
            },
        ],
    }
}
