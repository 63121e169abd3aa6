use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TalentError;
use crate::workflows::candidates::CandidateId;
use crate::workflows::jobs::JobId;

string_id!(QuestionId);
string_id!(SectionId);
string_id!(
    /// Identifier of a scored assessment submission.
    SubmissionId
);

/// One assessment per job: ordered sections of ordered questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub job_id: JobId,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Assessment {
    pub fn empty(job_id: JobId) -> Self {
        Self {
            job_id,
            sections: Vec::new(),
        }
    }

    /// Questions across all sections in display order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.sections
            .iter()
            .flat_map(|section| section.questions.iter())
    }

    /// Structural checks applied before a definition replaces the stored one.
    pub fn validate(&self) -> Result<(), TalentError> {
        let mut seen = HashSet::new();
        for question in self.questions() {
            if !seen.insert(question.id.as_str()) {
                return Err(TalentError::validation(format!(
                    "question id '{}' is used more than once",
                    question.id
                )));
            }
            question.kind.validate(&question.id)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(flatten)]
    pub kind: QuestionKind,
    #[serde(flatten)]
    pub marking: Marking,
}

/// Type-specific constraints and, for markable types, the optional answer key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum QuestionKind {
    #[serde(rename_all = "camelCase")]
    ShortText {
        #[serde(default)]
        max_length: Option<usize>,
    },
    #[serde(rename_all = "camelCase")]
    LongText {
        #[serde(default)]
        max_length: Option<usize>,
    },
    #[serde(rename_all = "camelCase")]
    SingleChoice {
        #[serde(default)]
        options: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        correct_option: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    MultiChoice {
        #[serde(default)]
        options: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        correct_options: Option<Vec<String>>,
    },
    #[serde(rename_all = "camelCase")]
    Numeric {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        correct_value: Option<f64>,
    },
    File,
}

impl QuestionKind {
    /// Types that can carry an answer key.
    pub fn supports_answer_key(&self) -> bool {
        matches!(
            self,
            QuestionKind::SingleChoice { .. }
                | QuestionKind::MultiChoice { .. }
                | QuestionKind::Numeric { .. }
        )
    }

    fn validate(&self, id: &QuestionId) -> Result<(), TalentError> {
        match self {
            QuestionKind::SingleChoice {
                options,
                correct_option: Some(key),
            } if !options.contains(key) => Err(TalentError::validation(format!(
                "question '{id}' answer key '{key}' is not one of its options"
            ))),
            QuestionKind::MultiChoice {
                options,
                correct_options: Some(keys),
            } => match keys.iter().find(|key| !options.contains(key)) {
                Some(key) => Err(TalentError::validation(format!(
                    "question '{id}' answer key '{key}' is not one of its options"
                ))),
                None => Ok(()),
            },
            QuestionKind::Numeric {
                min: Some(min),
                max: Some(max),
                ..
            } if min > max => Err(TalentError::validation(format!(
                "question '{id}' has min greater than max"
            ))),
            _ => Ok(()),
        }
    }
}

/// Point metadata. `marks_incorrect` may be zero or negative (penalty).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marking {
    #[serde(default)]
    pub has_marks: bool,
    #[serde(default)]
    pub marks_correct: f64,
    #[serde(default)]
    pub marks_incorrect: f64,
}

/// A candidate's answer to one question, as submitted by the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Blank,
    Number(f64),
    Text(String),
    Choices(Vec<String>),
    /// File metadata and anything else the form posts.
    Other(Value),
}

impl Answer {
    pub fn text(value: &str) -> Self {
        Answer::Text(value.to_string())
    }

    pub fn choices(values: &[&str]) -> Self {
        Answer::Choices(values.iter().map(|value| value.to_string()).collect())
    }

    /// Absent-equivalent: null, empty or whitespace-only text, an empty collection.
    pub fn is_blank(&self) -> bool {
        match self {
            Answer::Blank => true,
            Answer::Number(_) => false,
            Answer::Text(text) => text.trim().is_empty(),
            Answer::Choices(values) => values.is_empty(),
            Answer::Other(Value::Null) => true,
            Answer::Other(Value::Object(map)) => map.is_empty(),
            Answer::Other(Value::Array(items)) => items.is_empty(),
            Answer::Other(_) => false,
        }
    }
}

pub type Answers = BTreeMap<String, Answer>;

/// Counts and mark total produced by scoring one submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub attempted: u32,
    pub correct: u32,
    pub incorrect: u32,
    pub skipped: u32,
    pub marks: f64,
}

impl ScoreSummary {
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Body of `POST /assessments/:jobId/submit`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub candidate_id: CandidateId,
    #[serde(default)]
    pub answers: Answers,
}

/// At most one per `(job_id, candidate_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: SubmissionId,
    pub job_id: JobId,
    pub candidate_id: CandidateId,
    pub at: DateTime<Utc>,
    pub answers: Answers,
    #[serde(flatten)]
    pub score: ScoreSummary,
}
