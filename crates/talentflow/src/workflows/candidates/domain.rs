use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TalentError;
use crate::workflows::applications::Stage;
use crate::workflows::jobs::JobId;
use crate::workflows::PageRequest;

const DEFAULT_PAGE_SIZE: usize = 50;

string_id!(
    /// Identifier of a candidate; also the user id of candidate sessions.
    CandidateId
);

string_id!(EventId);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub email: String,
    pub stage: Stage,
    #[serde(default)]
    pub job_id: Option<JobId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewCandidate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub stage: Option<Stage>,
    pub job_id: Option<JobId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidatePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub stage: Option<Stage>,
    pub job_id: Option<JobId>,
}

/// One entry in a candidate's chronological history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub id: EventId,
    pub candidate_id: CandidateId,
    pub at: DateTime<Utc>,
    pub event: String,
}

impl TimelineEvent {
    pub fn new(candidate_id: CandidateId, at: DateTime<Utc>, event: impl Into<String>) -> Self {
        Self {
            id: EventId::generate(),
            candidate_id,
            at,
            event: event.into(),
        }
    }
}

/// Raw `GET /candidates` query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateListParams {
    pub search: Option<String>,
    pub stage: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandidateQuery {
    /// Lowercased; matched against name and email.
    pub search: Option<String>,
    pub stage: Option<Stage>,
    pub page: PageRequest,
}

impl Default for CandidateQuery {
    fn default() -> Self {
        Self {
            search: None,
            stage: None,
            page: PageRequest {
                page: 1,
                page_size: DEFAULT_PAGE_SIZE,
            },
        }
    }
}

impl TryFrom<CandidateListParams> for CandidateQuery {
    type Error = TalentError;

    fn try_from(params: CandidateListParams) -> Result<Self, Self::Error> {
        let search = params
            .search
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());
        let stage = params
            .stage
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse())
            .transpose()?;
        Ok(Self {
            search,
            stage,
            page: PageRequest::parse(
                params.page.as_deref(),
                params.page_size.as_deref(),
                DEFAULT_PAGE_SIZE,
            )?,
        })
    }
}

impl CandidateQuery {
    pub fn matches(&self, candidate: &Candidate) -> bool {
        let search_hit = self.search.as_ref().map_or(true, |q| {
            candidate.name.to_lowercase().contains(q) || candidate.email.to_lowercase().contains(q)
        });
        search_hit && self.stage.map_or(true, |stage| candidate.stage == stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, email: &str, stage: Stage) -> Candidate {
        Candidate {
            id: CandidateId::generate(),
            name: name.to_string(),
            email: email.to_string(),
            stage,
            job_id: None,
        }
    }

    #[test]
    fn query_matches_name_or_email_case_insensitively() {
        let query = CandidateQuery::try_from(CandidateListParams {
            search: Some(" GRACE ".to_string()),
            ..CandidateListParams::default()
        })
        .expect("valid query");

        assert!(query.matches(&candidate("Grace Hopper", "gh@navy.mil", Stage::Tech)));
        assert!(query.matches(&candidate("G. H.", "grace@example.com", Stage::Applied)));
        assert!(!query.matches(&candidate("Ada Lovelace", "ada@example.com", Stage::Applied)));
        assert_eq!(query.page.page_size, 50);
    }

    #[test]
    fn stage_filter_rejects_unknown_values() {
        let params = |stage: &str| CandidateListParams {
            stage: Some(stage.to_string()),
            ..CandidateListParams::default()
        };
        let query = CandidateQuery::try_from(params("offer")).expect("known stage");
        assert!(query.matches(&candidate("A", "a@x.io", Stage::Offer)));
        assert!(!query.matches(&candidate("B", "b@x.io", Stage::Hired)));
        assert!(CandidateQuery::try_from(params("ghosted")).is_err());
    }
}
