//! Hiring pipeline stages and the rank rule governing moves between them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TalentError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Applied,
    Screen,
    Tech,
    Offer,
    Hired,
    Rejected,
}

impl Stage {
    /// Pipeline order; index is rank.
    pub const ALL: [Stage; 6] = [
        Stage::Applied,
        Stage::Screen,
        Stage::Tech,
        Stage::Offer,
        Stage::Hired,
        Stage::Rejected,
    ];

    pub const fn rank(self) -> u8 {
        match self {
            Stage::Applied => 0,
            Stage::Screen => 1,
            Stage::Tech => 2,
            Stage::Offer => 3,
            Stage::Hired => 4,
            Stage::Rejected => 5,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Stage::Applied => "applied",
            Stage::Screen => "screen",
            Stage::Tech => "tech",
            Stage::Offer => "offer",
            Stage::Hired => "hired",
            Stage::Rejected => "rejected",
        }
    }

    /// Timeline entry written when a record enters this stage.
    pub fn timeline_event(self) -> String {
        format!("stage:{}", self.label())
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Stage {
    type Err = TalentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim().to_ascii_lowercase();
        Stage::ALL
            .into_iter()
            .find(|stage| stage.label() == value)
            .ok_or_else(|| TalentError::validation(format!("unknown stage '{value}'")))
    }
}

/// How an accepted move relates to the rank order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Same stage requested; nothing to write.
    Unchanged,
    Advance,
    /// Candidate's answer to an offer, accepted regardless of rank.
    OfferResponse,
}

/// Checks a requested move from `from` to `to`.
///
/// Moves may only go forward in rank. The single override is the response to an offer
/// (`offer -> hired | rejected`). `rejected` is a dead end even though it holds the highest rank.
pub fn check_transition(from: Stage, to: Stage) -> Result<Transition, TalentError> {
    if from == to {
        return Ok(Transition::Unchanged);
    }
    if from == Stage::Rejected {
        return Err(TalentError::InvalidTransition { from, to });
    }
    if from == Stage::Offer && matches!(to, Stage::Hired | Stage::Rejected) {
        return Ok(Transition::OfferResponse);
    }
    if to.rank() < from.rank() {
        return Err(TalentError::InvalidTransition { from, to });
    }
    Ok(Transition::Advance)
}
