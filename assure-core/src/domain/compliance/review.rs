// assure-core/src/domain/compliance/review.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::assessment::AssessmentResponse;
use crate::domain::error::DomainError;

/// A consultant's call on one AI verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsultantDecision {
    Accepted,
    Rejected,
    Pending,
}

impl ConsultantDecision {
    /// Wire value of `consultant_accepted`.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Accepted => Some(true),
            Self::Rejected => Some(false),
            Self::Pending => None,
        }
    }

    pub fn from_flag(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => Self::Accepted,
            Some(false) => Self::Rejected,
            None => Self::Pending,
        }
    }
}

impl fmt::Display for ConsultantDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Pending => "pending",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ConsultantDecision {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "accept" | "accepted" => Ok(Self::Accepted),
            "reject" | "rejected" => Ok(Self::Rejected),
            "pending" | "pend" | "reset" => Ok(Self::Pending),
            _ => Err(DomainError::UnknownVocabulary {
                kind: "consultant_decision",
                value: s.to_string(),
            }),
        }
    }
}

/// Body of the consultant-review update call.
/// Absent notes are left out of the body and mean "unchanged" on both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultantReviewUpdate {
    pub consultant_accepted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consultant_notes: Option<String>,
}

impl ConsultantReviewUpdate {
    pub fn new(decision: ConsultantDecision, notes: Option<String>) -> Self {
        Self {
            consultant_accepted: decision.as_flag(),
            consultant_notes: notes,
        }
    }
}

/// Returns a copy of `responses` with the consultant fields of `response_id` replaced.
/// Only `consultant_accepted` and `consultant_notes` are touched.
pub fn apply_consultant_review(
    responses: &[AssessmentResponse],
    response_id: &str,
    update: &ConsultantReviewUpdate,
) -> Result<Vec<AssessmentResponse>, DomainError> {
    if !responses.iter().any(|r| r.id == response_id) {
        return Err(DomainError::ResponseNotFound(response_id.to_string()));
    }

    Ok(responses
        .iter()
        .map(|r| {
            if r.id == response_id {
                AssessmentResponse {
                    consultant_accepted: update.consultant_accepted,
                    consultant_notes: update
                        .consultant_notes
                        .clone()
                        .or_else(|| r.consultant_notes.clone()),
                    ..r.clone()
                }
            } else {
                r.clone()
            }
        })
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ConsultantTally {
    pub accepted: u32,
    pub rejected: u32,
    pub pending: u32,
}

impl ConsultantTally {
    pub fn from_responses<'a>(responses: impl IntoIterator<Item = &'a AssessmentResponse>) -> Self {
        responses
            .into_iter()
            .fold(Self::default(), |mut acc, r| {
                match ConsultantDecision::from_flag(r.consultant_accepted) {
                    ConsultantDecision::Accepted => acc.accepted += 1,
                    ConsultantDecision::Rejected => acc.rejected += 1,
                    ConsultantDecision::Pending => acc.pending += 1,
                }
                acc
            })
    }

    pub fn reviewed(&self) -> u32 {
        self.accepted + self.rejected
    }
}

/// Overall sign-off on an assessment, independent of per-question decisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanReview {
    pub reviewer: String,
    #[serde(default)]
    pub approved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
}
