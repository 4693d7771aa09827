// assure-core/src/domain/assessment/job.rs
//
// Two generations of status APIs are translated here into one vocabulary.
// Nothing in this file touches the network.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::assessment::status::AssessmentStatus;

pub const DEFAULT_FAILURE_MESSAGE: &str =
    "The analysis failed on the server. Please try again or contact support.";

/// Status strings emitted by the job runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderJobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
    #[serde(other)]
    Other,
}

/// The single status the rest of the client reasons about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InternalStatus {
    #[default]
    Processing,
    Completed,
    Failed,
}

impl From<ProviderJobStatus> for InternalStatus {
    fn from(status: ProviderJobStatus) -> Self {
        match status {
            ProviderJobStatus::Completed => Self::Completed,
            ProviderJobStatus::Failed => Self::Failed,
            ProviderJobStatus::Queued | ProviderJobStatus::Processing | ProviderJobStatus::Other => {
                Self::Processing
            }
        }
    }
}

impl From<AssessmentStatus> for InternalStatus {
    fn from(status: AssessmentStatus) -> Self {
        match status {
            AssessmentStatus::Completed | AssessmentStatus::Reviewed => Self::Completed,
            AssessmentStatus::Failed => Self::Failed,
            AssessmentStatus::Pending | AssessmentStatus::InProgress | AssessmentStatus::Unknown => {
                Self::Processing
            }
        }
    }
}

impl fmt::Display for InternalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub status: ProviderJobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_batches: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_batches: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Payload of the job-status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatusResponse {
    pub job: Job,
    #[serde(default)]
    pub is_complete: bool,
}

/// Payload of the legacy assessment-progress endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyProgress {
    pub status: AssessmentStatus,
    #[serde(default, alias = "progress", skip_serializing_if = "Option::is_none")]
    pub progress_percent: Option<f64>,
    #[serde(default, alias = "current_stage", skip_serializing_if = "Option::is_none")]
    pub progress_stage: Option<String>,
    #[serde(default, alias = "error", skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Non-terminal progress observed during one tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressUpdate {
    pub percent: Option<f64>,
    pub stage: Option<String>,
    pub completed_batches: Option<u32>,
    pub total_batches: Option<u32>,
}

/// What a single status probe concluded, whichever endpoint answered.
#[derive(Debug, Clone, PartialEq)]
pub enum Probe {
    Progress(ProgressUpdate),
    Completed,
    Failed(String),
}

impl JobStatusResponse {
    pub fn internal_status(&self) -> InternalStatus {
        InternalStatus::from(self.job.status)
    }

    /// Completion needs both the flag and the status; either alone is still progress.
    pub fn into_probe(self) -> Probe {
        match self.internal_status() {
            InternalStatus::Completed if self.is_complete => Probe::Completed,
            InternalStatus::Failed => Probe::Failed(failure_message(self.job.error_message)),
            _ => Probe::Progress(ProgressUpdate {
                percent: self.job.progress_percent,
                stage: self.job.progress_stage,
                completed_batches: self.job.completed_batches,
                total_batches: self.job.total_batches,
            }),
        }
    }
}

impl LegacyProgress {
    pub fn into_probe(self) -> Probe {
        match InternalStatus::from(self.status) {
            InternalStatus::Completed => Probe::Completed,
            InternalStatus::Failed => Probe::Failed(failure_message(self.error_message)),
            InternalStatus::Processing => Probe::Progress(ProgressUpdate {
                percent: self.progress_percent,
                stage: self.progress_stage,
                ..Default::default()
            }),
        }
    }
}

fn failure_message(raw: Option<String>) -> String {
    raw.map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string())
}

/// "analysing_batches" -> "Analysing batches"
pub fn stage_label(raw: &str) -> String {
    let spaced: String = raw
        .trim()
        .chars()
        .map(|c| if c == '_' || c == '-' { ' ' } else { c })
        .collect();
    let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut chars = collapsed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
