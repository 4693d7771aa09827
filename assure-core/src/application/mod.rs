// assure-core/src/application/mod.rs

pub mod poller;
pub mod reconciliation;
pub mod review;
pub mod status_probe;

#[cfg(test)]
pub(crate) mod fakes;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Le CLI peut faire :
// `use assure_core::application::{AssessmentJobPoller, ListReconciler};`
// sans connaître la structure interne des fichiers.

pub use poller::{
    AssessmentJobPoller, COMPLETION_DISPLAY_DELAY, CompletionCallback, DEFAULT_MAX_POLL_DURATION,
    DEFAULT_TOTAL_QUESTIONS, POLL_INTERVAL, PollSettings, PollSnapshot, PollState,
};
pub use reconciliation::{DocumentRow, ListReconciler, ReconciledPage};
pub use review::ConsultantReviewOverlay;
pub use status_probe::{ProbeFailure, StatusProbe};
