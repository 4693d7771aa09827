// assure-core/src/domain/assessment/mod.rs

pub mod job;
pub mod response;
pub mod status;

pub use job::{
    InternalStatus, Job, JobStatusResponse, LegacyProgress, Probe, ProgressUpdate,
    ProviderJobStatus, stage_label,
};
pub use response::{
    AssessmentReport, AssessmentResponse, ComplianceLevel, QuestionContext, ResponseWithContext,
    Verdict,
};
pub use status::{Assessment, AssessmentKind, AssessmentStatus};
