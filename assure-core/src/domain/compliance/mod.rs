// assure-core/src/domain/compliance/mod.rs

pub mod review;
pub mod summary;

pub use review::{
    ConsultantDecision, ConsultantReviewUpdate, ConsultantTally, HumanReview,
    apply_consultant_review,
};
pub use summary::{
    AggregationMode, AggregationOptions, ComplianceSummary, summarize, summarize_by_verdict,
    summarize_weighted,
};
