// assure-core/src/ports/assessment.rs

// What the use cases need from the assessment backend, without knowing whether
// it is reached over HTTP or faked in a test.

use crate::domain::assessment::{
    Assessment, AssessmentKind, AssessmentReport, JobStatusResponse, LegacyProgress,
};
use crate::domain::compliance::{ConsultantReviewUpdate, HumanReview};
use crate::error::AssureError;
use async_trait::async_trait;

#[async_trait]
pub trait AssessmentService: Send + Sync {
    async fn create_assessment(
        &self,
        document_id: &str,
        kind: AssessmentKind,
    ) -> Result<Assessment, AssureError>;

    async fn get_assessment(&self, assessment_id: &str) -> Result<Assessment, AssureError>;

    async fn get_document_assessments(
        &self,
        document_id: &str,
    ) -> Result<Vec<Assessment>, AssureError>;

    async fn get_report(&self, assessment_id: &str) -> Result<AssessmentReport, AssureError>;

    /// Current-generation job status.
    async fn get_job_status(&self, assessment_id: &str) -> Result<JobStatusResponse, AssureError>;

    /// Previous-generation progress endpoint, used as a per-tick fallback.
    async fn get_progress(&self, assessment_id: &str) -> Result<LegacyProgress, AssureError>;

    async fn update_consultant_review(
        &self,
        assessment_id: &str,
        response_id: &str,
        update: &ConsultantReviewUpdate,
    ) -> Result<(), AssureError>;

    async fn save_human_review(
        &self,
        assessment_id: &str,
        review: &HumanReview,
    ) -> Result<HumanReview, AssureError>;

    async fn get_human_review(&self, assessment_id: &str)
    -> Result<Option<HumanReview>, AssureError>;
}
