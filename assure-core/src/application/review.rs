// assure-core/src/application/review.rs
//
// Consultant decisions layered over an AI response set. The server is written
// first; local state only changes once it has accepted the update.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::domain::assessment::AssessmentResponse;
use crate::domain::compliance::{
    AggregationMode, AggregationOptions, ComplianceSummary, ConsultantDecision,
    ConsultantReviewUpdate, ConsultantTally, HumanReview, apply_consultant_review, summarize,
};
use crate::domain::error::DomainError;
use crate::error::AssureError;
use crate::ports::AssessmentService;

pub struct ConsultantReviewOverlay {
    service: Arc<dyn AssessmentService>,
    assessment_id: String,
    responses: Vec<AssessmentResponse>,
}

impl ConsultantReviewOverlay {
    pub fn new(
        service: Arc<dyn AssessmentService>,
        assessment_id: impl Into<String>,
        responses: Vec<AssessmentResponse>,
    ) -> Self {
        Self {
            service,
            assessment_id: assessment_id.into(),
            responses,
        }
    }

    #[instrument(skip(service))]
    pub async fn load(
        service: Arc<dyn AssessmentService>,
        assessment_id: &str,
    ) -> Result<Self, AssureError> {
        let report = service.get_report(assessment_id).await?;
        Ok(Self::new(service, assessment_id, report.into_responses()))
    }

    pub fn assessment_id(&self) -> &str {
        &self.assessment_id
    }

    pub fn responses(&self) -> &[AssessmentResponse] {
        &self.responses
    }

    pub fn tally(&self) -> ConsultantTally {
        ConsultantTally::from_responses(&self.responses)
    }

    pub fn summary(&self, mode: AggregationMode, options: AggregationOptions) -> ComplianceSummary {
        summarize(&self.responses, mode, options)
    }

    /// Persists the decision, then mirrors it locally. On error nothing local changes.
    #[instrument(skip(self, notes), fields(assessment_id = %self.assessment_id))]
    pub async fn set_consultant_decision(
        &mut self,
        response_id: &str,
        decision: ConsultantDecision,
        notes: Option<String>,
    ) -> Result<&AssessmentResponse, AssureError> {
        if !self.responses.iter().any(|r| r.id == response_id) {
            return Err(DomainError::ResponseNotFound(response_id.to_string()).into());
        }

        let update = ConsultantReviewUpdate::new(decision, notes);
        if let Err(e) = self
            .service
            .update_consultant_review(&self.assessment_id, response_id, &update)
            .await
        {
            warn!(response_id, error = %e, "consultant review not saved");
            return Err(e);
        }

        self.responses = apply_consultant_review(&self.responses, response_id, &update)?;
        info!(response_id, %decision, "consultant review saved");

        self.responses
            .iter()
            .find(|r| r.id == response_id)
            .ok_or_else(|| DomainError::ResponseNotFound(response_id.to_string()).into())
    }

    #[instrument(skip(self, review), fields(assessment_id = %self.assessment_id))]
    pub async fn save_human_review(&self, review: &HumanReview) -> Result<HumanReview, AssureError> {
        let saved = self
            .service
            .save_human_review(&self.assessment_id, review)
            .await?;
        info!(reviewer = %saved.reviewer, approved = saved.approved, "human review saved");
        Ok(saved)
    }

    pub async fn human_review(&self) -> Result<Option<HumanReview>, AssureError> {
        self.service.get_human_review(&self.assessment_id).await
    }
}
