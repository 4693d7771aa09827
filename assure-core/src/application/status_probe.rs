// assure-core/src/application/status_probe.rs
//
// One status lookup per tick: job-status endpoint first, legacy progress
// endpoint only when the first one errors. Both land on the same `Probe`.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::assessment::Probe;
use crate::error::AssureError;
use crate::ports::AssessmentService;

#[derive(Debug, Error)]
#[error("job status unavailable (job-status: {primary}; legacy progress: {fallback})")]
pub struct ProbeFailure {
    pub primary: AssureError,
    pub fallback: AssureError,
}

impl ProbeFailure {
    pub fn is_unauthorized(&self) -> bool {
        self.primary.is_unauthorized() || self.fallback.is_unauthorized()
    }

    /// Retrying on the next tick cannot change the answer: the session is gone,
    /// both endpoints refused the request, or neither answered in a shape we understand.
    pub fn is_unrecoverable(&self) -> bool {
        self.is_unauthorized()
            || (self.primary.is_rejection() && self.fallback.is_rejection())
            || (self.primary.is_shape_error() && self.fallback.is_shape_error())
    }

    /// Message shown to the user when polling stops on this failure.
    pub fn reason(&self) -> String {
        if self.is_unauthorized() {
            "Session expired. Run `assure login` and track the analysis again.".to_string()
        } else if self.primary.is_rejection() && self.fallback.is_rejection() {
            format!("The platform refused the status request ({}).", self.fallback)
        } else {
            "Could not read the analysis status. Please try again.".to_string()
        }
    }
}

#[derive(Clone)]
pub struct StatusProbe {
    service: Arc<dyn AssessmentService>,
}

impl StatusProbe {
    pub fn new(service: Arc<dyn AssessmentService>) -> Self {
        Self { service }
    }

    pub async fn try_primary(&self, assessment_id: &str) -> Result<Probe, AssureError> {
        let response = self.service.get_job_status(assessment_id).await?;
        debug!(
            assessment_id,
            status = %response.internal_status(),
            is_complete = response.is_complete,
            "job-status answered"
        );
        Ok(response.into_probe())
    }

    pub async fn try_fallback(&self, assessment_id: &str) -> Result<Probe, AssureError> {
        let progress = self.service.get_progress(assessment_id).await?;
        debug!(assessment_id, status = %progress.status, "legacy progress answered");
        Ok(progress.into_probe())
    }

    pub async fn probe(&self, assessment_id: &str) -> Result<Probe, ProbeFailure> {
        let primary = match self.try_primary(assessment_id).await {
            Ok(probe) => return Ok(probe),
            Err(e) => e,
        };
        warn!(assessment_id, error = %primary, "job-status failed, falling back to legacy progress");

        self.try_fallback(assessment_id)
            .await
            .map_err(|fallback| ProbeFailure { primary, fallback })
    }
}
