// assure-core/src/application/fakes.rs
//
// Scripted in-memory AssessmentService for the use-case tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::domain::assessment::{
    Assessment, AssessmentKind, AssessmentReport, AssessmentResponse, AssessmentStatus, Job,
    JobStatusResponse, LegacyProgress, ProviderJobStatus, ResponseWithContext,
};
use crate::domain::compliance::{ConsultantReviewUpdate, HumanReview};
use crate::domain::document::{Category, Document, Page, PageRequest};
use crate::error::AssureError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::{AssessmentService, DocumentService};

#[derive(Clone)]
pub(crate) enum Reply<T> {
    Ok(T),
    /// 503 from the server.
    Transient,
    /// Body that does not decode.
    Shape,
    /// 401, session gone.
    Unauthorized,
    /// 404, assessment deleted or superseded.
    NotFound,
}

impl<T: Clone> Reply<T> {
    fn to_result(&self, endpoint: &str) -> Result<T, AssureError> {
        match self {
            Reply::Ok(v) => Ok(v.clone()),
            Reply::Transient => Err(InfrastructureError::Api {
                status: 503,
                body: format!("{endpoint} unavailable"),
            }
            .into()),
            Reply::Shape => Err(InfrastructureError::Decode {
                endpoint: endpoint.to_string(),
                message: "missing field `job`".into(),
            }
            .into()),
            Reply::Unauthorized => Err(InfrastructureError::Unauthorized.into()),
            Reply::NotFound => Err(InfrastructureError::Api {
                status: 404,
                body: format!("{endpoint} not found"),
            }
            .into()),
        }
    }
}

// The last scripted reply repeats once the script runs out.
fn next<T: Clone>(script: &[Reply<T>], calls: &AtomicUsize, endpoint: &str) -> Result<T, AssureError> {
    let n = calls.fetch_add(1, Ordering::SeqCst);
    match script.get(n).or_else(|| script.last()) {
        Some(reply) => reply.to_result(endpoint),
        None => Reply::<T>::Transient.to_result(endpoint),
    }
}

#[derive(Default)]
pub(crate) struct FakeAssessmentService {
    pub job_replies: Vec<Reply<JobStatusResponse>>,
    pub legacy_replies: Vec<Reply<LegacyProgress>>,
    /// Used by `get_report` for ids absent from `reports_by_id`.
    pub report_replies: Vec<Reply<AssessmentReport>>,
    pub reports_by_id: HashMap<String, Reply<AssessmentReport>>,
    pub assessments_by_document: HashMap<String, Reply<Vec<Assessment>>>,
    /// Artificial latency per document for `get_document_assessments`.
    pub document_latency: HashMap<String, Duration>,
    /// When set, `get_job_status` waits for a notification before answering.
    pub job_gate: Option<Arc<Notify>>,
    pub fail_review_updates: bool,

    pub job_calls: AtomicUsize,
    pub legacy_calls: AtomicUsize,
    pub report_calls: AtomicUsize,
    pub document_calls: AtomicUsize,
    pub review_updates: Mutex<Vec<(String, String, ConsultantReviewUpdate)>>,
    pub human_reviews: Mutex<HashMap<String, HumanReview>>,
}

#[async_trait]
impl AssessmentService for FakeAssessmentService {
    async fn create_assessment(
        &self,
        document_id: &str,
        kind: AssessmentKind,
    ) -> Result<Assessment, AssureError> {
        Ok(Assessment {
            id: format!("{document_id}-assessment"),
            document_id: document_id.to_string(),
            kind,
            status: AssessmentStatus::Pending,
            created_at: None,
            updated_at: None,
        })
    }

    async fn get_assessment(&self, assessment_id: &str) -> Result<Assessment, AssureError> {
        Err(AssureError::InternalError(format!(
            "get_assessment({assessment_id}) not scripted"
        )))
    }

    async fn get_document_assessments(
        &self,
        document_id: &str,
    ) -> Result<Vec<Assessment>, AssureError> {
        self.document_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.document_latency.get(document_id) {
            tokio::time::sleep(*delay).await;
        }
        match self.assessments_by_document.get(document_id) {
            Some(reply) => reply.to_result("document assessments"),
            None => Ok(Vec::new()),
        }
    }

    async fn get_report(&self, assessment_id: &str) -> Result<AssessmentReport, AssureError> {
        if let Some(reply) = self.reports_by_id.get(assessment_id) {
            self.report_calls.fetch_add(1, Ordering::SeqCst);
            return reply.to_result("report");
        }
        next(&self.report_replies, &self.report_calls, "report")
    }

    async fn get_job_status(&self, _assessment_id: &str) -> Result<JobStatusResponse, AssureError> {
        let reply = next(&self.job_replies, &self.job_calls, "job-status");
        if let Some(gate) = &self.job_gate {
            gate.notified().await;
        }
        reply
    }

    async fn get_progress(&self, _assessment_id: &str) -> Result<LegacyProgress, AssureError> {
        next(&self.legacy_replies, &self.legacy_calls, "progress")
    }

    async fn update_consultant_review(
        &self,
        assessment_id: &str,
        response_id: &str,
        update: &ConsultantReviewUpdate,
    ) -> Result<(), AssureError> {
        if self.fail_review_updates {
            return Reply::<()>::Transient.to_result("consultant review");
        }
        if let Ok(mut calls) = self.review_updates.lock() {
            calls.push((
                assessment_id.to_string(),
                response_id.to_string(),
                update.clone(),
            ));
        }
        Ok(())
    }

    async fn save_human_review(
        &self,
        assessment_id: &str,
        review: &HumanReview,
    ) -> Result<HumanReview, AssureError> {
        if let Ok(mut store) = self.human_reviews.lock() {
            store.insert(assessment_id.to_string(), review.clone());
        }
        Ok(review.clone())
    }

    async fn get_human_review(
        &self,
        assessment_id: &str,
    ) -> Result<Option<HumanReview>, AssureError> {
        Ok(self
            .human_reviews
            .lock()
            .ok()
            .and_then(|store| store.get(assessment_id).cloned()))
    }
}

#[derive(Default)]
pub(crate) struct FakeDocumentService {
    pub documents: Vec<Document>,
    pub categories: Vec<Category>,
    pub fail_categories: bool,
    pub category_calls: AtomicUsize,
    pub category_updates: Mutex<Vec<(String, Option<String>)>>,
}

#[async_trait]
impl DocumentService for FakeDocumentService {
    async fn list_documents(
        &self,
        project_id: &str,
        page: PageRequest,
    ) -> Result<Page<Document>, AssureError> {
        let matching: Vec<Document> = self
            .documents
            .iter()
            .filter(|d| d.project_id == project_id)
            .cloned()
            .collect();
        let skip = (page.page.saturating_sub(1) * page.page_size) as usize;
        Ok(Page {
            total: matching.len() as u64,
            items: matching
                .into_iter()
                .skip(skip)
                .take(page.page_size as usize)
                .collect(),
            page: page.page,
            page_size: page.page_size,
        })
    }

    async fn list_categories(&self) -> Result<Vec<Category>, AssureError> {
        self.category_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_categories {
            return Reply::<Vec<Category>>::Transient.to_result("categories");
        }
        Ok(self.categories.clone())
    }

    async fn update_document_category(
        &self,
        document_id: &str,
        category_id: Option<&str>,
    ) -> Result<Document, AssureError> {
        let mut document = self
            .documents
            .iter()
            .find(|d| d.id == document_id)
            .cloned()
            .ok_or_else(|| InfrastructureError::Api {
                status: 404,
                body: format!("document {document_id} not found"),
            })?;
        document.category_id = category_id.map(str::to_string);
        if let Ok(mut calls) = self.category_updates.lock() {
            calls.push((document_id.to_string(), document.category_id.clone()));
        }
        Ok(document)
    }

    async fn download_document(&self, document_id: &str) -> Result<Vec<u8>, AssureError> {
        Ok(format!("%PDF-1.7 {document_id}").into_bytes())
    }
}

pub(crate) fn document(id: &str, project_id: &str, category_id: Option<&str>) -> Document {
    Document {
        id: id.to_string(),
        project_id: project_id.to_string(),
        file_name: format!("{id}.pdf"),
        category_id: category_id.map(str::to_string),
        uploaded_at: None,
    }
}

pub(crate) fn category(id: &str, name: &str, code: &str) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        code: code.to_string(),
    }
}

pub(crate) fn job_reply(
    status: ProviderJobStatus,
    percent: Option<f64>,
    is_complete: bool,
) -> Reply<JobStatusResponse> {
    Reply::Ok(JobStatusResponse {
        job: Job {
            status,
            progress_percent: percent,
            progress_stage: Some("analysing_batches".into()),
            completed_batches: None,
            total_batches: None,
            error_message: None,
        },
        is_complete,
    })
}

pub(crate) fn failed_job_reply(message: &str) -> Reply<JobStatusResponse> {
    Reply::Ok(JobStatusResponse {
        job: Job {
            status: ProviderJobStatus::Failed,
            progress_percent: None,
            progress_stage: None,
            completed_batches: None,
            total_batches: None,
            error_message: Some(message.to_string()),
        },
        is_complete: true,
    })
}

pub(crate) fn legacy_reply(status: AssessmentStatus, percent: Option<f64>) -> Reply<LegacyProgress> {
    Reply::Ok(LegacyProgress {
        status,
        progress_percent: percent,
        progress_stage: None,
        error_message: None,
    })
}

pub(crate) fn report_of(responses: Vec<AssessmentResponse>) -> AssessmentReport {
    AssessmentReport {
        responses: responses
            .into_iter()
            .map(|response| ResponseWithContext {
                response,
                question: None,
            })
            .collect(),
        total_questions: None,
    }
}

pub(crate) fn assessment(id: &str, document_id: &str, status: AssessmentStatus) -> Assessment {
    Assessment {
        id: id.to_string(),
        document_id: document_id.to_string(),
        kind: AssessmentKind::Ai,
        status,
        created_at: None,
        updated_at: None,
    }
}
