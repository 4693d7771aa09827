// assure-core/src/application/reconciliation.rs
//
// Builds the rows of a document table: for each document on a page, the
// current assessment and its weighted compliance score. Rows are resolved
// concurrently and independently; one bad row never fails the page.

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

use crate::domain::assessment::Assessment;
use crate::domain::compliance::{AggregationOptions, ComplianceSummary, summarize_weighted};
use crate::domain::document::{CategoryIndex, CategoryRef, Document, PageRequest};
use crate::domain::select_current_assessment;
use crate::error::AssureError;
use crate::ports::{AssessmentService, DocumentService};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentRow {
    pub document: Document,
    pub category: Option<CategoryRef>,
    pub assessment: Option<Assessment>,
    /// Weighted score, only for finished assessments.
    pub summary: Option<ComplianceSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledPage {
    pub rows: Vec<DocumentRow>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

struct RowAssessment {
    assessment: Assessment,
    summary: Option<ComplianceSummary>,
}

pub struct ListReconciler {
    assessments: Arc<dyn AssessmentService>,
    documents: Arc<dyn DocumentService>,
    categories: OnceCell<CategoryIndex>,
}

impl ListReconciler {
    pub fn new(assessments: Arc<dyn AssessmentService>, documents: Arc<dyn DocumentService>) -> Self {
        Self {
            assessments,
            documents,
            categories: OnceCell::new(),
        }
    }

    /// Category index, fetched on first use and kept for the reconciler's lifetime.
    /// A failed fetch is not cached; the next call tries again.
    pub async fn categories(&self) -> Result<&CategoryIndex, AssureError> {
        self.categories
            .get_or_try_init(|| async {
                let categories = self.documents.list_categories().await?;
                debug!(count = categories.len(), "category index loaded");
                Ok::<_, AssureError>(CategoryIndex::new(categories))
            })
            .await
    }

    #[instrument(skip(self))]
    pub async fn reconcile_page(
        &self,
        project_id: &str,
        request: PageRequest,
    ) -> Result<ReconciledPage, AssureError> {
        let page = self.documents.list_documents(project_id, request).await?;

        let fallback = CategoryIndex::default();
        let categories = match self.categories().await {
            Ok(index) => index,
            Err(e) => {
                warn!(error = %e, "category listing failed, rows shown without category");
                &fallback
            }
        };

        let lookups = page.items.iter().map(|document| self.resolve_row(document));
        let resolved = join_all(lookups).await;

        let rows: Vec<DocumentRow> = page
            .items
            .into_iter()
            .zip(resolved)
            .map(|(document, resolved)| {
                let category = categories.resolve(&document);
                let (assessment, summary) = match resolved {
                    Some(r) => (Some(r.assessment), r.summary),
                    None => (None, None),
                };
                DocumentRow {
                    document,
                    category,
                    assessment,
                    summary,
                }
            })
            .collect();

        info!(
            rows = rows.len(),
            assessed = rows.iter().filter(|r| r.assessment.is_some()).count(),
            "page reconciled"
        );
        Ok(ReconciledPage {
            rows,
            total: page.total,
            page: page.page,
            page_size: page.page_size,
        })
    }

    /// Moves a document to another category and returns the category to display.
    #[instrument(skip(self))]
    pub async fn set_category(
        &self,
        document_id: &str,
        category_id: Option<&str>,
    ) -> Result<(Document, Option<CategoryRef>), AssureError> {
        let document = self
            .documents
            .update_document_category(document_id, category_id)
            .await?;
        let category = self.categories().await?.resolve(&document);
        Ok((document, category))
    }

    async fn resolve_row(&self, document: &Document) -> Option<RowAssessment> {
        match self.try_resolve_row(document).await {
            Ok(row) => row,
            Err(e) => {
                warn!(document_id = %document.id, error = %e, "row lookup failed, showing no assessment");
                None
            }
        }
    }

    async fn try_resolve_row(
        &self,
        document: &Document,
    ) -> Result<Option<RowAssessment>, AssureError> {
        let assessments = self.assessments.get_document_assessments(&document.id).await?;
        let Some(current) = select_current_assessment(&assessments) else {
            return Ok(None);
        };

        let summary = if current.status.is_finished() {
            let report = self.assessments.get_report(&current.id).await?;
            Some(summarize_weighted(
                &report.into_responses(),
                AggregationOptions::default(),
            ))
        } else {
            None
        };

        Ok(Some(RowAssessment {
            assessment: current.clone(),
            summary,
        }))
    }
}
