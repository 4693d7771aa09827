// assure-core/src/infrastructure/adapters/http.rs
//
// REST adapter for both service ports. Every call carries the session's bearer
// token; a 401 expires the session before the error is returned.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

// Imports Hexagonaux
use crate::domain::assessment::{
    Assessment, AssessmentKind, AssessmentReport, JobStatusResponse, LegacyProgress,
};
use crate::domain::compliance::{ConsultantReviewUpdate, HumanReview};
use crate::domain::document::{Category, Document, Page, PageRequest};
use crate::error::AssureError;
use crate::infrastructure::config::ApiConfig;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::session::SessionHandle;
use crate::ports::{AssessmentService, DocumentService};

#[derive(Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
    session: SessionHandle,
}

impl HttpApiClient {
    pub fn new(config: &ApiConfig, session: SessionHandle) -> Result<Self, InfrastructureError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, endpoint: &str) -> Result<Response, InfrastructureError> {
        let response = builder.send().await?;
        let status = response.status();
        debug!(endpoint, status = status.as_u16(), "api answered");

        if status == StatusCode::UNAUTHORIZED {
            warn!(endpoint, "token rejected, clearing session");
            self.session.expire();
            return Err(InfrastructureError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InfrastructureError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response, endpoint: &str) -> Result<T, InfrastructureError> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| InfrastructureError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, endpoint: &str) -> Result<T, AssureError> {
        let response = self.send(self.request(Method::GET, path), endpoint).await?;
        Ok(Self::decode(response, endpoint).await?)
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        endpoint: &str,
    ) -> Result<T, AssureError> {
        let response = self
            .send(self.request(method, path).json(body), endpoint)
            .await?;
        Ok(Self::decode(response, endpoint).await?)
    }
}

#[async_trait]
impl AssessmentService for HttpApiClient {
    async fn create_assessment(
        &self,
        document_id: &str,
        kind: AssessmentKind,
    ) -> Result<Assessment, AssureError> {
        let body = json!({ "document_id": document_id, "assessment_type": kind });
        self.send_json(Method::POST, "/assessments", &body, "create assessment")
            .await
    }

    async fn get_assessment(&self, assessment_id: &str) -> Result<Assessment, AssureError> {
        self.get_json(&format!("/assessments/{assessment_id}"), "assessment")
            .await
    }

    async fn get_document_assessments(
        &self,
        document_id: &str,
    ) -> Result<Vec<Assessment>, AssureError> {
        self.get_json(
            &format!("/documents/{document_id}/assessments"),
            "document assessments",
        )
        .await
    }

    async fn get_report(&self, assessment_id: &str) -> Result<AssessmentReport, AssureError> {
        self.get_json(&format!("/assessments/{assessment_id}/report"), "report")
            .await
    }

    async fn get_job_status(&self, assessment_id: &str) -> Result<JobStatusResponse, AssureError> {
        self.get_json(
            &format!("/assessments/{assessment_id}/job-status"),
            "job-status",
        )
        .await
    }

    async fn get_progress(&self, assessment_id: &str) -> Result<LegacyProgress, AssureError> {
        self.get_json(&format!("/assessments/{assessment_id}/progress"), "progress")
            .await
    }

    async fn update_consultant_review(
        &self,
        assessment_id: &str,
        response_id: &str,
        update: &ConsultantReviewUpdate,
    ) -> Result<(), AssureError> {
        let path = format!("/assessments/{assessment_id}/responses/{response_id}/consultant-review");
        self.send(
            self.request(Method::PATCH, &path).json(update),
            "consultant review",
        )
        .await?;
        Ok(())
    }

    async fn save_human_review(
        &self,
        assessment_id: &str,
        review: &HumanReview,
    ) -> Result<HumanReview, AssureError> {
        self.send_json(
            Method::PUT,
            &format!("/assessments/{assessment_id}/human-review"),
            review,
            "human review",
        )
        .await
    }

    async fn get_human_review(
        &self,
        assessment_id: &str,
    ) -> Result<Option<HumanReview>, AssureError> {
        let path = format!("/assessments/{assessment_id}/human-review");
        match self.get_json(&path, "human review").await {
            Ok(review) => Ok(Some(review)),
            Err(AssureError::Infrastructure(InfrastructureError::Api { status: 404, .. })) => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl DocumentService for HttpApiClient {
    async fn list_documents(
        &self,
        project_id: &str,
        page: PageRequest,
    ) -> Result<Page<Document>, AssureError> {
        let builder = self
            .request(Method::GET, &format!("/projects/{project_id}/documents"))
            .query(&[("page", page.page), ("page_size", page.page_size)]);
        let response = self.send(builder, "documents").await?;
        Ok(Self::decode(response, "documents").await?)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, AssureError> {
        self.get_json("/categories", "categories").await
    }

    async fn update_document_category(
        &self,
        document_id: &str,
        category_id: Option<&str>,
    ) -> Result<Document, AssureError> {
        self.send_json(
            Method::PATCH,
            &format!("/documents/{document_id}/category"),
            &json!({ "category_id": category_id }),
            "document category",
        )
        .await
    }

    async fn download_document(&self, document_id: &str) -> Result<Vec<u8>, AssureError> {
        let response = self
            .send(
                self.request(Method::GET, &format!("/documents/{document_id}/download")),
                "download",
            )
            .await?;
        let bytes = response.bytes().await.map_err(InfrastructureError::from)?;
        Ok(bytes.to_vec())
    }
}
