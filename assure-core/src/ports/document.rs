// assure-core/src/ports/document.rs

use crate::domain::document::{Category, Document, Page, PageRequest};
use crate::error::AssureError;
use async_trait::async_trait;

#[async_trait]
pub trait DocumentService: Send + Sync {
    async fn list_documents(
        &self,
        project_id: &str,
        page: PageRequest,
    ) -> Result<Page<Document>, AssureError>;

    async fn list_categories(&self) -> Result<Vec<Category>, AssureError>;

    async fn update_document_category(
        &self,
        document_id: &str,
        category_id: Option<&str>,
    ) -> Result<Document, AssureError>;

    async fn download_document(&self, document_id: &str) -> Result<Vec<u8>, AssureError>;
}
