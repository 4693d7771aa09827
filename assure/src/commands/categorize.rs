// assure/src/commands/categorize.rs
//
// USE CASE: Move a document to another category (or clear it).

use std::sync::Arc;

use assure_core::application::ListReconciler;
use assure_core::ports::{AssessmentService, DocumentService};

use super::Context;

pub async fn execute(ctx: &Context, document_id: &str, category: Option<String>) -> anyhow::Result<()> {
    ctx.require_login()?;

    let assessments: Arc<dyn AssessmentService> = ctx.api.clone();
    let documents: Arc<dyn DocumentService> = ctx.api.clone();
    let reconciler = ListReconciler::new(assessments, documents);

    let (document, category) = reconciler
        .set_category(document_id, category.as_deref())
        .await?;

    match category {
        Some(c) => println!("🏷️  {} → {} ({})", document.file_name, c.name, c.code),
        None => println!("🏷️  {} has no category", document.file_name),
    }
    Ok(())
}
