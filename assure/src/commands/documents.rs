// assure/src/commands/documents.rs
//
// USE CASE: One page of a project's documents with their current assessment.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use std::sync::Arc;

use assure_core::application::{ListReconciler, ReconciledPage};
use assure_core::domain::document::PageRequest;
use assure_core::ports::{AssessmentService, DocumentService};

use super::Context;
use crate::cli::OutputFormat;

pub async fn execute(
    ctx: &Context,
    project_id: &str,
    page: u32,
    page_size: u32,
    format: OutputFormat,
) -> anyhow::Result<()> {
    ctx.require_login()?;
    if page == 0 || page_size == 0 {
        anyhow::bail!("❌ --page and --page-size start at 1.");
    }

    let assessments: Arc<dyn AssessmentService> = ctx.api.clone();
    let documents: Arc<dyn DocumentService> = ctx.api.clone();
    let reconciler = ListReconciler::new(assessments, documents);

    let result = reconciler
        .reconcile_page(project_id, PageRequest { page, page_size })
        .await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Table => {
            println!("{}", documents_table(&result));
            println!(
                "📁 Page {} · {} of {} documents",
                result.page,
                result.rows.len(),
                result.total
            );
        }
    }
    Ok(())
}

fn documents_table(page: &ReconciledPage) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Document", "Category", "Assessment", "Status", "Score"]);

    for row in &page.rows {
        let category = row
            .category
            .as_ref()
            .map(|c| format!("{} ({})", c.name, c.code))
            .unwrap_or_else(|| "-".to_string());
        let (assessment, status) = match &row.assessment {
            Some(a) => (a.id.clone(), a.status.to_string()),
            None => ("-".to_string(), "not assessed".to_string()),
        };
        let score = row
            .summary
            .as_ref()
            .map(|s| format!("{}%", s.compliance_score_percent))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            row.document.file_name.clone(),
            category,
            assessment,
            status,
            score,
        ]);
    }
    table
}
