// assure/src/commands/summary.rs
//
// USE CASE: Compliance summary of one assessment, in either aggregation mode.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use serde_json::json;
use std::sync::Arc;

use assure_core::application::ConsultantReviewOverlay;
use assure_core::domain::compliance::{AggregationMode, AggregationOptions, ComplianceSummary};
use assure_core::ports::AssessmentService;

use super::Context;
use crate::cli::OutputFormat;

pub async fn execute(
    ctx: &Context,
    assessment_id: &str,
    mode: AggregationMode,
    include_non_relevant: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    ctx.require_login()?;
    let service: Arc<dyn AssessmentService> = ctx.api.clone();

    let overlay = ConsultantReviewOverlay::load(service, assessment_id).await?;
    let summary = overlay.summary(mode, AggregationOptions { include_non_relevant });
    let tally = overlay.tally();
    let human_review = overlay.human_review().await?;

    match format {
        OutputFormat::Json => {
            let out = json!({
                "assessment_id": assessment_id,
                "mode": mode,
                "summary": summary,
                "consultant": tally,
                "human_review": human_review,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Table => {
            println!("\n📊 Assessment {} ({} mode)", assessment_id, mode);
            println!("{}", summary_table(&summary));
            println!(
                "🧑‍⚖️ Consultant: {} accepted, {} rejected, {} pending",
                tally.accepted, tally.rejected, tally.pending
            );
            if let Some(review) = human_review {
                let verdict = if review.approved { "approved" } else { "not approved" };
                println!("✍️  Signed off by {} ({})", review.reviewer, verdict);
            }
        }
    }

    Ok(())
}

pub fn summary_table(summary: &ComplianceSummary) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Metric", "Value"]);

    let rows = [
        ("Satisfactory", summary.satisfactory_count.to_string()),
        ("Unsatisfactory", summary.unsatisfactory_count.to_string()),
        ("Requirement", summary.requirement_count.to_string()),
        ("Not applicable", summary.not_applicable_count.to_string()),
        ("Compliant", summary.compliant_count.to_string()),
        ("Partially compliant", summary.partially_compliant_count.to_string()),
        ("Non compliant", summary.non_compliant_count.to_string()),
        ("Relevant questions", summary.total_relevant.to_string()),
        ("Score", format!("{}%", summary.compliance_score_percent)),
    ];
    for (metric, value) in rows {
        table.add_row(vec![metric.to_string(), value]);
    }
    table
}
