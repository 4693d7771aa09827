// assure/src/commands/analyze.rs
//
// USE CASE: Start an assessment of a document, then follow it unless asked not to.

use assure_core::domain::assessment::AssessmentKind;
use assure_core::ports::AssessmentService;

use super::{Context, track};

pub async fn execute(
    ctx: &Context,
    document_id: &str,
    kind: AssessmentKind,
    no_track: bool,
) -> anyhow::Result<()> {
    ctx.require_login()?;

    println!("🧠 Starting {} analysis of document {}...", kind, document_id);
    let assessment = ctx.api.create_assessment(document_id, kind).await?;
    println!("   Assessment: {} ({})", assessment.id, assessment.status);

    if no_track {
        println!("👉 Follow it with 'assure track {}'", assessment.id);
        return Ok(());
    }
    track::execute(ctx, &assessment.id).await
}
