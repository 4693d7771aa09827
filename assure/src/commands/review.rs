// assure/src/commands/review.rs
//
// USE CASE: Consultant accept / reject / reset on one AI verdict.

use std::sync::Arc;

use assure_core::application::ConsultantReviewOverlay;
use assure_core::domain::compliance::ConsultantDecision;
use assure_core::ports::AssessmentService;

use super::Context;

pub async fn execute(
    ctx: &Context,
    assessment_id: &str,
    response_id: &str,
    decision: ConsultantDecision,
    notes: Option<String>,
) -> anyhow::Result<()> {
    ctx.require_login()?;
    let service: Arc<dyn AssessmentService> = ctx.api.clone();

    let mut overlay = ConsultantReviewOverlay::load(service, assessment_id).await?;
    let updated = overlay
        .set_consultant_decision(response_id, decision, notes)
        .await?;

    let verdict = updated
        .verdict
        .map(|v| v.to_string())
        .unwrap_or_else(|| "no verdict".to_string());
    println!(
        "🧑‍⚖️ Response {} ({}) marked {}",
        response_id,
        verdict,
        ConsultantDecision::from_flag(updated.consultant_accepted)
    );
    if let Some(notes) = &updated.consultant_notes {
        println!("   Notes: {}", notes);
    }

    let tally = overlay.tally();
    println!(
        "   Consultant progress: {}/{} reviewed",
        tally.reviewed(),
        overlay.responses().len()
    );
    Ok(())
}
