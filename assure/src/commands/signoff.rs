// assure/src/commands/signoff.rs
//
// USE CASE: Overall human sign-off of an assessment.

use chrono::Utc;
use std::sync::Arc;

use assure_core::application::ConsultantReviewOverlay;
use assure_core::domain::compliance::HumanReview;
use assure_core::ports::AssessmentService;

use super::Context;

pub async fn execute(
    ctx: &Context,
    assessment_id: &str,
    reviewer: String,
    approved: bool,
    notes: Option<String>,
) -> anyhow::Result<()> {
    ctx.require_login()?;
    let service: Arc<dyn AssessmentService> = ctx.api.clone();

    let overlay = ConsultantReviewOverlay::load(service, assessment_id).await?;
    let pending = overlay.tally().pending;
    if approved && pending > 0 {
        println!("⚠️  {} response(s) still await a consultant decision.", pending);
    }

    let saved = overlay
        .save_human_review(&HumanReview {
            reviewer,
            approved,
            notes,
            reviewed_at: Some(Utc::now()),
        })
        .await?;

    let verdict = if saved.approved { "approved" } else { "not approved" };
    println!("✍️  Assessment {} {} by {}", assessment_id, verdict, saved.reviewer);
    Ok(())
}
