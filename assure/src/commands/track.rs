// assure/src/commands/track.rs
//
// USE CASE: Follow a running analysis. Prints one line per visible change and
// the final summary once the completion callback has fired.

use std::sync::Arc;
use tokio::sync::oneshot;

use assure_core::AssureError;
use assure_core::application::{AssessmentJobPoller, PollSnapshot, PollState};
use assure_core::domain::DomainError;
use assure_core::domain::compliance::ComplianceSummary;
use assure_core::ports::AssessmentService;

use super::Context;
use super::summary::summary_table;

pub async fn execute(ctx: &Context, assessment_id: &str) -> anyhow::Result<()> {
    ctx.require_login()?;
    let service: Arc<dyn AssessmentService> = ctx.api.clone();

    let mut poller = AssessmentJobPoller::new(service, ctx.poll_settings());
    let mut updates = poller.watch();
    let (done_tx, done_rx) = oneshot::channel();

    println!("⏳ Tracking assessment {}...", assessment_id);
    poller.subscribe(
        assessment_id,
        true,
        Some(Box::new(move |summary: ComplianceSummary| {
            let _ = done_tx.send(summary);
        })),
    );

    let mut last_line = String::new();
    let outcome = loop {
        updates.changed().await?;
        let snapshot = updates.borrow_and_update().clone();

        let line = progress_line(&snapshot);
        if line != last_line {
            println!("{}", line);
            last_line = line;
        }
        if snapshot.state.is_terminal() {
            break snapshot;
        }
    };

    if outcome.state == PollState::Failed {
        let reason = outcome.error.unwrap_or_default();
        eprintln!("❌ Analysis failed: {}", reason);
        return Err(AssureError::from(DomainError::JobFailed {
            assessment_id: assessment_id.to_string(),
            reason,
        })
        .into());
    }

    let summary = done_rx.await?;
    println!("\n✨ Analysis complete ({} questions)", outcome.total_questions);
    println!("{}", summary_table(&summary));
    Ok(())
}

fn progress_line(s: &PollSnapshot) -> String {
    match s.state {
        PollState::Completed => "   ✅ 100% done".to_string(),
        PollState::Failed => "   ❌ stopped".to_string(),
        PollState::Idle | PollState::Polling => {
            let mut line = format!(
                "   ➜ {:>3.0}% ({}/{} questions)",
                s.progress_percent, s.processed_questions, s.total_questions
            );
            if let Some(stage) = &s.stage_label {
                line.push_str(&format!(" · {}", stage));
            }
            if let (Some(done), Some(total)) = (s.completed_batches, s.total_batches) {
                line.push_str(&format!(" · batch {}/{}", done, total));
            }
            line
        }
    }
}
