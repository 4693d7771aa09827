// assure-core/src/application/poller.rs
//
// Client-side tracker of one server-side analysis job.
//
//   Idle --subscribe--> Polling --tick--> Polling
//                          |--> Completed (report fetched, summary computed)
//                          |--> Failed    (job failed, status refused or unreadable, deadline)
//   Completed / Failed --unsubscribe or new id--> Idle
//
// Every snapshot carries the generation of the subscription that wrote it. A
// task only writes while its generation is still the current one, and the check
// happens under the watch channel's lock, so a superseded task can never
// publish or fire its completion callback.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

use crate::application::status_probe::StatusProbe;
use crate::domain::assessment::{InternalStatus, Probe, ProgressUpdate, stage_label};
use crate::domain::compliance::{AggregationOptions, ComplianceSummary, summarize_by_verdict};
use crate::ports::AssessmentService;

/// Query rate the backend is sized for. Not a tuning knob.
pub const POLL_INTERVAL: Duration = Duration::from_millis(2000);
/// How long the success state stays visible before the completion callback runs.
pub const COMPLETION_DISPLAY_DELAY: Duration = Duration::from_millis(2000);
/// Size of the standard question set, used for estimates until a report says otherwise.
pub const DEFAULT_TOTAL_QUESTIONS: u32 = 107;
pub const DEFAULT_MAX_POLL_DURATION: Duration = Duration::from_secs(30 * 60);

pub type CompletionCallback = Box<dyn FnOnce(ComplianceSummary) + Send + 'static>;

#[derive(Debug, Clone)]
pub struct PollSettings {
    /// Give up after this long. `None` polls until a terminal status.
    pub max_duration: Option<Duration>,
    pub total_questions: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            max_duration: Some(DEFAULT_MAX_POLL_DURATION),
            total_questions: DEFAULT_TOTAL_QUESTIONS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollState {
    Idle,
    Polling,
    Completed,
    Failed,
}

impl PollState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Everything a progress view renders. Which endpoint served a tick is not part of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollSnapshot {
    #[serde(skip)]
    generation: u64,
    pub assessment_id: Option<String>,
    pub state: PollState,
    pub status: InternalStatus,
    pub progress_percent: f64,
    /// Secondary bar, driven by the same percentage.
    pub stage_progress_percent: f64,
    pub stage_label: Option<String>,
    pub processed_questions: u32,
    pub total_questions: u32,
    pub completed_batches: Option<u32>,
    pub total_batches: Option<u32>,
    pub summary: Option<ComplianceSummary>,
    pub error: Option<String>,
    /// Set once the completion callback has been handed the summary.
    pub closed: bool,
    pub ticks: u32,
}

impl PollSnapshot {
    fn idle(generation: u64) -> Self {
        Self {
            generation,
            assessment_id: None,
            state: PollState::Idle,
            status: InternalStatus::Processing,
            progress_percent: 0.0,
            stage_progress_percent: 0.0,
            stage_label: None,
            processed_questions: 0,
            total_questions: DEFAULT_TOTAL_QUESTIONS,
            completed_batches: None,
            total_batches: None,
            summary: None,
            error: None,
            closed: false,
            ticks: 0,
        }
    }

    fn polling(generation: u64, assessment_id: &str, total_questions: u32) -> Self {
        Self {
            assessment_id: Some(assessment_id.to_string()),
            state: PollState::Polling,
            total_questions,
            ..Self::idle(generation)
        }
    }

    /// The displayed percentage never goes backwards and survives missing fields.
    fn apply_progress(&mut self, update: &ProgressUpdate) {
        if let Some(p) = update.percent.filter(|p| p.is_finite()) {
            self.progress_percent = self.progress_percent.max(p.clamp(0.0, 100.0));
        }
        self.stage_progress_percent = self.progress_percent;
        self.processed_questions =
            (self.progress_percent / 100.0 * f64::from(self.total_questions)).round() as u32;
        if let Some(stage) = update.stage.as_deref().map(stage_label).filter(|s| !s.is_empty()) {
            self.stage_label = Some(stage);
        }
        if update.completed_batches.is_some() {
            self.completed_batches = update.completed_batches;
        }
        if update.total_batches.is_some() {
            self.total_batches = update.total_batches;
        }
        self.status = InternalStatus::Processing;
    }

    fn complete(&mut self, summary: ComplianceSummary, total_questions: u32) {
        self.state = PollState::Completed;
        self.status = InternalStatus::Completed;
        self.progress_percent = 100.0;
        self.stage_progress_percent = 100.0;
        self.total_questions = total_questions;
        self.processed_questions = total_questions;
        self.summary = Some(summary);
        self.error = None;
    }

    fn fail(&mut self, reason: String) {
        self.state = PollState::Failed;
        self.status = InternalStatus::Failed;
        self.error = Some(reason);
    }
}

pub struct AssessmentJobPoller {
    probe: StatusProbe,
    service: Arc<dyn AssessmentService>,
    settings: PollSettings,
    state: Arc<watch::Sender<PollSnapshot>>,
    task: Option<JoinHandle<()>>,
}

impl AssessmentJobPoller {
    pub fn new(service: Arc<dyn AssessmentService>, settings: PollSettings) -> Self {
        let (tx, _rx) = watch::channel(PollSnapshot::idle(0));
        Self {
            probe: StatusProbe::new(service.clone()),
            service,
            settings,
            state: Arc::new(tx),
            task: None,
        }
    }

    pub fn watch(&self) -> watch::Receiver<PollSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> PollSnapshot {
        self.state.borrow().clone()
    }

    /// Follows the consumer's inputs: an assessment id plus a "poll requested" flag.
    ///
    /// Same id while already polling or terminal is a no-op; a terminal job is never
    /// polled again. A different id tears the current subscription down first.
    #[instrument(skip(self, on_complete))]
    pub fn subscribe(
        &mut self,
        assessment_id: &str,
        poll_requested: bool,
        on_complete: Option<CompletionCallback>,
    ) {
        if !poll_requested {
            self.unsubscribe();
            return;
        }

        {
            let current = self.state.borrow();
            if current.assessment_id.as_deref() == Some(assessment_id)
                && current.state != PollState::Idle
            {
                debug!(state = ?current.state, "already tracking this assessment");
                return;
            }
        }

        self.unsubscribe();

        let mut generation = 0;
        let total_questions = self.settings.total_questions;
        self.state.send_modify(|s| {
            generation = s.generation + 1;
            *s = PollSnapshot::polling(generation, assessment_id, total_questions);
        });
        info!(generation, "polling started");

        let task = PollTask {
            probe: self.probe.clone(),
            service: self.service.clone(),
            settings: self.settings.clone(),
            state: self.state.clone(),
            generation,
            assessment_id: assessment_id.to_string(),
        };
        self.task = Some(tokio::spawn(task.run(on_complete)));
    }

    /// Stops the timer and forgets the subscription. In-flight requests are dropped.
    pub fn unsubscribe(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.state.send_if_modified(|s| {
            if s.state == PollState::Idle && s.assessment_id.is_none() {
                return false;
            }
            let generation = s.generation + 1;
            *s = PollSnapshot::idle(generation);
            true
        });
    }
}

impl Drop for AssessmentJobPoller {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

enum TickOutcome {
    Continue,
    Completed(ComplianceSummary),
    Stop,
}

struct PollTask {
    probe: StatusProbe,
    service: Arc<dyn AssessmentService>,
    settings: PollSettings,
    state: Arc<watch::Sender<PollSnapshot>>,
    generation: u64,
    assessment_id: String,
}

impl PollTask {
    async fn run(self, on_complete: Option<CompletionCallback>) {
        let started = Instant::now();
        let mut interval = tokio::time::interval_at(started + POLL_INTERVAL, POLL_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            if !self.is_current() {
                return;
            }

            if let Some(max) = self.settings.max_duration
                && started.elapsed() >= max
            {
                warn!(assessment_id = %self.assessment_id, ?max, "polling deadline exceeded");
                let minutes = max.as_secs().div_ceil(60).max(1);
                self.publish(|s| {
                    s.fail(format!(
                        "Analysis did not finish within {minutes} min. Please try again later."
                    ))
                });
                return;
            }

            match self.tick().await {
                TickOutcome::Continue => continue,
                TickOutcome::Stop => return,
                TickOutcome::Completed(summary) => {
                    tokio::time::sleep(COMPLETION_DISPLAY_DELAY).await;
                    if self.close() {
                        if let Some(callback) = on_complete {
                            callback(summary);
                        }
                    }
                    return;
                }
            }
        }
    }

    async fn tick(&self) -> TickOutcome {
        self.publish(|s| s.ticks += 1);

        let probe = match self.probe.probe(&self.assessment_id).await {
            Ok(probe) => probe,
            Err(failure) if failure.is_unrecoverable() => {
                warn!(assessment_id = %self.assessment_id, error = %failure, "status check cannot succeed, stopping");
                self.publish(|s| s.fail(failure.reason()));
                return TickOutcome::Stop;
            }
            Err(failure) => {
                warn!(assessment_id = %self.assessment_id, error = %failure, "status check failed, retrying next tick");
                return TickOutcome::Continue;
            }
        };

        match probe {
            Probe::Progress(update) => {
                debug!(assessment_id = %self.assessment_id, percent = ?update.percent, stage = ?update.stage, "progress");
                self.publish(|s| s.apply_progress(&update));
                TickOutcome::Continue
            }
            Probe::Failed(reason) => {
                warn!(assessment_id = %self.assessment_id, %reason, "analysis failed");
                self.publish(|s| s.fail(reason));
                TickOutcome::Stop
            }
            Probe::Completed => self.finish().await,
        }
    }

    /// Report fetch + aggregation. A failed fetch keeps polling; the next tick retries.
    async fn finish(&self) -> TickOutcome {
        let report = match self.service.get_report(&self.assessment_id).await {
            Ok(report) => report,
            Err(e) => {
                warn!(assessment_id = %self.assessment_id, error = %e, "report fetch failed, retrying next tick");
                return TickOutcome::Continue;
            }
        };

        let total_questions = report
            .total_questions
            .filter(|n| *n > 0)
            .or_else(|| u32::try_from(report.responses.len()).ok().filter(|n| *n > 0))
            .unwrap_or(self.settings.total_questions);
        let responses = report.into_responses();
        let summary = summarize_by_verdict(&responses, AggregationOptions::default());

        let published = self.publish(|s| s.complete(summary.clone(), total_questions));
        if !published {
            return TickOutcome::Stop;
        }
        info!(
            assessment_id = %self.assessment_id,
            score = summary.compliance_score_percent,
            responses = responses.len(),
            "analysis completed"
        );
        TickOutcome::Completed(summary)
    }

    fn is_current(&self) -> bool {
        self.state.borrow().generation == self.generation
    }

    /// Applies `f` only while this subscription is still the current one.
    fn publish(&self, f: impl FnOnce(&mut PollSnapshot)) -> bool {
        self.state.send_if_modified(|s| {
            if s.generation != self.generation {
                return false;
            }
            f(s);
            true
        })
    }

    fn close(&self) -> bool {
        self.publish(|s| s.closed = true)
    }
}
