// assure-core/src/domain/compliance/summary.rs
//
// Pure reductions from response records to display metrics. Every surface
// (poller, document tables, reports) goes through these functions so the
// numbers agree.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::assessment::{AssessmentResponse, ComplianceLevel, Verdict};
use crate::domain::error::DomainError;

/// Which scoring rule a surface uses.
///
/// The two rules intentionally produce different percentages for the same data:
/// `Verdict` counts satisfactory answers over every relevant response, while
/// `Weighted` gives half credit to partial compliance and ignores not-applicable
/// questions altogether.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMode {
    /// Dashboards and the job tracker.
    #[default]
    Verdict,
    /// Document tables and reports.
    Weighted,
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verdict => write!(f, "verdict"),
            Self::Weighted => write!(f, "weighted"),
        }
    }
}

impl FromStr for AggregationMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "verdict" | "a" => Ok(Self::Verdict),
            "weighted" | "b" => Ok(Self::Weighted),
            _ => Err(DomainError::UnknownVocabulary {
                kind: "aggregation_mode",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AggregationOptions {
    /// Count responses flagged `is_relevant = false` as well.
    pub include_non_relevant: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ComplianceSummary {
    pub satisfactory_count: u32,
    pub unsatisfactory_count: u32,
    pub requirement_count: u32,
    pub not_applicable_count: u32,
    pub compliant_count: u32,
    pub partially_compliant_count: u32,
    pub non_compliant_count: u32,
    /// Denominator of the score.
    pub total_relevant: u32,
    pub compliance_score_percent: u32,
}

pub fn summarize(
    responses: &[AssessmentResponse],
    mode: AggregationMode,
    options: AggregationOptions,
) -> ComplianceSummary {
    match mode {
        AggregationMode::Verdict => summarize_by_verdict(responses, options),
        AggregationMode::Weighted => summarize_weighted(responses, options),
    }
}

/// Mode A: `round(satisfactory / relevant * 100)`.
pub fn summarize_by_verdict(
    responses: &[AssessmentResponse],
    options: AggregationOptions,
) -> ComplianceSummary {
    let mut summary = tally(relevant(responses, options));
    summary.compliance_score_percent =
        percent(f64::from(summary.satisfactory_count), summary.total_relevant);
    summary
}

/// Mode B: 1 point per compliant, 0.5 per partially compliant, nothing otherwise.
/// Not-applicable verdicts leave the denominator.
pub fn summarize_weighted(
    responses: &[AssessmentResponse],
    options: AggregationOptions,
) -> ComplianceSummary {
    let scored = relevant(responses, options).filter(|r| r.verdict != Some(Verdict::NotApplicable));

    let mut points = 0.0;
    let mut summary = tally(scored.inspect(|r| {
        points += r.compliance_level.map(|l| l.points()).unwrap_or(0.0);
    }));
    summary.compliance_score_percent = percent(points, summary.total_relevant);
    summary
}

fn relevant(
    responses: &[AssessmentResponse],
    options: AggregationOptions,
) -> impl Iterator<Item = &AssessmentResponse> {
    responses
        .iter()
        .filter(move |r| options.include_non_relevant || r.is_relevant)
}

fn tally<'a>(responses: impl Iterator<Item = &'a AssessmentResponse>) -> ComplianceSummary {
    let mut s = ComplianceSummary::default();
    for r in responses {
        s.total_relevant += 1;
        match r.verdict {
            Some(Verdict::Satisfactory) => s.satisfactory_count += 1,
            Some(Verdict::Unsatisfactory) => s.unsatisfactory_count += 1,
            Some(Verdict::Requirement) => s.requirement_count += 1,
            Some(Verdict::NotApplicable) => s.not_applicable_count += 1,
            None => {}
        }
        match r.compliance_level {
            Some(ComplianceLevel::Compliant) => s.compliant_count += 1,
            Some(ComplianceLevel::PartiallyCompliant) => s.partially_compliant_count += 1,
            Some(ComplianceLevel::NonCompliant) => s.non_compliant_count += 1,
            None => {}
        }
    }
    s
}

fn percent(numerator: f64, denominator: u32) -> u32 {
    if denominator == 0 {
        return 0;
    }
    (numerator / f64::from(denominator) * 100.0).round() as u32
}
